//! Group payload for combining multiple elements.

use super::{Element, ElementId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Children of a group element.
///
/// Child positions are relative to the group's own position, so a child's
/// absolute position is `group.position + child.position`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Child elements in paint order.
    pub children: Vec<Element>,
}

impl Group {
    pub fn new(children: Vec<Element>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Dissolve this group and return its children, still in relative coordinates.
    pub fn ungroup(self) -> Vec<Element> {
        self.children
    }

    /// Ids of every element nested in this group (not including the group itself).
    pub fn all_element_ids(&self) -> Vec<ElementId> {
        let mut ids = Vec::new();
        for child in &self.children {
            ids.push(child.id());
            if let Some(group) = child.as_group() {
                ids.extend(group.all_element_ids());
            }
        }
        ids
    }

    /// Absolute position of a direct child given the group's own position.
    pub fn absolute_position(group_position: Point, child: &Element) -> Point {
        group_position + child.position.to_vec2()
    }

    /// Renumber child `order` fields to match their index.
    pub(crate) fn renumber(&mut self) {
        for (i, child) in self.children.iter_mut().enumerate() {
            child.order = i;
        }
    }

    /// Scale child positions and sizes in place (relative coordinates).
    pub(crate) fn scale_children(&mut self, scale: Vec2) {
        for child in &mut self.children {
            crate::canvas::scale_element(child, scale);
        }
    }
}
