//! Aligning elements to the canvas or to the selection box.

use crate::canvas::CanvasDocument;
use crate::elements::{ElementId, union_bounds};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Edge or center line to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignEdge {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl AlignEdge {
    /// Whether this edge acts on x.
    pub fn is_horizontal(self) -> bool {
        matches!(self, AlignEdge::Left | AlignEdge::Center | AlignEdge::Right)
    }

    /// New top-left coordinate on the aligned axis for a box of `size` inside `reference`.
    fn aligned_coordinate(self, reference: Rect, size: Size) -> f64 {
        match self {
            AlignEdge::Left => reference.x0,
            AlignEdge::Center => reference.x0 + (reference.width() - size.width) / 2.0,
            AlignEdge::Right => reference.x1 - size.width,
            AlignEdge::Top => reference.y0,
            AlignEdge::Middle => reference.y0 + (reference.height() - size.height) / 2.0,
            AlignEdge::Bottom => reference.y1 - size.height,
        }
    }
}

/// Union box of the given elements, `None` if none of them exist.
pub fn selection_bounds(doc: &CanvasDocument, ids: &[ElementId]) -> Option<Rect> {
    union_bounds(ids.iter().filter_map(|&id| doc.get(id)))
}

/// Align elements on one axis.
///
/// A single element aligns to the canvas box; several align to their own
/// union box. Positions on the other axis are untouched. Returns true if any
/// element moved.
pub fn align_elements(doc: &mut CanvasDocument, ids: &[ElementId], edge: AlignEdge, canvas: Size) -> bool {
    let existing: Vec<ElementId> = ids.iter().copied().filter(|&id| doc.get(id).is_some()).collect();
    let reference = match existing.len() {
        0 => return false,
        1 => Rect::from_origin_size((0.0, 0.0), canvas),
        _ => match selection_bounds(doc, &existing) {
            Some(bounds) => bounds,
            None => return false,
        },
    };

    let mut changed = false;
    for id in existing {
        let Some(element) = doc.get_mut(id) else {
            continue;
        };
        let value = edge.aligned_coordinate(reference, element.size_or_zero());
        let current = if edge.is_horizontal() {
            &mut element.position.x
        } else {
            &mut element.position.y
        };
        if *current != value {
            *current = value;
            changed = true;
        }
    }
    changed
}
