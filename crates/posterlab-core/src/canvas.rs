//! Canvas document: the ordered element collection and the current selection.

use crate::elements::{Element, ElementId, ElementKind, ElementPatch, ElementStyle, Group, SerializableColor};
use crate::elements::union_bounds;
use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default poster width in canvas units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 500.0;
/// Default poster height in canvas units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 700.0;

/// Fill behind every element.
///
/// Anything that does not parse as a color (a gradient, an image) is kept as
/// the raw CSS value for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanvasBackground {
    Solid(SerializableColor),
    Css(String),
}

impl CanvasBackground {
    pub fn as_color(&self) -> Option<SerializableColor> {
        match self {
            CanvasBackground::Solid(color) => Some(*color),
            CanvasBackground::Css(_) => None,
        }
    }
}

impl Default for CanvasBackground {
    fn default() -> Self {
        CanvasBackground::Solid(SerializableColor::new(0xf4, 0xf4, 0xf0, 255))
    }
}

impl From<SerializableColor> for CanvasBackground {
    fn from(color: SerializableColor) -> Self {
        CanvasBackground::Solid(color)
    }
}

/// Poster dimensions and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub background: CanvasBackground,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background: CanvasBackground::default(),
        }
    }
}

impl CanvasSettings {
    /// Settings of the given size on the default background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Ordered set of selected element ids. The first id is the primary one for UI purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn first(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with a single id.
    pub fn select(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection, dropping duplicate ids.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    /// Append an id. Returns false if it was already selected.
    pub fn insert(&mut self, id: ElementId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&s| s != id);
        self.ids.len() != before
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    pub fn retain(&mut self, f: impl FnMut(&ElementId) -> bool) {
        self.ids.retain(f);
    }
}

/// Paint-order change for [`CanvasDocument::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderDirection {
    /// One step towards the front.
    Up,
    /// One step towards the back.
    Down,
    /// Frontmost.
    Top,
    /// Backmost.
    Bottom,
    /// Absolute index, clamped to the collection.
    To(usize),
}

/// The element collection of one poster.
///
/// Every mutation keeps `order` equal to the array position. Operations on an
/// unknown id are no-ops.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    /// Poster dimensions and background.
    pub settings: CanvasSettings,
    /// Elements in paint order (back to front).
    elements: Vec<Element>,
    /// Currently selected element ids.
    selection: Selection,
    /// Sizes reported by the renderer for elements that size themselves.
    measured: HashMap<ElementId, Size>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from loaded elements. `order` is rewritten to match the list.
    pub fn with_elements(settings: CanvasSettings, elements: Vec<Element>) -> Self {
        let mut doc = Self {
            settings,
            elements,
            selection: Selection::new(),
            measured: HashMap::new(),
        };
        doc.renumber();
        doc
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Index of an element in paint order.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Add an element on top of the paint order and make it the sole selection.
    ///
    /// The element (and any nested children) gets a fresh id, which is returned.
    pub fn add(&mut self, mut element: Element) -> ElementId {
        element.regenerate_ids();
        element.order = self.elements.len();
        let id = element.id();
        self.elements.push(element);
        self.selection.select(id);
        id
    }

    /// Shallow-merge `patch` into an element. Returns false if the id is unknown.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply_patch(patch);
                true
            }
            None => {
                log::trace!("update: no element {id}");
                false
            }
        }
    }

    /// Merge a partial style into an element. Returns false if the id is unknown.
    pub fn update_style(&mut self, id: ElementId, patch: &ElementStyle) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.style.merge(patch);
                true
            }
            None => {
                log::trace!("update_style: no element {id}");
                false
            }
        }
    }

    /// Remove an element and drop it from the selection.
    pub fn delete(&mut self, id: ElementId) -> Option<Element> {
        let Some(index) = self.index_of(id) else {
            log::trace!("delete: no element {id}");
            return None;
        };
        let removed = self.elements.remove(index);
        self.selection.remove(id);
        self.measured.remove(&id);
        self.renumber();
        Some(removed)
    }

    /// Deep-clone an element, shifted by `offset`, on top of the paint order.
    /// The copy becomes the sole selection.
    pub fn duplicate(&mut self, id: ElementId, offset: Vec2) -> Option<ElementId> {
        let Some(source) = self.get(id) else {
            log::trace!("duplicate: no element {id}");
            return None;
        };
        let mut copy = source.clone();
        copy.translate(offset);
        Some(self.add(copy))
    }

    /// Move an element in paint order. Returns true if the order changed.
    pub fn reorder(&mut self, id: ElementId, reorder: ReorderDirection) -> bool {
        let Some(index) = self.index_of(id) else {
            log::trace!("reorder: no element {id}");
            return false;
        };
        let last = self.elements.len() - 1;
        let target = match reorder {
            ReorderDirection::Up => (index + 1).min(last),
            ReorderDirection::Down => index.saturating_sub(1),
            ReorderDirection::Top => last,
            ReorderDirection::Bottom => 0,
            ReorderDirection::To(target) => target.min(last),
        };
        if target == index {
            return false;
        }
        let element = self.elements.remove(index);
        self.elements.insert(target, element);
        self.renumber();
        true
    }

    /// Randomly permute the paint order.
    pub fn shuffle(&mut self) -> bool {
        self.shuffle_with(&mut rand::rng())
    }

    /// Permute the paint order with the given random source. Fewer than two
    /// elements is a no-op.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.elements.len() < 2 {
            return false;
        }
        self.elements.shuffle(rng);
        self.renumber();
        true
    }

    /// Group the given elements into a single group on top of the paint order.
    ///
    /// The group sits at the union box of its members and children are stored
    /// relative to it. Returns the new group's id, or None if fewer than two of
    /// the ids exist.
    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        if ids.len() < 2 {
            return None;
        }

        // Collect members in paint order
        let members: Vec<&Element> = self.elements.iter().filter(|e| ids.contains(&e.id())).collect();
        if members.len() < 2 {
            log::trace!("group: fewer than two known ids");
            return None;
        }
        let bounds = union_bounds(members)?;
        let origin = bounds.origin();

        let mut children = Vec::new();
        let mut remaining = Vec::with_capacity(self.elements.len());
        for element in self.elements.drain(..) {
            if ids.contains(&element.id()) {
                children.push(element);
            } else {
                remaining.push(element);
            }
        }
        self.elements = remaining;

        for child in &mut children {
            child.position -= origin.to_vec2();
        }
        let mut group = Group::new(children);
        group.renumber();

        let mut element = Element::new(ElementKind::Group(group), origin).with_size(bounds.size());
        element.order = self.elements.len();
        let group_id = element.id();
        self.elements.push(element);
        self.renumber();
        self.selection.select(group_id);

        log::debug!("grouped {} elements into {group_id}", ids.len());
        Some(group_id)
    }

    /// Dissolve a group, restoring its children to canvas coordinates at the
    /// group's former paint position. The children become the selection.
    ///
    /// A rotated group rotates each child's centre about the group centre and
    /// adds the group rotation to the child's own.
    pub fn ungroup(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        let index = self.index_of(id)?;
        if !self.elements[index].is_group() {
            log::trace!("ungroup: {id} is not a group");
            return None;
        }
        let group_element = self.elements.remove(index);
        let group_position = group_element.position;
        let group_center = group_element.bounds().center();
        let rotation = group_element.rotation();
        let ElementKind::Group(group) = group_element.kind else {
            return None;
        };

        let mut children = group.ungroup();
        for child in &mut children {
            child.position = Group::absolute_position(group_position, child);
            if rotation != 0.0 {
                unrotate_child(child, group_center, rotation);
            }
        }

        let child_ids: Vec<ElementId> = children.iter().map(|c| c.id()).collect();
        self.elements.splice(index..index, children);
        self.renumber();
        self.selection.set(child_ids.iter().copied());
        Some(child_ids)
    }

    /// Replace the whole collection, e.g. when restoring history.
    ///
    /// Selected ids that no longer exist are dropped.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.renumber();
        let elements = &self.elements;
        self.selection.retain(|id| elements.iter().any(|e| e.id() == *id));
        self.measured.retain(|id, _| elements.iter().any(|e| e.id() == *id));
    }

    /// Record the rendered size of an auto-sized element. Returns false for an unknown id.
    pub fn set_measured_size(&mut self, id: ElementId, size: Size) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.measured.insert(id, size);
        true
    }

    pub fn measured_size(&self, id: ElementId) -> Option<Size> {
        self.measured.get(&id).copied()
    }

    /// Box used for hit-testing and selection handles.
    ///
    /// An explicit size wins, then the measured size, then an estimate.
    pub fn layout_bounds(&self, element: &Element) -> Rect {
        let size = element
            .size
            .or_else(|| self.measured_size(element.id()))
            .unwrap_or_else(|| element.estimated_size());
        Rect::from_origin_size(element.position, size)
    }

    /// Change the poster size, optionally scaling every element with it.
    pub fn resize_canvas(&mut self, width: f64, height: f64, scale_content: bool) {
        if scale_content && !self.elements.is_empty() && self.settings.width > 0.0 && self.settings.height > 0.0 {
            let scale = Vec2::new(width / self.settings.width, height / self.settings.height);
            for element in &mut self.elements {
                scale_element(element, scale);
            }
            self.measured.clear();
        }
        self.settings.width = width;
        self.settings.height = height;
    }

    /// Topmost visible element whose box contains `point`.
    pub fn element_at_point(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| !e.hidden && self.layout_bounds(e).contains(point))
            .map(|e| e.id())
    }

    /// Select a single element (clears previous selection).
    pub fn select(&mut self, id: ElementId) {
        if self.get(id).is_some() {
            self.selection.select(id);
        }
    }

    /// Add to selection.
    pub fn add_to_selection(&mut self, id: ElementId) {
        if self.get(id).is_some() {
            self.selection.insert(id);
        }
    }

    pub fn toggle_selection(&mut self, id: ElementId) {
        if self.get(id).is_some() {
            self.selection.toggle(id);
        }
    }

    /// Replace the selection with the known ids among `ids`.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        let known: Vec<ElementId> = ids.iter().copied().filter(|&id| self.get(id).is_some()).collect();
        self.selection.set(known);
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.elements.iter().map(|e| e.id()));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn renumber(&mut self) {
        for (i, element) in self.elements.iter_mut().enumerate() {
            element.order = i;
        }
    }
}

/// Scale an element's position and size (and font and border metrics) by
/// `scale`. Group children are scaled in their relative space.
pub(crate) fn scale_element(element: &mut Element, scale: Vec2) {
    element.position = Point::new(element.position.x * scale.x, element.position.y * scale.y);
    if let Some(size) = element.size {
        element.size = Some(Size::new(size.width * scale.x, size.height * scale.y));
    }
    if let Some(font_size) = element.style.font_size.as_mut() {
        *font_size *= scale.y;
    }
    if let Some(border_width) = element.style.border_width.as_mut() {
        *border_width *= scale.x.min(scale.y);
    }
    if let Some(group) = element.as_group_mut() {
        group.scale_children(scale);
    }
}

/// Rotate a child's centre about `center` by `degrees` and fold the rotation into its style.
fn unrotate_child(child: &mut Element, center: Point, degrees: f64) {
    let half = child.size_or_zero().to_vec2() / 2.0;
    let child_center = child.position + half;
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = child_center - center;
    let rotated = Point::new(center.x + d.x * cos - d.y * sin, center.y + d.x * sin + d.y * cos);
    child.position = rotated - half;
    child.style.rotate = Some(child.rotation() + degrees);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::shape(ShapeType::Rectangle, Point::new(x, y), Size::new(w, h))
    }

    fn assert_orders(doc: &CanvasDocument) {
        for (i, e) in doc.elements().iter().enumerate() {
            assert_eq!(e.order, i);
        }
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
        assert!(doc.selection().is_empty());
        assert!((doc.settings.width - DEFAULT_CANVAS_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_assigns_order_and_selects() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(5.0, 5.0, 10.0, 10.0));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(a).unwrap().order, 0);
        assert_eq!(doc.get(b).unwrap().order, 1);
        assert_eq!(doc.selection().ids(), &[b]);
    }

    #[test]
    fn test_add_assigns_fresh_id() {
        let mut doc = CanvasDocument::new();
        let element = rect(0.0, 0.0, 10.0, 10.0);
        let original_id = element.id();
        let id = doc.add(element.clone());
        let id2 = doc.add(element);
        assert_ne!(id, original_id);
        assert_ne!(id, id2);
    }

    #[test]
    fn test_update_and_missing_id() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(rect(0.0, 0.0, 10.0, 10.0));

        assert!(doc.update(id, &ElementPatch::position(Point::new(7.0, 8.0))));
        assert_eq!(doc.get(id).unwrap().position, Point::new(7.0, 8.0));

        let unknown = uuid::Uuid::new_v4();
        assert!(!doc.update(unknown, &ElementPatch::position(Point::ZERO)));
        assert!(!doc.update_style(unknown, &ElementStyle::default()));
        assert!(doc.delete(unknown).is_none());
        assert!(doc.duplicate(unknown, Vec2::new(20.0, 20.0)).is_none());
        assert!(!doc.reorder(unknown, ReorderDirection::Top));
        assert!(doc.ungroup(unknown).is_none());
    }

    #[test]
    fn test_update_style_merges() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(rect(0.0, 0.0, 10.0, 10.0).with_style(ElementStyle {
            opacity: Some(0.4),
            ..Default::default()
        }));
        doc.update_style(
            id,
            &ElementStyle {
                rotate: Some(45.0),
                ..Default::default()
            },
        );
        let style = &doc.get(id).unwrap().style;
        assert_eq!(style.opacity, Some(0.4));
        assert_eq!(style.rotate, Some(45.0));
    }

    #[test]
    fn test_delete_removes_from_selection() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        doc.set_selection(&[a, b]);

        assert!(doc.delete(a).is_some());
        assert_eq!(doc.selection().ids(), &[b]);
        assert_orders(&doc);
    }

    #[test]
    fn test_duplicate() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(rect(10.0, 10.0, 50.0, 50.0));
        let copy = doc.duplicate(id, Vec2::new(20.0, 20.0)).unwrap();

        assert_ne!(copy, id);
        assert_eq!(doc.get(copy).unwrap().position, Point::new(30.0, 30.0));
        assert_eq!(doc.get(id).unwrap().position, Point::new(10.0, 10.0));
        assert_eq!(doc.get(copy).unwrap().order, 1);
        assert_eq!(doc.selection().ids(), &[copy]);
    }

    #[test]
    fn test_duplicate_group_gets_new_child_ids() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(20.0, 0.0, 10.0, 10.0));
        let group = doc.group(&[a, b]).unwrap();
        let copy = doc.duplicate(group, Vec2::new(20.0, 20.0)).unwrap();

        let original_ids = doc.get(group).unwrap().as_group().unwrap().all_element_ids();
        let copy_ids = doc.get(copy).unwrap().as_group().unwrap().all_element_ids();
        assert!(copy_ids.iter().all(|id| !original_ids.contains(id)));
    }

    #[test]
    fn test_reorder() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let c = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let ids = |doc: &CanvasDocument| doc.elements().iter().map(|e| e.id()).collect::<Vec<_>>();

        assert!(doc.reorder(a, ReorderDirection::Up));
        assert_eq!(ids(&doc), vec![b, a, c]);

        assert!(doc.reorder(a, ReorderDirection::Top));
        assert_eq!(ids(&doc), vec![b, c, a]);

        // Clamped at the top
        assert!(!doc.reorder(a, ReorderDirection::Up));

        assert!(doc.reorder(a, ReorderDirection::Bottom));
        assert_eq!(ids(&doc), vec![a, b, c]);

        assert!(!doc.reorder(a, ReorderDirection::Down));

        assert!(doc.reorder(a, ReorderDirection::To(99)));
        assert_eq!(ids(&doc), vec![b, c, a]);
        assert_orders(&doc);
    }

    #[test]
    fn test_shuffle_with_seed_is_reproducible() {
        let mut doc = CanvasDocument::new();
        for i in 0..6 {
            doc.add(rect(i as f64, 0.0, 10.0, 10.0));
        }
        let mut other = doc.clone();

        assert!(doc.shuffle_with(&mut StdRng::seed_from_u64(42)));
        assert!(other.shuffle_with(&mut StdRng::seed_from_u64(42)));
        let ids = |d: &CanvasDocument| d.elements().iter().map(|e| e.id()).collect::<Vec<_>>();
        assert_eq!(ids(&doc), ids(&other));
        assert_orders(&doc);
    }

    #[test]
    fn test_shuffle_keeps_members() {
        let mut doc = CanvasDocument::new();
        for i in 0..8 {
            doc.add(rect(i as f64, 0.0, 10.0, 10.0));
        }
        let mut before: Vec<_> = doc.elements().iter().map(|e| e.id()).collect();
        assert!(doc.shuffle());
        let mut after: Vec<_> = doc.elements().iter().map(|e| e.id()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_orders(&doc);
    }

    #[test]
    fn test_layout_bounds_prefers_size_then_measurement() {
        let mut doc = CanvasDocument::new();
        let shape = doc.add(rect(10.0, 10.0, 30.0, 20.0));
        let text = doc.add(Element::text("abcde", Point::new(100.0, 100.0)));

        let shape_bounds = doc.layout_bounds(doc.get(shape).unwrap());
        assert_eq!(shape_bounds, Rect::new(10.0, 10.0, 40.0, 30.0));

        // 5 glyphs at 16 * 0.6, one 16 * 1.2 line
        let estimated = doc.layout_bounds(doc.get(text).unwrap());
        assert!((estimated.width() - 48.0).abs() < 1e-9);
        assert!((estimated.height() - 19.2).abs() < 1e-9);
        assert_eq!(doc.element_at_point(Point::new(110.0, 110.0)), Some(text));

        assert!(doc.set_measured_size(text, Size::new(120.0, 30.0)));
        assert_eq!(doc.element_at_point(Point::new(210.0, 125.0)), Some(text));

        doc.delete(text);
        assert_eq!(doc.measured_size(text), None);
    }

    #[test]
    fn test_shuffle_single_is_noop() {
        let mut doc = CanvasDocument::new();
        doc.add(rect(0.0, 0.0, 10.0, 10.0));
        assert!(!doc.shuffle());
    }

    #[test]
    fn test_group_relative_children() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(10.0, 20.0, 30.0, 30.0));
        let b = doc.add(rect(100.0, 50.0, 20.0, 40.0));
        let other = doc.add(rect(0.0, 0.0, 5.0, 5.0));

        let group_id = doc.group(&[a, b]).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements()[0].id(), other);

        let group = doc.get(group_id).unwrap();
        assert_eq!(group.position, Point::new(10.0, 20.0));
        assert_eq!(group.size, Some(Size::new(110.0, 70.0)));
        assert_eq!(group.order, 1);

        let children = group.as_group().unwrap().children();
        assert_eq!(children[0].position, Point::new(0.0, 0.0));
        assert_eq!(children[1].position, Point::new(90.0, 30.0));
        assert_eq!(doc.selection().ids(), &[group_id]);
    }

    #[test]
    fn test_group_requires_two() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        assert!(doc.group(&[a]).is_none());
        assert!(doc.group(&[a, uuid::Uuid::new_v4()]).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_group_text_counts_as_point() {
        let mut doc = CanvasDocument::new();
        let t = doc.add(Element::text("hi", Point::new(200.0, 300.0)));
        let r = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let g = doc.group(&[t, r]).unwrap();
        assert_eq!(doc.get(g).unwrap().size, Some(Size::new(200.0, 300.0)));
    }

    #[test]
    fn test_ungroup_restores_absolute_positions() {
        let mut doc = CanvasDocument::new();
        let below = doc.add(rect(0.0, 0.0, 5.0, 5.0));
        let a = doc.add(rect(10.0, 20.0, 30.0, 30.0));
        let b = doc.add(rect(100.0, 50.0, 20.0, 40.0));
        let group_id = doc.group(&[a, b]).unwrap();
        doc.reorder(group_id, ReorderDirection::Bottom);

        let children = doc.ungroup(group_id).unwrap();
        assert_eq!(children, vec![a, b]);
        assert_eq!(doc.get(a).unwrap().position, Point::new(10.0, 20.0));
        assert_eq!(doc.get(b).unwrap().position, Point::new(100.0, 50.0));

        // Spliced in at the group's former index
        let ids: Vec<_> = doc.elements().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![a, b, below]);
        assert_eq!(doc.selection().ids(), &[a, b]);
        assert_orders(&doc);
    }

    #[test]
    fn test_ungroup_non_group_is_noop() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        assert!(doc.ungroup(a).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_ungroup_rotated_group() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(90.0, 0.0, 10.0, 10.0));
        let g = doc.group(&[a, b]).unwrap();
        doc.update_style(
            g,
            &ElementStyle {
                rotate: Some(180.0),
                ..Default::default()
            },
        );
        doc.ungroup(g);

        // Rotating 180° about (50, 5) swaps the two boxes
        let a_pos = doc.get(a).unwrap().position;
        assert!((a_pos.x - 90.0).abs() < 1e-9);
        assert!(a_pos.y.abs() < 1e-9);
        assert!((doc.get(a).unwrap().rotation() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_replace_elements_prunes_selection() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let snapshot = doc.elements().to_vec();
        let b = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        doc.set_selection(&[a, b]);

        doc.replace_elements(snapshot);
        assert_eq!(doc.selection().ids(), &[a]);
    }

    #[test]
    fn test_resize_canvas_scales_content() {
        let mut doc = CanvasDocument::new();
        doc.settings.width = 100.0;
        doc.settings.height = 200.0;
        let id = doc.add(rect(10.0, 10.0, 20.0, 20.0).with_style(ElementStyle {
            font_size: Some(10.0),
            border_width: Some(4.0),
            ..Default::default()
        }));

        doc.resize_canvas(200.0, 100.0, true);
        let e = doc.get(id).unwrap();
        assert_eq!(e.position, Point::new(20.0, 5.0));
        assert_eq!(e.size, Some(Size::new(40.0, 10.0)));
        assert_eq!(e.style.font_size, Some(5.0));
        assert_eq!(e.style.border_width, Some(2.0));
        assert!((doc.settings.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_canvas_without_scaling() {
        let mut doc = CanvasDocument::new();
        let id = doc.add(rect(10.0, 10.0, 20.0, 20.0));
        doc.resize_canvas(1080.0, 1080.0, false);
        assert_eq!(doc.get(id).unwrap().position, Point::new(10.0, 10.0));
        assert_eq!(doc.settings.size(), Size::new(1080.0, 1080.0));
    }

    #[test]
    fn test_element_at_point() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 100.0, 100.0));
        let b = doc.add(rect(50.0, 50.0, 100.0, 100.0));
        assert_eq!(doc.element_at_point(Point::new(75.0, 75.0)), Some(b));
        assert_eq!(doc.element_at_point(Point::new(25.0, 25.0)), Some(a));
        doc.update(b, &ElementPatch::default().with_hidden(true));
        assert_eq!(doc.element_at_point(Point::new(75.0, 75.0)), Some(a));
        assert_eq!(doc.element_at_point(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_selection_helpers() {
        let mut doc = CanvasDocument::new();
        let a = doc.add(rect(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(rect(0.0, 0.0, 10.0, 10.0));

        doc.select(a);
        doc.add_to_selection(b);
        doc.add_to_selection(b);
        assert_eq!(doc.selection().ids(), &[a, b]);

        doc.toggle_selection(a);
        assert_eq!(doc.selection().ids(), &[b]);

        doc.select_all();
        assert_eq!(doc.selection().len(), 2);

        doc.clear_selection();
        assert!(doc.selection().is_empty());

        doc.select(uuid::Uuid::new_v4());
        assert!(doc.selection().is_empty());
    }
}
