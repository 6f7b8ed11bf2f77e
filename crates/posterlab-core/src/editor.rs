//! The editor context: one document with its history, gesture state and view.
//!
//! [`Editor`] is the mutation surface for presentation code. Discrete actions
//! (add, delete, group, align, nudge...) commit one history entry each. Pointer
//! gestures mutate the document on every move and commit once when they end.
//! Field edits through [`Editor::update`] and [`Editor::update_style`] are
//! coalesced by the caller, who calls [`Editor::commit`] when the editing
//! session is over.

use crate::align::{AlignEdge, align_elements};
use crate::canvas::{CanvasDocument, CanvasSettings, ReorderDirection, Selection};
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, ElementPatch, ElementStyle};
use crate::events::{EditorEvent, EventBus, SubscriptionId};
use crate::history::History;
use crate::input::{KeyInput, MouseButton, PointerEvent, PointerPhase};
use crate::project::{Project, ProjectError};
use crate::shortcuts::{EditorCommand, NudgeDirection, ShortcutRegistry};
use crate::snap::SnapGuide;
use crate::transform::{
    HANDLE_HIT_TOLERANCE, HandleKind, ROTATE_HANDLE_OFFSET, TransformController, TransformKind,
    TransformState, hit_test_handles,
};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};

pub struct Editor {
    document: CanvasDocument,
    history: History,
    transform: TransformController,
    viewport: Viewport,
    config: EditorConfig,
    shortcuts: ShortcutRegistry,
    events: EventBus,
    /// Guides of the current move gesture.
    guides: Vec<SnapGuide>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("elements", &self.document.len())
            .field("selection", &self.document.selection().ids())
            .field("history", &self.history.len())
            .field("transforming", &self.transform.is_active())
            .finish()
    }
}

impl Editor {
    /// An editor over an empty default canvas.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(CanvasDocument::new(), config)
    }

    /// An editor over an existing document. Its current state becomes the
    /// first history entry.
    pub fn with_document(document: CanvasDocument, config: EditorConfig) -> Self {
        let mut viewport = Viewport::new(Size::ZERO, document.settings.size());
        viewport.min_zoom = config.min_zoom;
        viewport.max_zoom = config.max_zoom;

        let mut history = History::new(config.history_capacity);
        history.commit(document.elements());

        Self {
            document,
            history,
            transform: TransformController::new(),
            viewport,
            config,
            shortcuts: ShortcutRegistry::default(),
            events: EventBus::new(),
            guides: Vec::new(),
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.document.get(id)
    }

    pub fn selection(&self) -> &Selection {
        self.document.selection()
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.document.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Size of the on-screen area the poster is fitted into.
    pub fn set_screen_size(&mut self, size: Size) {
        self.viewport.screen = size;
    }

    /// Report the rendered size of an auto-sized element so pointer input can
    /// hit it. Not part of history.
    pub fn set_measured_size(&mut self, id: ElementId, size: Size) -> bool {
        self.document.set_measured_size(id, size)
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutRegistry {
        &mut self.shortcuts
    }

    pub fn transform_state(&self) -> &TransformState {
        self.transform.state()
    }

    pub fn is_transforming(&self) -> bool {
        self.transform.is_active()
    }

    /// Guides to draw for the gesture in progress.
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    pub fn snapping_enabled(&self) -> bool {
        self.config.snapping_enabled
    }

    pub fn set_snapping_enabled(&mut self, enabled: bool) {
        self.config.snapping_enabled = enabled;
    }

    // --- observers ---

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent, &CanvasDocument) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.emit(&event, &self.document);
    }

    fn emit_selection_if_changed(&mut self, before: &Selection) {
        if self.document.selection() != before {
            let ids = self.document.selection().ids().to_vec();
            self.emit(EditorEvent::SelectionChanged(ids));
        }
    }

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    /// Notify, commit and report a selection change after a discrete edit.
    fn finish_edit(&mut self, selection_before: &Selection) {
        self.emit(EditorEvent::ElementsChanged);
        self.emit_selection_if_changed(selection_before);
        self.commit();
    }

    // --- history ---

    /// Snapshot the current elements. Returns false if nothing changed since
    /// the last entry.
    pub fn commit(&mut self) -> bool {
        let pushed = self.history.commit(self.document.elements());
        if pushed {
            self.emit_history();
        }
        pushed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.transform.is_active() {
            log::trace!("undo ignored during a gesture");
            return false;
        }
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        log::debug!("undo to entry {}", self.history.pointer());
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.transform.is_active() {
            log::trace!("redo ignored during a gesture");
            return false;
        }
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        log::debug!("redo to entry {}", self.history.pointer());
        true
    }

    fn restore(&mut self, snapshot: Vec<Element>) {
        let before = self.document.selection().clone();
        self.document.replace_elements(snapshot);
        self.emit(EditorEvent::ElementsChanged);
        self.emit_selection_if_changed(&before);
        self.emit_history();
    }

    // --- element store ---

    /// Add an element on top and select it.
    pub fn add(&mut self, element: Element) -> ElementId {
        let before = self.document.selection().clone();
        let id = self.document.add(element);
        self.finish_edit(&before);
        id
    }

    /// Merge fields into an element without committing.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let changed = self.document.update(id, patch);
        if changed {
            self.emit(EditorEvent::ElementsChanged);
        }
        changed
    }

    /// Merge style attributes into an element without committing.
    pub fn update_style(&mut self, id: ElementId, patch: &ElementStyle) -> bool {
        let changed = self.document.update_style(id, patch);
        if changed {
            self.emit(EditorEvent::ElementsChanged);
        }
        changed
    }

    pub fn delete(&mut self, id: ElementId) -> bool {
        let before = self.document.selection().clone();
        if self.document.delete(id).is_none() {
            return false;
        }
        self.finish_edit(&before);
        true
    }

    /// Delete every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.document.selection().clone();
        let removed = before
            .ids()
            .iter()
            .filter(|&&id| self.document.delete(id).is_some())
            .count();
        if removed > 0 {
            self.finish_edit(&before);
        }
        removed
    }

    /// Copy an element, offset by the configured nudge, and select the copy.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        let before = self.document.selection().clone();
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let copy = self.document.duplicate(id, offset)?;
        self.finish_edit(&before);
        Some(copy)
    }

    /// Duplicate every selected element; the copies become the selection.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let before = self.document.selection().clone();
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let copies: Vec<ElementId> = before
            .ids()
            .iter()
            .filter_map(|&id| self.document.duplicate(id, offset))
            .collect();
        if !copies.is_empty() {
            self.document.set_selection(&copies);
            self.finish_edit(&before);
        }
        copies
    }

    pub fn reorder(&mut self, id: ElementId, direction: ReorderDirection) -> bool {
        let before = self.document.selection().clone();
        let changed = self.document.reorder(id, direction);
        if changed {
            self.finish_edit(&before);
        }
        changed
    }

    pub fn shuffle(&mut self) -> bool {
        let before = self.document.selection().clone();
        let changed = self.document.shuffle();
        if changed {
            self.finish_edit(&before);
        }
        changed
    }

    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let before = self.document.selection().clone();
        let group = self.document.group(ids)?;
        self.finish_edit(&before);
        Some(group)
    }

    pub fn group_selected(&mut self) -> Option<ElementId> {
        let ids = self.document.selection().ids().to_vec();
        self.group(&ids)
    }

    pub fn ungroup(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        let before = self.document.selection().clone();
        let children = self.document.ungroup(id)?;
        self.finish_edit(&before);
        Some(children)
    }

    /// Ungroup every selected group. The restored children become the selection.
    pub fn ungroup_selected(&mut self) -> Vec<ElementId> {
        let before = self.document.selection().clone();
        let restored: Vec<ElementId> = before
            .ids()
            .iter()
            .filter_map(|&id| self.document.ungroup(id))
            .flatten()
            .collect();
        if !restored.is_empty() {
            self.document.set_selection(&restored);
            self.finish_edit(&before);
        }
        restored
    }

    /// Align the selection: one element to the canvas, several to their union box.
    pub fn align(&mut self, edge: AlignEdge) -> bool {
        let before = self.document.selection().clone();
        let canvas = self.document.settings.size();
        let changed = align_elements(&mut self.document, before.ids(), edge, canvas);
        if changed {
            self.finish_edit(&before);
        }
        changed
    }

    /// Move every selected element that is neither locked nor hidden by `delta` canvas units.
    pub fn nudge(&mut self, delta: Vec2) -> bool {
        let before = self.document.selection().clone();
        let mut moved = false;
        for &id in before.ids() {
            if let Some(element) = self.document.get(id).filter(|e| e.is_interactive()) {
                let position = element.position + delta;
                moved |= self.document.update(id, &ElementPatch::position(position));
            }
        }
        if moved {
            self.finish_edit(&before);
        }
        moved
    }

    pub fn resize_canvas(&mut self, width: f64, height: f64, scale_content: bool) {
        let before = self.document.selection().clone();
        self.document.resize_canvas(width, height, scale_content);
        self.viewport.canvas = self.document.settings.size();
        self.finish_edit(&before);
    }

    // --- selection ---

    fn change_selection(&mut self, change: impl FnOnce(&mut CanvasDocument)) {
        let before = self.document.selection().clone();
        change(&mut self.document);
        self.emit_selection_if_changed(&before);
    }

    pub fn select(&mut self, id: ElementId) {
        self.change_selection(|doc| doc.select(id));
    }

    pub fn add_to_selection(&mut self, id: ElementId) {
        self.change_selection(|doc| doc.add_to_selection(id));
    }

    pub fn toggle_selection(&mut self, id: ElementId) {
        self.change_selection(|doc| doc.toggle_selection(id));
    }

    pub fn set_selection(&mut self, ids: &[ElementId]) {
        self.change_selection(|doc| doc.set_selection(ids));
    }

    pub fn select_all(&mut self) {
        self.change_selection(CanvasDocument::select_all);
    }

    pub fn clear_selection(&mut self) {
        self.change_selection(CanvasDocument::clear_selection);
    }

    // --- gestures ---

    /// Begin a gesture on `id` at a screen-space pointer position.
    ///
    /// A gesture still in progress is finished first.
    pub fn start_transform(&mut self, id: ElementId, kind: TransformKind, pointer: Point) -> bool {
        if self.transform.is_active() {
            self.end_transform();
        }
        self.transform.start(&self.document, id, kind, pointer)
    }

    /// Feed a screen-space pointer position to the active gesture.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        if !self.transform.is_active() {
            return false;
        }
        let guides = self
            .transform
            .update(&mut self.document, pointer, &self.viewport, &self.config);
        self.emit(EditorEvent::ElementsChanged);
        if guides != self.guides {
            self.guides = guides;
            self.emit(EditorEvent::GuidesChanged(self.guides.clone()));
        }
        true
    }

    /// Finish the active gesture: one history commit, guides cleared.
    /// Returns false if no gesture was active.
    pub fn end_transform(&mut self) -> bool {
        if self.transform.end().is_none() {
            return false;
        }
        if !self.guides.is_empty() {
            self.guides.clear();
            self.emit(EditorEvent::GuidesChanged(Vec::new()));
        }
        self.commit();
        true
    }

    /// Route a raw pointer event. Returns true if the editor acted on it.
    ///
    /// Down on a handle of the primary selection starts a resize or rotate;
    /// down on an element selects it (Shift toggles) and starts a move. Up,
    /// cancel and leave all end the gesture.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Down => event.button == MouseButton::Left && self.pointer_down(&event),
            PointerPhase::Move => self.pointer_move(event.position),
            phase if phase.ends_gesture() => self.end_transform(),
            _ => false,
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        let point = self.viewport.screen_to_canvas(event.position);

        if let Some((primary, handle)) = self.handle_at(point) {
            return self.start_transform(primary, handle.transform_kind(), event.position);
        }

        let Some(id) = self.document.element_at_point(point) else {
            if !event.modifiers.shift {
                self.clear_selection();
            }
            return false;
        };

        if event.modifiers.shift {
            self.toggle_selection(id);
            return true;
        }
        if !self.document.selection().contains(id) {
            self.select(id);
        }
        self.start_transform(id, TransformKind::Move, event.position);
        true
    }

    /// Handle of the primary selection under a canvas point. Handle sizes are
    /// constant on screen. Elements that size themselves only offer rotation.
    fn handle_at(&self, point: Point) -> Option<(ElementId, HandleKind)> {
        let scale = self.viewport.effective_scale();
        let primary = self.document.selection().first()?;
        let element = self.document.get(primary).filter(|e| !e.locked)?;
        let handle = hit_test_handles(
            self.document.layout_bounds(element),
            point,
            ROTATE_HANDLE_OFFSET / scale,
            HANDLE_HIT_TOLERANCE / scale,
            element.size.is_some(),
        )?;
        Some((primary, handle))
    }

    // --- keyboard ---

    /// Resolve a key press through the shortcut table and run it.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        match self.shortcuts.resolve(input) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    /// Run an editor command. Returns true if anything changed.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        log::trace!("execute {command:?}");
        match command {
            EditorCommand::Delete => self.delete_selected() > 0,
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Duplicate => !self.duplicate_selected().is_empty(),
            EditorCommand::ClearSelection => {
                let had_selection = !self.document.selection().is_empty();
                self.clear_selection();
                had_selection
            }
            EditorCommand::SelectAll => {
                self.select_all();
                !self.document.is_empty()
            }
            EditorCommand::Group => self.group_selected().is_some(),
            EditorCommand::Ungroup => !self.ungroup_selected().is_empty(),
            EditorCommand::Nudge { direction, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let delta = match direction {
                    NudgeDirection::Up => Vec2::new(0.0, -step),
                    NudgeDirection::Down => Vec2::new(0.0, step),
                    NudgeDirection::Left => Vec2::new(-step, 0.0),
                    NudgeDirection::Right => Vec2::new(step, 0.0),
                };
                self.nudge(delta)
            }
        }
    }

    // --- projects ---

    /// Snapshot the document as a saveable project.
    pub fn to_project(&self) -> Project {
        Project::from_document(&self.document)
    }

    /// Replace the document with a loaded project. History restarts with the
    /// loaded state as its only entry.
    pub fn load_project(&mut self, project: Project) {
        self.transform.end();
        self.guides.clear();
        self.document = project.into_document();
        self.viewport.canvas = self.document.settings.size();
        self.viewport.reset();
        self.history.clear();
        self.history.commit(self.document.elements());

        log::info!("loaded project with {} elements", self.document.len());
        self.emit(EditorEvent::ElementsChanged);
        self.emit(EditorEvent::SelectionChanged(Vec::new()));
        self.emit_history();
    }

    /// Parse and load project JSON. On error the current document is untouched.
    pub fn load_project_json(&mut self, json: &str) -> Result<(), ProjectError> {
        let project = Project::from_json(json)?;
        self.load_project(project);
        Ok(())
    }

    /// Parse and load a base64 `.posterLabs` blob. On error the current document is untouched.
    pub fn load_project_encoded(&mut self, data: &str) -> Result<(), ProjectError> {
        let project = Project::from_encoded(data)?;
        self.load_project(project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;
    use crate::input::Modifiers;
    use crate::transform::{Corner, ResizeHandle};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::shape(ShapeType::Rectangle, Point::new(x, y), Size::new(w, h))
    }

    fn editor() -> Editor {
        let mut config = EditorConfig::default();
        config.snapping_enabled = false;
        Editor::new(config)
    }

    #[test]
    fn test_new_has_baseline_entry() {
        let editor = Editor::default();
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.can_undo());
        assert_eq!(editor.settings().size(), Size::new(500.0, 700.0));
    }

    #[test]
    fn test_discrete_actions_commit_once() {
        let mut editor = editor();
        let a = editor.add(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(editor.history().len(), 2);

        editor.duplicate(a).unwrap();
        assert_eq!(editor.history().len(), 3);

        editor.undo();
        assert_eq!(editor.elements().len(), 1);
        editor.undo();
        assert!(editor.elements().is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn test_update_waits_for_commit() {
        let mut editor = editor();
        let a = editor.add(Element::text("draft", Point::ZERO));
        editor.update(a, &ElementPatch::content("d"));
        editor.update(a, &ElementPatch::content("do"));
        editor.update(a, &ElementPatch::content("done"));
        assert_eq!(editor.history().len(), 2);

        assert!(editor.commit());
        assert!(!editor.commit());
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut editor = editor();
        let ghost = uuid::Uuid::new_v4();
        assert!(!editor.delete(ghost));
        assert!(editor.duplicate(ghost).is_none());
        assert!(!editor.reorder(ghost, ReorderDirection::Top));
        assert!(editor.ungroup(ghost).is_none());
        assert!(!editor.start_transform(ghost, TransformKind::Move, Point::ZERO));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_drag_commits_once() {
        let mut editor = editor();
        let a = editor.add(rect(10.0, 10.0, 100.0, 100.0));
        let entries = editor.history().len();

        assert!(editor.handle_pointer(PointerEvent::down(Point::new(60.0, 60.0))));
        assert!(editor.is_transforming());
        for step in 1..=10 {
            editor.handle_pointer(PointerEvent::moved(Point::new(60.0 + step as f64, 60.0)));
        }
        assert_eq!(editor.history().len(), entries);

        assert!(editor.handle_pointer(PointerEvent::up(Point::new(70.0, 60.0))));
        assert!(!editor.is_transforming());
        assert_eq!(editor.history().len(), entries + 1);
        assert_eq!(editor.get(a).unwrap().position, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_leave_and_cancel_end_gesture() {
        let mut editor = editor();
        editor.add(rect(0.0, 0.0, 200.0, 200.0));

        for phase in [PointerPhase::Cancel, PointerPhase::Leave] {
            editor.handle_pointer(PointerEvent::down(Point::new(100.0, 100.0)));
            assert_eq!(editor.transform.kind(), Some(TransformKind::Move));
            editor.handle_pointer(PointerEvent::new(phase, Point::new(100.0, 100.0)));
            assert!(!editor.is_transforming());
        }
    }

    #[test]
    fn test_down_on_handle_starts_resize() {
        let mut editor = editor();
        let a = editor.add(rect(100.0, 100.0, 50.0, 50.0));

        editor.handle_pointer(PointerEvent::down(Point::new(151.0, 151.0)));
        assert_eq!(
            editor.transform.kind(),
            Some(TransformKind::Resize(ResizeHandle::Corner(Corner::BottomRight)))
        );
        editor.handle_pointer(PointerEvent::moved(Point::new(171.0, 161.0)));
        editor.handle_pointer(PointerEvent::up(Point::new(171.0, 161.0)));
        assert_eq!(editor.get(a).unwrap().size, Some(Size::new(70.0, 60.0)));
    }

    #[test]
    fn test_drag_auto_sized_text() {
        let mut editor = editor();
        let id = editor.add(Element::text("Hello", Point::new(100.0, 100.0)));

        // Selected text offers no resize handles at its origin
        editor.handle_pointer(PointerEvent::down(Point::new(105.0, 105.0)));
        assert_eq!(editor.transform.kind(), Some(TransformKind::Move));
        editor.handle_pointer(PointerEvent::moved(Point::new(155.0, 105.0)));
        editor.handle_pointer(PointerEvent::up(Point::new(155.0, 105.0)));

        let text = editor.get(id).unwrap();
        assert_eq!(text.position, Point::new(150.0, 100.0));
        assert_eq!(text.size, None);

        editor.clear_selection();
        assert!(editor.handle_pointer(PointerEvent::down(Point::new(160.0, 105.0))));
        assert_eq!(editor.selection().ids(), &[id]);
        editor.handle_pointer(PointerEvent::up(Point::new(160.0, 105.0)));
    }

    #[test]
    fn test_measured_size_drives_hit_testing() {
        let mut editor = editor();
        let id = editor.add(Element::text("Hi", Point::new(100.0, 100.0)));
        editor.clear_selection();

        // Outside the estimated box
        assert!(!editor.handle_pointer(PointerEvent::down(Point::new(250.0, 120.0))));

        assert!(editor.set_measured_size(id, Size::new(200.0, 40.0)));
        assert!(editor.handle_pointer(PointerEvent::down(Point::new(250.0, 120.0))));
        assert_eq!(editor.transform.kind(), Some(TransformKind::Move));
        editor.handle_pointer(PointerEvent::up(Point::new(250.0, 120.0)));
        assert_eq!(editor.get(id).unwrap().size, None);

        assert!(!editor.set_measured_size(uuid::Uuid::new_v4(), Size::new(1.0, 1.0)));
    }

    #[test]
    fn test_shift_click_toggles_without_drag() {
        let mut editor = editor();
        let a = editor.add(rect(0.0, 0.0, 50.0, 50.0));
        let b = editor.add(rect(200.0, 200.0, 50.0, 50.0));

        let shift = Modifiers::shift();
        assert!(editor.handle_pointer(PointerEvent::down(Point::new(10.0, 10.0)).with_modifiers(shift)));
        assert!(!editor.is_transforming());
        assert_eq!(editor.selection().ids(), &[b, a]);

        editor.handle_pointer(PointerEvent::down(Point::new(400.0, 600.0)));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_keyboard_nudge() {
        let mut editor = editor();
        let a = editor.add(rect(10.0, 10.0, 50.0, 50.0));

        assert!(editor.handle_key(&KeyInput::plain("ArrowRight")));
        assert!(editor.handle_key(&KeyInput::new("ArrowUp", Modifiers::shift())));
        assert_eq!(editor.get(a).unwrap().position, Point::new(11.0, 0.0));

        assert!(!editor.handle_key(&KeyInput::plain("ArrowRight").in_text_field()));
        assert_eq!(editor.get(a).unwrap().position, Point::new(11.0, 0.0));

        editor.handle_key(&KeyInput::new("z", Modifiers::ctrl()));
        assert_eq!(editor.get(a).unwrap().position, Point::new(11.0, 10.0));
    }

    #[test]
    fn test_keyboard_delete_and_escape() {
        let mut editor = editor();
        editor.add(rect(0.0, 0.0, 10.0, 10.0));
        editor.add(rect(20.0, 0.0, 10.0, 10.0));

        assert!(editor.handle_key(&KeyInput::plain("Escape")));
        assert!(!editor.handle_key(&KeyInput::plain("Delete")));

        editor.handle_key(&KeyInput::new("a", Modifiers::ctrl()));
        assert!(editor.handle_key(&KeyInput::plain("Backspace")));
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_locked_elements_do_not_nudge() {
        let mut editor = editor();
        let a = editor.add(rect(0.0, 0.0, 10.0, 10.0));
        editor.update(a, &ElementPatch::default().with_locked(true));
        assert!(!editor.execute(EditorCommand::Nudge {
            direction: NudgeDirection::Down,
            large: false
        }));
    }

    #[test]
    fn test_events() {
        let mut editor = editor();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = editor.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

        let a = editor.add(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(
            seen.borrow().as_slice(),
            &[
                EditorEvent::ElementsChanged,
                EditorEvent::SelectionChanged(vec![a]),
                EditorEvent::HistoryChanged {
                    can_undo: true,
                    can_redo: false
                },
            ]
        );

        assert!(editor.unsubscribe(sub));
        editor.clear_selection();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_guides_cleared_on_release() {
        let mut editor = Editor::default();
        editor.add(rect(0.0, 0.0, 100.0, 100.0));
        editor.add(rect(96.0, 200.0, 100.0, 100.0));
        editor.clear_selection();

        editor.handle_pointer(PointerEvent::down(Point::new(50.0, 50.0)));
        editor.handle_pointer(PointerEvent::moved(Point::new(142.0, 50.0)));
        assert!(!editor.guides().is_empty());

        editor.handle_pointer(PointerEvent::up(Point::new(142.0, 50.0)));
        assert!(editor.guides().is_empty());
    }

    #[test]
    fn test_align_selection() {
        let mut editor = editor();
        let a = editor.add(rect(10.0, 20.0, 100.0, 50.0));
        assert!(editor.align(AlignEdge::Right));
        assert_eq!(editor.get(a).unwrap().position.x, 400.0);
        assert!(!editor.align(AlignEdge::Right));
    }

    #[test]
    fn test_resize_canvas_updates_viewport() {
        let mut editor = editor();
        let a = editor.add(rect(100.0, 100.0, 50.0, 50.0));
        editor.resize_canvas(1000.0, 1400.0, true);
        assert_eq!(editor.viewport().canvas, Size::new(1000.0, 1400.0));
        assert_eq!(editor.get(a).unwrap().position, Point::new(200.0, 200.0));
        assert!(editor.undo());
        assert_eq!(editor.get(a).unwrap().position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_load_project_resets_history() {
        let mut editor = editor();
        editor.add(rect(0.0, 0.0, 10.0, 10.0));

        let project = Project::new(CanvasSettings::new(1080.0, 1080.0), vec![rect(1.0, 2.0, 3.0, 4.0)]);
        editor.load_project(project);
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.can_undo());
        assert_eq!(editor.elements().len(), 1);
        assert!(editor.selection().is_empty());
        assert_eq!(editor.viewport().canvas, Size::new(1080.0, 1080.0));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut editor = editor();
        let a = editor.add(rect(0.0, 0.0, 10.0, 10.0));

        assert!(editor.load_project_json("{broken").is_err());
        assert!(editor.load_project_encoded("???").is_err());
        assert!(editor.get(a).is_some());
        assert!(editor.can_undo());
    }

    #[test]
    fn test_project_roundtrip_through_editor() {
        let mut editor = editor();
        editor.add(rect(5.0, 5.0, 10.0, 10.0));
        let encoded = editor.to_project().to_encoded().unwrap();

        let mut other = Editor::default();
        other.load_project_encoded(&encoded).unwrap();
        assert_eq!(other.elements(), editor.elements());
    }
}
