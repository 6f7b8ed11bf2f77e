//! Pointer-driven move, resize and rotate gestures.

use crate::canvas::CanvasDocument;
use crate::config::EditorConfig;
use crate::elements::ElementId;
use crate::snap::{SnapGuide, compute_snap, snap_targets};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 24.0;
/// Distance from the top edge to the rotation handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Which edges a resize drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    Corner(Corner),
    Edge(Edge),
}

impl ResizeHandle {
    /// Parse a compact handle code such as `"tl"`, `"r"` or `"b"`.
    pub fn from_code(code: &str) -> Option<Self> {
        let handle = match code {
            "tl" | "lt" => ResizeHandle::Corner(Corner::TopLeft),
            "tr" | "rt" => ResizeHandle::Corner(Corner::TopRight),
            "bl" | "lb" => ResizeHandle::Corner(Corner::BottomLeft),
            "br" | "rb" => ResizeHandle::Corner(Corner::BottomRight),
            "t" => ResizeHandle::Edge(Edge::Top),
            "r" => ResizeHandle::Edge(Edge::Right),
            "b" => ResizeHandle::Edge(Edge::Bottom),
            "l" => ResizeHandle::Edge(Edge::Left),
            _ => return None,
        };
        Some(handle)
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopLeft | Corner::TopRight) | ResizeHandle::Edge(Edge::Top)
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::BottomLeft | Corner::BottomRight) | ResizeHandle::Edge(Edge::Bottom)
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopLeft | Corner::BottomLeft) | ResizeHandle::Edge(Edge::Left)
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::Corner(Corner::TopRight | Corner::BottomRight) | ResizeHandle::Edge(Edge::Right)
        )
    }
}

/// Type of gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    Move,
    Resize(ResizeHandle),
    Rotate,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Resize(ResizeHandle),
    /// Rotation handle (positioned above the element).
    Rotate,
}

impl HandleKind {
    pub fn transform_kind(self) -> TransformKind {
        match self {
            HandleKind::Resize(handle) => TransformKind::Resize(handle),
            HandleKind::Rotate => TransformKind::Rotate,
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    /// `tolerance` should be adjusted for the view scale.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Corner, edge-midpoint and rotation handles for an element box.
///
/// `rotate_offset` is the rotation handle's distance above the top edge, in canvas units.
pub fn handles(bounds: Rect, rotate_offset: f64) -> Vec<Handle> {
    let center = bounds.center();
    let corner = |c| HandleKind::Resize(ResizeHandle::Corner(c));
    let edge = |e| HandleKind::Resize(ResizeHandle::Edge(e));
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), corner(Corner::BottomRight)),
        Handle::new(Point::new(center.x, bounds.y0), edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, center.y), edge(Edge::Right)),
        Handle::new(Point::new(center.x, bounds.y1), edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, center.y), edge(Edge::Left)),
        Handle::new(Point::new(center.x, bounds.y0 - rotate_offset), HandleKind::Rotate),
    ]
}

/// Find which handle (if any) is hit at the given canvas point.
///
/// With `resizable` false only the rotation handle is considered.
pub fn hit_test_handles(
    bounds: Rect,
    point: Point,
    rotate_offset: f64,
    tolerance: f64,
    resizable: bool,
) -> Option<HandleKind> {
    handles(bounds, rotate_offset)
        .into_iter()
        .filter(|h| resizable || h.kind == HandleKind::Rotate)
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Snapshot of everything a gesture needs from its starting state.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub kind: TransformKind,
    /// Element the gesture was started on.
    pub target: ElementId,
    /// Pointer position at start, in screen coordinates.
    pub start_pointer: Point,
    pub initial_position: Point,
    pub initial_size: Size,
    pub initial_rotation: f64,
    /// Every element moved by the gesture with its starting position.
    pub initial_positions: Vec<(ElementId, Point)>,
    /// Union box of the moved elements at start; the snap candidate for moves.
    pub selection_bounds: Rect,
}

impl Gesture {
    pub fn moved_ids(&self) -> Vec<ElementId> {
        self.initial_positions.iter().map(|(id, _)| *id).collect()
    }
}

/// State of the transform state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransformState {
    #[default]
    Idle,
    Transforming(Gesture),
}

/// Turns pointer movement into element updates.
///
/// Updates during a gesture mutate the document directly; the owner commits
/// history once when [`TransformController::end`] reports a finished gesture.
#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: TransformState,
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransformState::Transforming(_))
    }

    pub fn kind(&self) -> Option<TransformKind> {
        match &self.state {
            TransformState::Transforming(g) => Some(g.kind),
            TransformState::Idle => None,
        }
    }

    /// Begin a gesture on `id`. Returns false (staying idle) if the element is
    /// missing or locked, or for a resize of an element without a size.
    ///
    /// A move started on a selected element carries the whole selection.
    pub fn start(&mut self, doc: &CanvasDocument, id: ElementId, kind: TransformKind, pointer: Point) -> bool {
        let Some(element) = doc.get(id) else {
            log::trace!("start transform: no element {id}");
            return false;
        };
        if element.locked {
            log::trace!("start transform: {id} is locked");
            return false;
        }
        if matches!(kind, TransformKind::Resize(_)) && element.size.is_none() {
            log::trace!("start transform: {id} sizes itself");
            return false;
        }

        let moved: Vec<ElementId> = if kind == TransformKind::Move && doc.selection().contains(id) {
            doc.selection().ids().to_vec()
        } else {
            vec![id]
        };
        let members: Vec<_> = moved
            .iter()
            .filter_map(|&m| doc.get(m))
            .filter(|e| e.is_interactive())
            .collect();
        let initial_positions = members.iter().map(|e| (e.id(), e.position)).collect();
        let selection_bounds = members
            .iter()
            .map(|e| doc.layout_bounds(e))
            .reduce(|a, b| a.union(b))
            .unwrap_or_else(|| doc.layout_bounds(element));

        log::debug!("start {kind:?} on {id}");
        self.state = TransformState::Transforming(Gesture {
            kind,
            target: id,
            start_pointer: pointer,
            initial_position: element.position,
            initial_size: element.size_or_zero(),
            initial_rotation: element.rotation(),
            initial_positions,
            selection_bounds,
        });
        true
    }

    /// Apply the pointer's current position. Returns the guides to draw,
    /// empty when idle or nothing snapped.
    pub fn update(
        &mut self,
        doc: &mut CanvasDocument,
        pointer: Point,
        viewport: &Viewport,
        config: &EditorConfig,
    ) -> Vec<SnapGuide> {
        let TransformState::Transforming(gesture) = &self.state else {
            return Vec::new();
        };
        let d = viewport.screen_delta_to_canvas(pointer - gesture.start_pointer);

        match gesture.kind {
            TransformKind::Move => apply_move(doc, gesture, d, config),
            TransformKind::Resize(handle) => {
                apply_resize(doc, gesture, handle, d, config.min_element_size);
                Vec::new()
            }
            TransformKind::Rotate => {
                if let Some(element) = doc.get_mut(gesture.target) {
                    element.style.rotate = Some(gesture.initial_rotation + d.x + d.y);
                }
                Vec::new()
            }
        }
    }

    /// Leave the transforming state. Returns the finished gesture, if one was active.
    pub fn end(&mut self) -> Option<Gesture> {
        match std::mem::take(&mut self.state) {
            TransformState::Transforming(gesture) => {
                log::debug!("end {:?} on {}", gesture.kind, gesture.target);
                Some(gesture)
            }
            TransformState::Idle => None,
        }
    }
}

fn apply_move(doc: &mut CanvasDocument, gesture: &Gesture, d: Vec2, config: &EditorConfig) -> Vec<SnapGuide> {
    let bounds = gesture.selection_bounds;
    let candidate = Rect::from_origin_size(bounds.origin() + d, bounds.size());

    let (delta, guides) = if config.snapping_enabled {
        let targets = snap_targets(doc.elements());
        let outcome = compute_snap(
            candidate,
            &targets,
            doc.settings.size(),
            &gesture.moved_ids(),
            config,
        );
        (outcome.position - bounds.origin(), outcome.guides)
    } else {
        (d, Vec::new())
    };

    for &(id, start) in &gesture.initial_positions {
        if let Some(element) = doc.get_mut(id) {
            element.position = start + delta;
        }
    }
    guides
}

fn apply_resize(doc: &mut CanvasDocument, gesture: &Gesture, handle: ResizeHandle, d: Vec2, min_size: f64) {
    let Some(element) = doc.get_mut(gesture.target) else {
        return;
    };
    let Size { width: w0, height: h0 } = gesture.initial_size;
    let Point { x: x0, y: y0 } = gesture.initial_position;
    let (mut w, mut h, mut x, mut y) = (w0, h0, x0, y0);

    if handle.moves_right() {
        w = (w0 + d.x).max(min_size);
    }
    if handle.moves_bottom() {
        h = (h0 + d.y).max(min_size);
    }
    if handle.moves_left() {
        w = (w0 - d.x).max(min_size);
        x = x0 + (w0 - w);
    }
    if handle.moves_top() {
        h = (h0 - d.y).max(min_size);
        y = y0 + (h0 - h);
    }

    element.position = Point::new(x, y);
    element.size = Some(Size::new(w, h));
}
