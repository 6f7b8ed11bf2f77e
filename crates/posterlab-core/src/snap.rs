//! Alignment snapping of a moving box against the canvas and sibling elements.

use crate::config::EditorConfig;
use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A box that a moving element may align to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub id: ElementId,
    pub rect: Rect,
    pub hidden: bool,
    pub locked: bool,
}

impl SnapTarget {
    pub fn from_element(element: &Element) -> Self {
        Self {
            id: element.id(),
            rect: element.bounds(),
            hidden: element.hidden,
            locked: element.locked,
        }
    }

    fn is_candidate(&self, exclude: &[ElementId]) -> bool {
        !self.hidden && !self.locked && !exclude.contains(&self.id)
    }
}

/// Snap targets for a slice of sibling elements.
pub fn snap_targets(elements: &[Element]) -> Vec<SnapTarget> {
    elements.iter().map(SnapTarget::from_element).collect()
}

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideAxis {
    /// Constant x, produced by snapping on the X axis.
    Vertical,
    /// Constant y, produced by snapping on the Y axis.
    Horizontal,
}

/// A transient guide line to draw while dragging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: GuideAxis,
    /// The x (vertical) or y (horizontal) of the line.
    pub position: f64,
    /// Extent along the perpendicular axis, padding included.
    pub start: f64,
    pub end: f64,
    /// Rounded gap between the two boxes, when they are apart.
    pub label: Option<f64>,
    pub label_position: Point,
}

/// Result of [`compute_snap`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    /// Adjusted top-left of the candidate box.
    pub position: Point,
    /// At most one guide per axis.
    pub guides: Vec<SnapGuide>,
}

impl SnapOutcome {
    fn none(position: Point) -> Self {
        Self {
            position,
            guides: Vec::new(),
        }
    }

    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }

    pub fn guide(&self, axis: GuideAxis) -> Option<&SnapGuide> {
        self.guides.iter().find(|g| g.axis == axis)
    }
}

/// The canvas or a sibling, projected onto one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    len: f64,
    /// Extent on the perpendicular axis.
    cross: (f64, f64),
    is_canvas: bool,
}

impl Span {
    fn stops(&self) -> [f64; 3] {
        [self.start, self.start + self.len / 2.0, self.start + self.len]
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisMatch {
    distance: f64,
    /// New start of the candidate on this axis.
    snapped_start: f64,
    line: f64,
    target: Span,
}

/// Snap a candidate box against the canvas and the given siblings.
///
/// Each axis is resolved independently. Near edge, center and far edge of the
/// candidate are compared with the same three stops of the canvas, then of
/// every sibling that is not hidden, locked or excluded. The closest pair
/// strictly under the threshold wins; on ties the first pair enumerated wins.
pub fn compute_snap(
    candidate: Rect,
    targets: &[SnapTarget],
    canvas: Size,
    exclude: &[ElementId],
    config: &EditorConfig,
) -> SnapOutcome {
    let origin = candidate.origin();
    let live: Vec<&SnapTarget> = targets.iter().filter(|t| t.is_candidate(exclude)).collect();

    let x_spans: Vec<Span> = std::iter::once(Span {
        start: 0.0,
        len: canvas.width,
        cross: (0.0, canvas.height),
        is_canvas: true,
    })
    .chain(live.iter().map(|t| Span {
        start: t.rect.x0,
        len: t.rect.width(),
        cross: (t.rect.y0, t.rect.y1),
        is_canvas: false,
    }))
    .collect();
    let y_spans: Vec<Span> = std::iter::once(Span {
        start: 0.0,
        len: canvas.height,
        cross: (0.0, canvas.width),
        is_canvas: true,
    })
    .chain(live.iter().map(|t| Span {
        start: t.rect.y0,
        len: t.rect.height(),
        cross: (t.rect.x0, t.rect.x1),
        is_canvas: false,
    }))
    .collect();

    let moving_x = Span {
        start: candidate.x0,
        len: candidate.width(),
        cross: (candidate.y0, candidate.y1),
        is_canvas: false,
    };
    let moving_y = Span {
        start: candidate.y0,
        len: candidate.height(),
        cross: (candidate.x0, candidate.x1),
        is_canvas: false,
    };

    let mut outcome = SnapOutcome::none(origin);

    if let Some(m) = best_match(&moving_x, &x_spans, config.snap_threshold) {
        log::trace!("snap x: {} -> {} (distance {})", origin.x, m.snapped_start, m.distance);
        outcome.position.x = m.snapped_start;
        outcome.guides.push(guide(GuideAxis::Vertical, &m, moving_x.cross, config));
    }
    if let Some(m) = best_match(&moving_y, &y_spans, config.snap_threshold) {
        log::trace!("snap y: {} -> {} (distance {})", origin.y, m.snapped_start, m.distance);
        outcome.position.y = m.snapped_start;
        outcome.guides.push(guide(GuideAxis::Horizontal, &m, moving_y.cross, config));
    }
    outcome
}

/// Offset between the candidate's original position and its snapped one.
pub fn snap_offset(candidate: Rect, outcome: &SnapOutcome) -> Vec2 {
    outcome.position - candidate.origin()
}

fn best_match(moving: &Span, targets: &[Span], threshold: f64) -> Option<AxisMatch> {
    let mut best: Option<AxisMatch> = None;
    let mut best_distance = threshold;

    for value in moving.stops() {
        // Shift from this stop back to the near edge
        let back = value - moving.start;
        for target in targets {
            for line in target.stops() {
                let distance = (value - line).abs();
                if distance < best_distance {
                    best_distance = distance;
                    best = Some(AxisMatch {
                        distance,
                        snapped_start: line - back,
                        line,
                        target: *target,
                    });
                }
            }
        }
    }
    best
}

fn guide(axis: GuideAxis, m: &AxisMatch, moving_cross: (f64, f64), config: &EditorConfig) -> SnapGuide {
    let (lo, hi, label) = if m.target.is_canvas {
        (m.target.cross.0, m.target.cross.1, None)
    } else {
        let (a0, a1) = moving_cross;
        let (b0, b1) = m.target.cross;
        let lo = a0.min(b0);
        let hi = a1.max(b1);
        let gap = a0.max(b0) - a1.min(b1);
        let label = (gap > 0.0 && hi - lo > config.guide_label_min_span).then(|| gap.round());
        (lo, hi, label)
    };

    let start = lo - config.guide_padding;
    let end = hi + config.guide_padding;
    let middle = (start + end) / 2.0;
    let label_position = match axis {
        GuideAxis::Vertical => Point::new(m.line, middle),
        GuideAxis::Horizontal => Point::new(middle, m.line),
    };

    SnapGuide {
        axis,
        position: m.line,
        start,
        end,
        label,
        label_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn target(x: f64, y: f64, w: f64, h: f64) -> SnapTarget {
        SnapTarget {
            id: Uuid::new_v4(),
            rect: Rect::new(x, y, x + w, y + h),
            hidden: false,
            locked: false,
        }
    }

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    const CANVAS: Size = Size {
        width: 1080.0,
        height: 1080.0,
    };

    #[test]
    fn test_no_targets_no_snap() {
        let config = EditorConfig::default();
        let candidate = boxed(100.0, 133.0, 50.0, 50.0);
        let outcome = compute_snap(candidate, &[], CANVAS, &[], &config);
        assert_eq!(outcome.position, Point::new(100.0, 133.0));
        assert!(!outcome.is_snapped());
    }

    #[test]
    fn test_threshold_boundary() {
        let config = EditorConfig::default();
        let eps = 1e-6;
        // Target left edge at 400, candidate left edge near it
        let targets = [target(400.0, 600.0, 100.0, 100.0)];

        let near = boxed(400.0 - (5.0 - eps), 133.0, 37.0, 37.0);
        let outcome = compute_snap(near, &targets, CANVAS, &[], &config);
        assert!((outcome.position.x - 400.0).abs() < 1e-9);
        assert_eq!(outcome.guide(GuideAxis::Vertical).unwrap().position, 400.0);

        let far = boxed(400.0 - (5.0 + eps), 133.0, 37.0, 37.0);
        let outcome = compute_snap(far, &targets, CANVAS, &[], &config);
        assert_eq!(outcome.position.x, far.x0);
        assert!(outcome.guide(GuideAxis::Vertical).is_none());
    }

    #[test]
    fn test_exact_threshold_does_not_snap() {
        let config = EditorConfig::default();
        let targets = [target(400.0, 600.0, 100.0, 100.0)];
        let candidate = boxed(395.0, 133.0, 37.0, 37.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        assert_eq!(outcome.position.x, 395.0);
    }

    #[test]
    fn test_closest_pair_wins() {
        let config = EditorConfig::default();
        let targets = [target(300.0, 600.0, 100.0, 100.0), target(203.0, 800.0, 10.0, 10.0)];
        // Right edge 298 is 2 from 300; left edge 201 is 2 from 203 (tie, left edge first)
        let candidate = boxed(201.0, 133.0, 97.0, 37.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        assert_eq!(outcome.position.x, 203.0);

        // Nudge so the right edge is strictly closer
        let candidate = boxed(200.0, 133.0, 99.5, 37.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        assert!((outcome.position.x - 200.5).abs() < 1e-9);
    }

    #[test]
    fn test_canvas_enumerated_first() {
        let config = EditorConfig::default();
        // Sibling center line coincides with the canvas center
        let targets = [target(520.0, 800.0, 40.0, 40.0)];
        let candidate = boxed(533.0, 133.0, 10.0, 37.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        let guide = outcome.guide(GuideAxis::Vertical).unwrap();
        // Canvas guide spans the whole canvas
        assert_eq!(guide.start, -10.0);
        assert_eq!(guide.end, 1090.0);
        assert!(guide.label.is_none());
    }

    #[test]
    fn test_excluded_hidden_locked_ignored() {
        let config = EditorConfig::default();
        let mut hidden = target(400.0, 600.0, 100.0, 100.0);
        hidden.hidden = true;
        let mut locked = target(400.0, 600.0, 100.0, 100.0);
        locked.locked = true;
        let excluded = target(400.0, 600.0, 100.0, 100.0);

        let candidate = boxed(402.0, 133.0, 37.0, 37.0);
        let outcome = compute_snap(candidate, &[hidden, locked, excluded], CANVAS, &[excluded.id], &config);
        assert_eq!(outcome.position.x, 402.0);
    }

    #[test]
    fn test_both_axes() {
        let config = EditorConfig::default();
        let targets = [target(300.0, 300.0, 100.0, 100.0)];
        let candidate = boxed(302.0, 403.0, 50.0, 50.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        assert_eq!(outcome.position, Point::new(300.0, 400.0));
        assert_eq!(outcome.guides.len(), 2);
        assert_eq!(snap_offset(candidate, &outcome), Vec2::new(-2.0, -3.0));
    }

    #[test]
    fn test_gap_label() {
        let config = EditorConfig::default();
        let targets = [target(300.0, 300.0, 100.0, 100.0)];

        // Vertically apart: 400..460 gap
        let candidate = boxed(302.0, 460.0, 50.0, 50.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        let guide = outcome.guide(GuideAxis::Vertical).unwrap();
        assert_eq!(guide.label, Some(60.0));
        assert_eq!(guide.start, 290.0);
        assert_eq!(guide.end, 520.0);
        assert_eq!(guide.label_position, Point::new(300.0, 405.0));

        // Overlapping vertically: no label
        let candidate = boxed(302.0, 350.0, 50.0, 50.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        assert!(outcome.guide(GuideAxis::Vertical).unwrap().label.is_none());
    }

    #[test]
    fn test_label_needs_min_span() {
        let config = EditorConfig::default();
        let targets = [target(300.0, 300.0, 100.0, 5.0)];
        let candidate = boxed(302.0, 310.0, 50.0, 5.0);
        let outcome = compute_snap(candidate, &targets, CANVAS, &[], &config);
        // Span 300..315 is below the label minimum
        assert!(outcome.guide(GuideAxis::Vertical).unwrap().label.is_none());
    }

    #[test]
    fn test_edge_to_edge_scenario() {
        let config = EditorConfig::default();
        let b = target(96.0, 200.0, 100.0, 100.0);

        let outcome = compute_snap(boxed(90.0, 0.0, 100.0, 100.0), &[b], CANVAS, &[], &config);
        assert_eq!(outcome.position.x, 90.0);
        assert!(outcome.guide(GuideAxis::Vertical).is_none());

        let outcome = compute_snap(boxed(92.0, 0.0, 100.0, 100.0), &[b], CANVAS, &[], &config);
        assert_eq!(outcome.position.x, 96.0);
        let vertical: Vec<_> = outcome.guides.iter().filter(|g| g.axis == GuideAxis::Vertical).collect();
        assert_eq!(vertical.len(), 1);
        assert_eq!(vertical[0].position, 96.0);
    }
}
