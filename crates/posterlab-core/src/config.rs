//! Editor tuning knobs.

use serde::{Deserialize, Serialize};

/// Snap distance in canvas units. A candidate snaps when strictly closer than this.
pub const SNAP_THRESHOLD: f64 = 5.0;
/// Extension of a guide line past the boxes it connects.
pub const GUIDE_PADDING: f64 = 10.0;
/// Minimum guide span before a gap label is shown.
pub const GUIDE_LABEL_MIN_SPAN: f64 = 20.0;
/// Number of snapshots kept by the history.
pub const HISTORY_CAPACITY: usize = 50;
/// Offset applied to duplicated elements on both axes.
pub const DUPLICATE_OFFSET: f64 = 20.0;
/// Smallest width or height an interactive resize may produce.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Runtime configuration for an [`Editor`](crate::Editor).
///
/// Missing fields in JSON fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub snap_threshold: f64,
    pub guide_padding: f64,
    pub guide_label_min_span: f64,
    pub history_capacity: usize,
    pub duplicate_offset: f64,
    pub min_element_size: f64,
    /// Arrow key nudge in canvas units.
    pub nudge_step: f64,
    /// Arrow key nudge with Shift held.
    pub nudge_step_large: f64,
    pub snapping_enabled: bool,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD,
            guide_padding: GUIDE_PADDING,
            guide_label_min_span: GUIDE_LABEL_MIN_SPAN,
            history_capacity: HISTORY_CAPACITY,
            duplicate_offset: DUPLICATE_OFFSET,
            min_element_size: MIN_ELEMENT_SIZE,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            snapping_enabled: true,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.snap_threshold, 5.0);
        assert_eq!(config.history_capacity, 50);
        assert!(config.snapping_enabled);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"snap_threshold": 8.0, "snapping_enabled": false}"#).unwrap();
        assert_eq!(config.snap_threshold, 8.0);
        assert!(!config.snapping_enabled);
        assert_eq!(config.duplicate_offset, DUPLICATE_OFFSET);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig {
            max_zoom: 4.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
