//! Persisted project layout and schema migration.

use crate::canvas::{CanvasDocument, CanvasSettings};
use crate::elements::{Element, ElementStyle};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// Marker every project file carries.
pub const PROJECT_HEADER: &str = "POSTERLABS_V1";
/// Schema version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

/// Errors when reading a project blob.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Not a PosterLab project (header {0:?})")]
    InvalidHeader(String),
    #[error("Unsupported project version {0}")]
    UnsupportedVersion(u32),
    #[error("Malformed project: {0}")]
    Malformed(String),
}

/// A saved poster: canvas settings plus the element collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub header: String,
    pub version: u32,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub canvas: CanvasSettings,
    pub elements: Vec<Element>,
}

impl Project {
    pub fn new(canvas: CanvasSettings, elements: Vec<Element>) -> Self {
        Self {
            header: PROJECT_HEADER.to_string(),
            version: CURRENT_VERSION,
            created_at: now_millis(),
            canvas,
            elements,
        }
    }

    pub fn from_document(doc: &CanvasDocument) -> Self {
        Self::new(doc.settings.clone(), doc.elements().to_vec())
    }

    pub fn into_document(self) -> CanvasDocument {
        CanvasDocument::with_elements(self.canvas, self.elements)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a project of any supported version, upgrading it to the current schema.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let value: Value = serde_json::from_str(json)?;
        let value = migrate(value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// The portable `.posterLabs` form: base64 of the project JSON.
    pub fn to_encoded(&self) -> Result<String, ProjectError> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    pub fn from_encoded(data: &str) -> Result<Self, ProjectError> {
        let bytes = STANDARD.decode(data.trim())?;
        let json = String::from_utf8(bytes).map_err(|e| ProjectError::Malformed(e.to_string()))?;
        Self::from_json(&json)
    }
}

/// Upgrade a raw project value to [`CURRENT_VERSION`].
///
/// A missing `version` field means version 0: camelCase style keys, `x`/`y`
/// on the element, width and height inside `style`, free-form ids and no
/// `order`.
pub fn migrate(value: Value) -> Result<Value, ProjectError> {
    let Value::Object(mut root) = value else {
        return Err(ProjectError::Malformed("project is not an object".into()));
    };

    let header = root.get("header").and_then(Value::as_str).unwrap_or_default();
    if header != PROJECT_HEADER {
        return Err(ProjectError::InvalidHeader(header.to_string()));
    }

    let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
    match version {
        0 => {
            log::info!("migrating project from version 0 to {CURRENT_VERSION}");
            root = migrate_v0(root)?;
        }
        1 => {}
        other => return Err(ProjectError::UnsupportedVersion(u32::try_from(other).unwrap_or(u32::MAX))),
    }
    Ok(Value::Object(root))
}

fn migrate_v0(mut root: Map<String, Value>) -> Result<Map<String, Value>, ProjectError> {
    let created_at = root.remove("createdAt").unwrap_or_else(|| Value::from(0u64));
    root.insert("created_at".into(), created_at);

    let elements = match root.remove("elements") {
        Some(Value::Array(items)) => items,
        None => Vec::new(),
        Some(_) => return Err(ProjectError::Malformed("elements is not a list".into())),
    };
    let upgraded = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| upgrade_element_v0(element, index))
        .collect::<Result<Vec<_>, _>>()?;

    root.insert("elements".into(), Value::Array(upgraded));
    root.insert("version".into(), Value::from(CURRENT_VERSION));
    Ok(root)
}

/// Legacy style key to current key.
const STYLE_KEYS: &[(&str, &str)] = &[
    ("fontSize", "font_size"),
    ("fontFamily", "font_family"),
    ("fontWeight", "font_weight"),
    ("fontStyle", "font_style"),
    ("textAlign", "text_align"),
    ("lineHeight", "line_height"),
    ("letterSpacing", "letter_spacing"),
    ("backgroundColor", "background_color"),
    ("borderRadius", "border_radius"),
    ("borderWidth", "border_width"),
    ("borderColor", "border_color"),
    ("hueRotate", "hue_rotate"),
    ("mixBlendMode", "blend_mode"),
    ("flipX", "flip_x"),
    ("flipY", "flip_y"),
    ("textDecoration", "text_decoration"),
    ("textTransform", "text_transform"),
    ("webkitTextStrokeWidth", "text_stroke_width"),
    ("webkitTextStrokeColor", "text_stroke_color"),
];

fn upgrade_element_v0(value: Value, index: usize) -> Result<Value, ProjectError> {
    let Value::Object(mut element) = value else {
        return Err(ProjectError::Malformed(format!("element {index} is not an object")));
    };

    // Legacy ids are timestamps
    let id = element
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    element.insert("id".into(), Value::from(id.to_string()));

    let x = element.remove("x").and_then(|v| v.as_f64()).unwrap_or(0.0);
    let y = element.remove("y").and_then(|v| v.as_f64()).unwrap_or(0.0);
    element.insert("position".into(), serde_json::json!({ "x": x, "y": y }));

    let mut style = match element.remove("style") {
        Some(Value::Object(style)) => style,
        _ => Map::new(),
    };

    let width = style.remove("width").and_then(|v| v.as_f64());
    let height = style.remove("height").and_then(|v| v.as_f64());
    if width.is_some() || height.is_some() {
        element.insert(
            "size".into(),
            serde_json::json!({ "width": width.unwrap_or(0.0), "height": height.unwrap_or(0.0) }),
        );
    }

    if let Some(shape_type) = style.remove("shapeType") {
        element.insert("shape_type".into(), kebab_to_snake(shape_type));
    }
    if element.get("type").and_then(Value::as_str) == Some("shape") {
        let valid = element
            .get("shape_type")
            .is_some_and(|v| serde_json::from_value::<crate::elements::ShapeType>(v.clone()).is_ok());
        if !valid {
            element.remove("shape_type");
        }
    }

    element.insert("style".into(), Value::Object(upgrade_style_v0(style, index)));
    element.insert("order".into(), Value::from(index));
    Ok(Value::Object(element))
}

fn upgrade_style_v0(style: Map<String, Value>, index: usize) -> Map<String, Value> {
    let mut upgraded = Map::new();
    for (key, value) in style {
        let key = STYLE_KEYS
            .iter()
            .find(|(old, _)| *old == key)
            .map_or(key.as_str(), |&(_, new)| new)
            .to_string();

        let value = match key.as_str() {
            "letter_spacing" | "border_radius" => leading_number(value),
            "font_weight" if value.is_number() => Value::from(value.to_string()),
            "text_decoration" | "blend_mode" => kebab_to_snake(value),
            "shadow" => upgrade_shadow_v0(value),
            _ => value,
        };

        // Drop what the current schema cannot represent
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        if serde_json::from_value::<ElementStyle>(Value::Object(single)).is_ok() {
            upgraded.insert(key, value);
        } else {
            log::warn!("element {index}: dropping style {key} = {value}");
        }
    }
    upgraded
}

fn upgrade_shadow_v0(value: Value) -> Value {
    match value {
        Value::Object(shadow) => Value::Object(
            shadow
                .into_iter()
                .map(|(key, value)| match key.as_str() {
                    "offsetX" => ("offset_x".to_string(), value),
                    "offsetY" => ("offset_y".to_string(), value),
                    _ => (key, value),
                })
                .collect(),
        ),
        other => other,
    }
}

/// `"2px"` or `"50%"` to a number. Numbers and unparsable strings pass through.
fn leading_number(value: Value) -> Value {
    let parsed = value.as_str().and_then(|text| {
        let end = text
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
            .map_or(text.len(), |(i, _)| i);
        text[..end].parse::<f64>().ok()
    });
    parsed.map(Value::from).unwrap_or(value)
}

fn kebab_to_snake(value: Value) -> Value {
    let replaced = value.as_str().map(|text| text.replace('-', "_"));
    replaced.map(Value::from).unwrap_or(value)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
