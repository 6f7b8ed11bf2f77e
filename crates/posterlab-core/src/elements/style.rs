//! Style attributes attached to every element.

use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8), stored as a `#rrggbb[aa]` string.
///
/// Deserialization also accepts the CSS `rgb()`/`rgba()` notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The keyword `transparent` is accepted too.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parse a hex color, `transparent`, or a CSS `rgb()`/`rgba()` function.
    pub fn parse(color: &str) -> Option<Self> {
        Self::from_hex(color).or_else(|| Self::from_css_rgb(color))
    }

    /// Parse `rgb(r, g, b)` or `rgba(r, g, b, a)`, comma or space separated.
    ///
    /// Channels are 0-255 or percentages; alpha is 0-1 or a percentage and may
    /// follow a `/`.
    pub fn from_css_rgb(color: &str) -> Option<Self> {
        let color = color.trim();
        let lower = color.to_ascii_lowercase();
        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if !(3..=4).contains(&parts.len()) {
            return None;
        }

        let channel = |part: &str| -> Option<u8> {
            let value = match part.strip_suffix('%') {
                Some(percent) => percent.parse::<f64>().ok()? / 100.0 * 255.0,
                None => part.parse::<f64>().ok()?,
            };
            Some(value.clamp(0.0, 255.0).round() as u8)
        };
        let alpha = match parts.get(3) {
            Some(part) => {
                let value = match part.strip_suffix('%') {
                    Some(percent) => percent.parse::<f64>().ok()? / 100.0,
                    None => part.parse::<f64>().ok()?,
                };
                (value.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        Some(Self::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

/// Shape outline for `shape` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Hexagon,
}

/// Compositing mode used when painting an element over what is below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Difference,
    Exclusion,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

/// Drop shadow. Absent sub-fields keep their previous value when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f64>,
}

impl Shadow {
    fn merge(&mut self, patch: &Shadow) {
        merge_fields!(self, patch, blur, color, offset_x, offset_y);
    }
}

/// Image crop window: zoom factor plus pan offset, in percent of the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Crop {
    fn merge(&mut self, patch: &Crop) {
        merge_fields!(self, patch, scale, x, y);
    }
}

/// Open attribute bag of an element.
///
/// Every attribute is optional. Absent attributes take the default returned by
/// the matching accessor (`opacity()` is 1, `rotation()` is 0, filters are neutral).
/// The same type doubles as the partial used by [`ElementStyle::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Rotation in degrees, clockwise, around the element centre. Unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<SerializableColor>,

    // Filters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue_rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,

    // Text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke_color: Option<SerializableColor>,
}

impl ElementStyle {
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotate.unwrap_or(0.0)
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode.unwrap_or_default()
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x.unwrap_or(false)
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y.unwrap_or(false)
    }

    /// Filter value with its neutral default: 100 (percent) for brightness,
    /// contrast and saturate, 0 for everything else.
    pub fn brightness(&self) -> f64 {
        self.brightness.unwrap_or(100.0)
    }

    pub fn contrast(&self) -> f64 {
        self.contrast.unwrap_or(100.0)
    }

    pub fn saturate(&self) -> f64 {
        self.saturate.unwrap_or(100.0)
    }

    pub fn blur(&self) -> f64 {
        self.blur.unwrap_or(0.0)
    }

    /// Shallow-merge `patch` into this style.
    ///
    /// Present attributes overwrite. `shadow` and `crop` merge one level deeper so
    /// sub-fields missing from the patch survive.
    pub fn merge(&mut self, patch: &ElementStyle) {
        merge_fields!(
            self,
            patch,
            opacity,
            rotate,
            color,
            background_color,
            border_radius,
            border_width,
            border_color,
            blur,
            grayscale,
            sepia,
            brightness,
            contrast,
            saturate,
            hue_rotate,
            invert,
            blend_mode,
            flip_x,
            flip_y,
            font_size,
            font_family,
            font_weight,
            font_style,
            text_align,
            line_height,
            letter_spacing,
            text_decoration,
            text_transform,
            text_stroke_width,
            text_stroke_color,
        );

        if let Some(shadow) = &patch.shadow {
            self.shadow.get_or_insert_with(Shadow::default).merge(shadow);
        }
        if let Some(crop) = &patch.crop {
            self.crop.get_or_insert_with(Crop::default).merge(crop);
        }
    }
}
