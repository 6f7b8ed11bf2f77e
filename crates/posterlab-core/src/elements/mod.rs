//! Element definitions for the poster canvas.

/// Copy every `Some` field of `$src` over the same field of `$dst`.
macro_rules! merge_fields {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$src.$field {
                $dst.$field = Some(value.clone());
            }
        )+
    };
}

mod group;
mod style;

pub use group::Group;
pub use style::{
    BlendMode, Crop, ElementStyle, SerializableColor, Shadow, ShapeType, TextAlign,
    TextDecoration, TextTransform,
};

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Font size assumed for text without an explicit `font_size`.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Line height multiplier assumed for text without an explicit `line_height`.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;
/// Average advance of one glyph as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f64 = 0.6;

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Text {
        #[serde(default)]
        content: String,
    },
    Image {
        src: String,
    },
    Shape {
        #[serde(default)]
        shape_type: ShapeType,
    },
    Group(Group),
}

impl ElementKind {
    /// Short lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Shape { .. } => "shape",
            ElementKind::Group(_) => "group",
        }
    }
}

/// One placeable scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Top-left anchor in canvas coordinates. Relative to the parent for group children.
    pub position: Point,
    /// Box size. Text may leave this unset and size itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub style: ElementStyle,
    /// Paint order among siblings, lower paints first.
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub locked: bool,
}

impl Element {
    /// Create a new element with a fresh id.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            size: None,
            style: ElementStyle::default(),
            order: 0,
            hidden: false,
            locked: false,
        }
    }

    /// Create an auto-sized text element.
    pub fn text(content: impl Into<String>, position: Point) -> Self {
        Self::new(
            ElementKind::Text {
                content: content.into(),
            },
            position,
        )
    }

    pub fn image(src: impl Into<String>, position: Point, size: Size) -> Self {
        Self::new(ElementKind::Image { src: src.into() }, position).with_size(size)
    }

    pub fn shape(shape_type: ShapeType, position: Point, size: Size) -> Self {
        Self::new(ElementKind::Shape { shape_type }, position).with_size(size)
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Width and height, zero for auto-sized elements.
    pub fn size_or_zero(&self) -> Size {
        self.size.unwrap_or(Size::ZERO)
    }

    /// Rough box for an auto-sized element before the renderer has measured it.
    ///
    /// Text gets an average glyph width per character and one line box per line.
    /// Other kinds use their own size.
    pub fn estimated_size(&self) -> Size {
        match &self.kind {
            ElementKind::Text { content } if self.size.is_none() => {
                let font_size = self.style.font_size.unwrap_or(DEFAULT_FONT_SIZE);
                let line_height = self.style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);
                let lines = content.lines().count().max(1);
                let longest = content.lines().map(|line| line.chars().count()).max().unwrap_or(0);
                Size::new(
                    longest as f64 * font_size * AVERAGE_GLYPH_WIDTH,
                    lines as f64 * font_size * line_height,
                )
            }
            _ => self.size_or_zero(),
        }
    }

    /// Axis-aligned box in the coordinate space of the element's parent.
    ///
    /// Rotation is ignored. An element without a size is a point at its position.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size_or_zero())
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.style.rotation()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ElementKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            ElementKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Whether this element takes part in move/resize/snap.
    pub fn is_interactive(&self) -> bool {
        !self.locked && !self.hidden
    }

    /// Translate the element by a canvas delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Give this element, and every nested child, a new unique id.
    pub fn regenerate_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let ElementKind::Group(group) = &mut self.kind {
            for child in &mut group.children {
                child.regenerate_ids();
            }
        }
    }

    /// Shallow-merge a partial update into this element.
    ///
    /// Kind-specific fields are ignored when they do not match the element's kind.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        match &mut self.kind {
            ElementKind::Text { content } => {
                if let Some(new_content) = &patch.content {
                    content.clone_from(new_content);
                }
            }
            ElementKind::Image { src } => {
                if let Some(new_src) = &patch.src {
                    src.clone_from(new_src);
                }
            }
            ElementKind::Shape { shape_type } => {
                if let Some(new_type) = patch.shape_type {
                    *shape_type = new_type;
                }
            }
            ElementKind::Group(_) => {}
        }
    }
}

/// Partial update of an element's own fields. Style changes go through
/// [`ElementStyle::merge`] instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub content: Option<String>,
    pub src: Option<String>,
    pub shape_type: Option<ShapeType>,
    pub hidden: Option<bool>,
    pub locked: Option<bool>,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }
}

/// Union of element bounds, `None` for an empty iterator.
pub fn union_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements.into_iter().fold(None, |acc, element| {
        let bounds = element.bounds();
        Some(match acc {
            Some(r) => r.union(bounds),
            None => bounds,
        })
    })
}
