//! PosterLab Core Library
//!
//! Platform-agnostic scene-graph engine for the PosterLab poster editor:
//! the element model, undo history, snapping, pointer transforms, grouping
//! and alignment, plus project persistence.

pub mod align;
pub mod canvas;
pub mod config;
pub mod editor;
pub mod elements;
pub mod events;
pub mod history;
pub mod input;
pub mod project;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod transform;
pub mod viewport;

pub use align::{AlignEdge, align_elements, selection_bounds};
pub use canvas::{CanvasBackground, CanvasDocument, CanvasSettings, ReorderDirection, Selection};
pub use config::EditorConfig;
pub use editor::Editor;
pub use elements::{Element, ElementId, ElementKind, ElementPatch, ElementStyle, Group, SerializableColor, ShapeType};
pub use events::{EditorEvent, SubscriptionId};
pub use history::History;
pub use input::{KeyInput, Modifiers, MouseButton, PointerEvent, PointerPhase};
pub use project::{Project, ProjectError};
pub use shortcuts::{EditorCommand, NudgeDirection, Shortcut, ShortcutRegistry};
pub use snap::{GuideAxis, SnapGuide, SnapOutcome, SnapTarget, compute_snap};
pub use storage::{AutoSaveManager, MemoryStorage, Storage, StorageError, StorageResult};
pub use transform::{ResizeHandle, TransformController, TransformKind, TransformState};
pub use viewport::Viewport;
