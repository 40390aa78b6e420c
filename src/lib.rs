//! OVAT - Ophthalmic Viewing and Annotation Tool
//!
//! State engine for a four-quadrant retinal image workspace: per-image zoom,
//! rotation, and pan, plus normalized bounding box annotation with undo and
//! machine-detection import. Rendering and persistence belong to the host.

pub mod canvas;
pub mod config;
pub mod constants;
pub mod detect;
pub mod editor;
pub mod gesture;
pub mod model;
pub mod undo;
pub mod viewport;
pub mod workspace;

pub use canvas::{ImageCanvas, MarkTool, Rect};
pub use config::{AppConfig, ConfigError, LogLevel, UserPreferences};
pub use detect::{DetectError, DetectionPayload, parse_detections};
pub use editor::BoxEditor;
pub use gesture::{DragPayload, DrawState, ResizeState};
pub use model::{BoundingBox, Eye, ImageRef, LabelPreset, Modality, default_labels};
pub use undo::{Command, UndoStack};
pub use viewport::{Rotation, Viewport};
pub use workspace::Workspace;
