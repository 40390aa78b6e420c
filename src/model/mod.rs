//! Data models for the viewer: bounding boxes, image references, label
//! presets.

mod bbox;
mod image;
mod label;

pub use bbox::BoundingBox;
pub use image::{Eye, ImageRef, Modality};
pub use label::{LabelPreset, default_labels};
