//! Import of machine detections from diagnostic model responses.
//!
//! The model's reply is free-form text with the detection payload wrapped
//! in sentinel markers. Import extracts the span between the markers,
//! parses it as JSON, and clamps every box into bounds. A declared length
//! that disagrees with the delivered list is logged and otherwise ignored;
//! absent or out-of-order markers fail the import.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::detect;
use crate::model::BoundingBox;

/// Errors raised while importing detections.
#[derive(Error, Debug)]
pub enum DetectError {
    /// Response carried no usable marker pair
    #[error("detection markers missing or out of order")]
    MissingMarkers,

    /// JSON between the markers failed to parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Detection list as the model emits it: a declared count plus the boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionPayload {
    /// Number of detections the model claims to have found
    pub length: usize,
    /// The detections themselves
    pub data: Vec<BoundingBox>,
}

/// Extract and parse the detection payload out of a raw model response.
///
/// Returns the boxes clamped into normalized bounds, ready for
/// [`crate::editor::BoxEditor::replace_all`].
pub fn parse_detections(raw: &str) -> Result<Vec<BoundingBox>, DetectError> {
    let (Some(start), Some(end)) = (raw.find(detect::BEGIN_MARKER), raw.find(detect::END_MARKER))
    else {
        return Err(DetectError::MissingMarkers);
    };
    let body_start = start + detect::BEGIN_MARKER.len();
    if body_start > end {
        return Err(DetectError::MissingMarkers);
    }

    let payload: DetectionPayload = serde_json::from_str(raw[body_start..end].trim())?;
    if payload.length != payload.data.len() {
        log::warn!(
            "⚠️ Detection payload declares {} boxes but carries {}",
            payload.length,
            payload.data.len()
        );
    }

    let mut boxes = payload.data;
    for bbox in &mut boxes {
        bbox.clamp_to_bounds();
    }
    log::info!("📥 Imported {} detections", boxes.len());
    Ok(boxes)
}
