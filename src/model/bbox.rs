//! Normalized bounding box annotations.
//!
//! Boxes live in normalized image coordinates: positions and sizes are
//! fractions of the displayed image's width/height in [0, 1]. Geometry is
//! clamped on every construction and mutation path, never rejected, so there
//! is no invalid-box state to handle downstream.

use serde::{Deserialize, Serialize};

use crate::constants::bbox::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_X, DEFAULT_Y, DROP_SIZE, FULL_CONFIDENCE, MIN_SIZE,
};

fn default_confidence() -> f32 {
    FULL_CONFIDENCE
}

/// A labeled rectangle marking a region of interest.
///
/// The serde field names match the detection payload's records, so imported
/// boxes deserialize directly into this type. Invariants after any mutation
/// method: `MIN_SIZE <= width`, `MIN_SIZE <= height`, `0 <= x`, `0 <= y`,
/// `x + width <= 1`, `y + height <= 1`, `0 <= confidence <= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge, fraction of image width
    pub x: f32,
    /// Top edge, fraction of image height
    pub y: f32,
    /// Extent along the image's x axis
    pub width: f32,
    /// Extent along the image's y axis
    pub height: f32,
    /// Free-text annotation label
    pub label: String,
    /// Detection confidence; hand-created boxes carry 1.0
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl BoundingBox {
    /// Create a box, clamping the geometry into bounds.
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        label: impl Into<String>,
        confidence: f32,
    ) -> Self {
        let mut bbox = Self {
            x,
            y,
            width,
            height,
            label: label.into(),
            confidence,
        };
        bbox.clamp_to_bounds();
        bbox
    }

    /// The fixed rectangle used when a box is added without a position.
    pub fn default_rect(label: impl Into<String>) -> Self {
        Self::new(
            DEFAULT_X,
            DEFAULT_Y,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            label,
            FULL_CONFIDENCE,
        )
    }

    /// A drop-sized box centered on a normalized point. Near an edge the box
    /// slides inward at full size rather than shrinking.
    pub fn centered_at(cx: f32, cy: f32, label: impl Into<String>) -> Self {
        let x = (cx - DROP_SIZE / 2.0).max(0.0).min(1.0 - DROP_SIZE);
        let y = (cy - DROP_SIZE / 2.0).max(0.0).min(1.0 - DROP_SIZE);
        Self::new(x, y, DROP_SIZE, DROP_SIZE, label, FULL_CONFIDENCE)
    }

    /// Force the geometry back into bounds: the origin is pulled inside
    /// first, then the sizes shrink so the far edge cannot leave the image.
    /// Position wins over size when both cannot hold, matching the resize
    /// anchoring. NaN components collapse to their lower bound.
    pub fn clamp_to_bounds(&mut self) {
        self.x = self.x.max(0.0).min(1.0 - MIN_SIZE);
        self.y = self.y.max(0.0).min(1.0 - MIN_SIZE);
        self.width = self.width.max(MIN_SIZE).min(1.0 - self.x);
        self.height = self.height.max(MIN_SIZE).min(1.0 - self.y);
        self.confidence = self.confidence.max(0.0).min(1.0);
    }

    /// Move the top-left corner, keeping size; the origin is clamped so the
    /// box stays inside the image.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x.max(0.0).min(1.0 - self.width);
        self.y = y.max(0.0).min(1.0 - self.height);
    }

    /// Resize anchored at the top-left corner: floored at the minimum size
    /// and capped so the far edge cannot leave the image.
    pub fn resize_to(&mut self, width: f32, height: f32) {
        self.width = width.max(MIN_SIZE).min(1.0 - self.x);
        self.height = height.max(MIN_SIZE).min(1.0 - self.y);
    }

    /// Hit test a normalized point against this box.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn in_bounds(b: &BoundingBox) -> bool {
        b.x >= 0.0
            && b.y >= 0.0
            && b.x + b.width <= 1.0 + EPSILON
            && b.y + b.height <= 1.0 + EPSILON
            && b.width >= MIN_SIZE - EPSILON
            && b.height >= MIN_SIZE - EPSILON
    }

    #[test]
    fn test_default_rect_values() {
        let b = BoundingBox::default_rect("Lesion A");
        assert_eq!(b.x, 0.4);
        assert_eq!(b.y, 0.4);
        assert_eq!(b.width, 0.2);
        assert_eq!(b.height, 0.2);
        assert_eq!(b.label, "Lesion A");
        assert_eq!(b.confidence, 1.0);
    }

    #[test]
    fn test_new_clamps_oversized_geometry() {
        let b = BoundingBox::new(0.9, -0.3, 2.0, 0.5, "x", 1.4);
        assert!(in_bounds(&b));
        assert!(approx_eq(b.x, 0.9));
        assert!(approx_eq(b.width, 0.1));
        assert_eq!(b.y, 0.0);
        assert!(approx_eq(b.height, 0.5));
        assert_eq!(b.confidence, 1.0);
    }

    #[test]
    fn test_new_position_past_the_edge_keeps_min_size() {
        let b = BoundingBox::new(1.5, 0.5, 0.2, 0.2, "far", 1.0);
        assert!(approx_eq(b.x, 1.0 - MIN_SIZE));
        assert!(approx_eq(b.width, MIN_SIZE));
        assert!(in_bounds(&b));
    }

    #[test]
    fn test_new_absorbs_nan_geometry() {
        let b = BoundingBox::new(f32::NAN, 0.2, f32::NAN, 0.3, "n", f32::NAN);
        assert!(in_bounds(&b));
        assert_eq!(b.x, 0.0);
        assert_eq!(b.width, MIN_SIZE);
        assert!(approx_eq(b.y, 0.2));
        assert!(approx_eq(b.height, 0.3));
        assert_eq!(b.confidence, 0.0);
    }

    #[test]
    fn test_new_preserves_position_shrinks_size() {
        // A box hanging over the right edge keeps its origin and loses width.
        let b = BoundingBox::new(0.95, 0.1, 0.2, 0.2, "edge", 0.8);
        assert!(approx_eq(b.x, 0.95));
        assert!(approx_eq(b.width, 0.05));
        assert!(approx_eq(b.height, 0.2));
    }

    #[test]
    fn test_centered_at_centers_the_box() {
        let b = BoundingBox::centered_at(0.5, 0.5, "c");
        assert!(approx_eq(b.x, 0.45));
        assert!(approx_eq(b.y, 0.45));
        assert!(approx_eq(b.width, DROP_SIZE));
        assert!(approx_eq(b.height, DROP_SIZE));
    }

    #[test]
    fn test_centered_at_edge_stays_inside() {
        let b = BoundingBox::centered_at(1.0, 0.0, "corner");
        assert!(in_bounds(&b));
        assert!(approx_eq(b.x, 1.0 - DROP_SIZE));
        assert!(approx_eq(b.y, 0.0));
        assert!(approx_eq(b.width, DROP_SIZE));
        assert!(approx_eq(b.height, DROP_SIZE));
    }

    #[test]
    fn test_move_to_clamps_far_edge() {
        let mut b = BoundingBox::default_rect("m");
        b.move_to(0.95, 0.5);
        assert!(approx_eq(b.x, 0.8));
        assert!(approx_eq(b.y, 0.5));
        assert!(in_bounds(&b));
    }

    #[test]
    fn test_move_to_negative_clamps_to_zero() {
        let mut b = BoundingBox::default_rect("m");
        b.move_to(-0.4, -0.1);
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 0.0);
    }

    #[test]
    fn test_resize_floors_at_min_size() {
        let mut b = BoundingBox::default_rect("r");
        b.resize_to(0.0, -5.0);
        assert_eq!(b.width, MIN_SIZE);
        assert_eq!(b.height, MIN_SIZE);
    }

    #[test]
    fn test_resize_caps_at_image_edge() {
        let mut b = BoundingBox::new(0.8, 0.8, 0.1, 0.1, "r", 1.0);
        b.resize_to(5.0, 5.0);
        assert!(approx_eq(b.width, 0.2));
        assert!(approx_eq(b.height, 0.2));
        assert!(in_bounds(&b));
    }

    #[test]
    fn test_contains() {
        let b = BoundingBox::new(0.2, 0.2, 0.4, 0.4, "h", 1.0);
        assert!(b.contains(0.2, 0.2));
        assert!(b.contains(0.4, 0.5));
        assert!(b.contains(0.6, 0.6));
        assert!(!b.contains(0.61, 0.5));
        assert!(!b.contains(0.1, 0.3));
    }

    #[test]
    fn test_deserialize_payload_record() {
        let json = r#"{"x":0.1,"y":0.2,"width":0.3,"height":0.4,"label":"hemorrhage","confidence":0.85}"#;
        let b: BoundingBox = serde_json::from_str(json).unwrap();
        assert!(approx_eq(b.x, 0.1));
        assert!(approx_eq(b.height, 0.4));
        assert_eq!(b.label, "hemorrhage");
        assert!(approx_eq(b.confidence, 0.85));
    }

    #[test]
    fn test_deserialize_without_confidence_defaults_to_full() {
        let json = r#"{"x":0.1,"y":0.2,"width":0.3,"height":0.4,"label":"drusen"}"#;
        let b: BoundingBox = serde_json::from_str(json).unwrap();
        assert_eq!(b.confidence, 1.0);
    }

    #[test]
    fn test_serialize_keeps_payload_field_names() {
        let b = BoundingBox::default_rect("a");
        let json = serde_json::to_string(&b).unwrap();
        for field in ["\"x\"", "\"y\"", "\"width\"", "\"height\"", "\"label\"", "\"confidence\""] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }
}
