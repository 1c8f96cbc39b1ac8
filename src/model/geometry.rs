//! Bounding box geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page points (1 point = 1/72 inch).
///
/// Coordinates follow the rendering engine's convention: `y` grows downward,
/// so `top <= bottom` for well-formed boxes. Serialized as
/// `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent (`right - left`).
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent (`bottom - top`).
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Signed area, `width * height`.
    ///
    /// Inverted boxes on both axes produce a positive area, matching the
    /// rendering engine's own arithmetic.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Check whether every edge of `other` lies within `tolerance` of ours.
    pub fn approx_eq(&self, other: &BBox, tolerance: f32) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.right - other.right).abs() <= tolerance
            && (self.bottom - other.bottom).abs() <= tolerance
    }
}

impl From<[f32; 4]> for BBox {
    fn from(edges: [f32; 4]) -> Self {
        Self::new(edges[0], edges[1], edges[2], edges[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.left, bbox.top, bbox.right, bbox.bottom]
    }
}
