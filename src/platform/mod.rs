//! Platform abstraction layer
//!
//! Converts host touch input into simulation taps. Only the first touch of a
//! gesture counts; the position must already be in design coordinates.

use glam::Vec2;

/// A single tap in design coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    pub pos: Vec2,
}

impl TapEvent {
    /// First touch of a touch-began batch. Non-finite positions are dropped.
    pub fn from_touches(touches: &[Vec2]) -> Option<Self> {
        let pos = *touches.first()?;
        if !pos.is_finite() {
            log::warn!("Ignoring non-finite touch at {:?}", pos);
            return None;
        }
        Some(Self { pos })
    }

    /// Map a point from window pixels into the design resolution
    pub fn from_window(point: Vec2, window: Vec2, design: Vec2) -> Option<Self> {
        if window.x <= 0.0 || window.y <= 0.0 {
            return None;
        }
        Self::from_touches(&[point * design / window])
    }
}
