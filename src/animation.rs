/*!
 * Ken Burns zoom animation for still images.
 *
 * Each image slot gets a triangular zoom ramp: scale rises linearly from
 * 1.0 to the configured peak at the slot midpoint, then falls back to 1.0
 * at the slot end. The ramp is a pure description; rendering it is the
 * renderer's concern.
 */

use serde::{Deserialize, Serialize};

use crate::errors::AnimationError;

/// Default peak scale applied at the slot midpoint
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.2;

/// Triangular zoom ramp over one image slot.
///
/// The scale at `t` seconds into the slot is
/// `1 + (zoom_factor - 1) * (1 - |2 * (t / duration) - 1|)`,
/// which is exactly 1.0 at both ends and exactly `zoom_factor` at the
/// midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KenBurns {
    /// Slot duration in seconds, always positive
    duration: f64,
    /// Peak scale at the slot midpoint
    zoom_factor: f64,
}

impl KenBurns {
    /// Create a ramp for a slot of `duration` seconds peaking at
    /// `zoom_factor`. Rejects zero, negative and non-finite durations.
    pub fn new(duration: f64, zoom_factor: f64) -> Result<Self, AnimationError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimationError::InvalidDuration { duration });
        }
        Ok(Self {
            duration,
            zoom_factor,
        })
    }

    /// Slot duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Peak scale at the slot midpoint
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Scale at `t` seconds into the slot.
    ///
    /// Defined for `0.0..=duration`; values outside that range extrapolate
    /// the ramp and are the caller's responsibility to clamp.
    pub fn scale_at(&self, t: f64) -> f64 {
        let progress = t / self.duration;
        1.0 + (self.zoom_factor - 1.0) * (1.0 - (2.0 * progress - 1.0).abs())
    }

    /// The ramp as a plain scale function for renderers
    pub fn into_scale_fn(self) -> impl Fn(f64) -> f64 {
        move |t| self.scale_at(t)
    }
}
