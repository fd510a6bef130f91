//! Easing curves

use serde::{Deserialize, Serialize};

/// Shape of a tween's progress curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Hermite smoothstep, zero slope at both ends
    #[default]
    Smooth,
    QuadOut,
    /// Overshoots by about 10% before settling
    BackOut,
}

/// Overshoot amount used by [`Easing::BackOut`]
const BACK_OVERSHOOT: f32 = 1.70158;

impl Easing {
    pub const ALL: [Easing; 4] = [Easing::Linear, Easing::Smooth, Easing::QuadOut, Easing::BackOut];

    /// Eased value for progress `t`, clamped into `[0, 1]` first
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let rest = 1.0 - t;
        match self {
            Easing::Linear => t,
            Easing::Smooth => t * t * (3.0 - 2.0 * t),
            Easing::QuadOut => 1.0 - rest * rest,
            Easing::BackOut => {
                let s = BACK_OVERSHOOT;
                1.0 - rest * rest * ((s + 1.0) * rest - s)
            }
        }
    }
}
