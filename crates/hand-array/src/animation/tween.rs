//! Start-to-target pose animation

use std::time::Duration;

use super::Easing;
use crate::spatial::Transform;

/// Explicit timer carrying a start pose, target pose and elapsed time.
/// Advanced by the fixed-step tick; never suspends.
#[derive(Debug, Clone)]
pub struct PoseTween {
    pub start: Transform,
    pub target: Transform,
    pub duration: Duration,
    pub elapsed: Duration,
    pub easing: Easing,
}

impl PoseTween {
    pub fn new(start: Transform, target: Transform, duration: Duration) -> Self {
        Self {
            start,
            target,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt`; returns true once the tween has reached its target
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_complete()
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated pose
    pub fn pose(&self) -> Transform {
        if self.is_complete() {
            return self.target;
        }
        let t = self.easing.apply(self.progress());
        self.start.lerp(&self.target, t)
    }
}
