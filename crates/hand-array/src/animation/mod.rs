//! Timed pose animation driven by the fixed-step tick

mod easing;
mod tween;

pub use easing::Easing;
pub use tween::PoseTween;
