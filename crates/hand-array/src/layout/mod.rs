//! Array layout engine
//!
//! Computes where every slot of a hand's array should sit, keeps the
//! separation/radius in sync with the held items' bounds, and moves slots
//! toward their targets a fraction at a time on each fixed tick.

mod array;
mod motion;
mod spacing;

pub use array::{ArrayLayout, LayoutKind};
pub use motion::{advance_slots, StowState};
pub use spacing::{radius_for_chord, required_separation};
