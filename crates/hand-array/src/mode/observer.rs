//! Collaborators notified by the mode negotiator

use super::InteractionMode;
use crate::hand::Hand;

/// Input-device bindings that are switched on and off with the mode.
/// The mapping from devices to gestures lives outside this crate.
pub trait InputBindings {
    fn enable(&mut self, mode: InteractionMode);
    fn disable(&mut self, mode: InteractionMode);
}

/// Bindings that do nothing, for hosts that never gate input by mode
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl InputBindings for NoBindings {
    fn enable(&mut self, _mode: InteractionMode) {}
    fn disable(&mut self, _mode: InteractionMode) {}
}

/// Synchronous notifications about mode and role changes
pub trait ModeObserver {
    fn on_mode_changed(&mut self, _previous: InteractionMode, _current: InteractionMode) {}

    /// The secondary hand started steering `primary`'s array
    fn on_dual_manipulation_started(&mut self, _primary: Hand) {}

    fn on_dual_manipulation_ended(&mut self, _primary: Hand) {}
}
