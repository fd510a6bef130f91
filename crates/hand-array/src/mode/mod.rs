//! Interaction modes and the primary/secondary hand negotiation

mod interaction;
mod negotiator;
mod observer;

pub use interaction::InteractionMode;
pub use negotiator::{resolve_roles, ModeNegotiator, RoleDecision, RoleInputs};
pub use observer::{InputBindings, ModeObserver, NoBindings};

#[cfg(test)]
pub(crate) use observer::testing;
