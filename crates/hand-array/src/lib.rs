//! hand-array: hand-anchored item arrays for spatial interfaces
//!
//! This crate provides:
//! - Linear and circular array layouts with bounds-driven auto-spacing
//! - Per-hand slot registries bound to scene items by id
//! - An interaction-mode state machine with two-hand role negotiation
//! - Surface projection of an array for per-item placement
//! - A fixed/variable tick driver tying both hands together

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod hand;
pub mod item;
pub mod layout;
pub mod mode;
pub mod projector;
pub mod registry;
pub mod spatial;
pub mod system;

// Re-export commonly used types
pub use config::HandArrayConfig;
pub use error::{ConfigError, PlacementError};
pub use hand::{Button, FrameInput, GestureEdge, Hand, HandAction, HandInput, HandState};
pub use item::{GhostTemplateId, Item, ItemCatalog, ItemId, ItemListener, Rgba};
pub use layout::{ArrayLayout, LayoutKind};
pub use mode::{InputBindings, InteractionMode, ModeNegotiator, ModeObserver};
pub use projector::{GhostTarget, PlacementGhost, SurfaceProjector};
pub use registry::{Slot, SlotId, SlotRegistry};
pub use spatial::{LayerMask, Quaternion, RayHit, Raycaster, Transform, Vector3D};
pub use system::{HandRig, TickReport};
