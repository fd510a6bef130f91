//! Normalized per-hand input, as delivered by the gesture service

use crate::item::ItemId;
use crate::mode::InteractionMode;
use crate::spatial::{Transform, Vector3D};

/// Which hand an input or state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    /// Sign applied to the palm-up test. The two hands are mirror images, so
    /// the same physical gesture points their up axes in opposite directions.
    pub fn upward_sign(self) -> f32 {
        match self {
            Hand::Left => 1.0,
            Hand::Right => -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

/// Discrete controls a hand can press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Pick up the hovered item
    Grab,
    /// Let go of the selected (or last) item
    Drop,
    /// Toggle the stowed state of the array
    Stow,
    SelectNext,
    SelectPrevious,
    Deselect,
    /// Cycle items one place forward around the array
    JogForward,
    JogBackward,
    ToggleLayout,
    /// Commit the current placement
    Place,
    /// Abandon the current placement preview
    Cancel,
    /// Ask for a mode change
    SwitchMode(InteractionMode),
}

/// Press/release edge of a [`Button`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEdge {
    Pressed(Button),
    Released(Button),
}

/// Two-axis thumbstick-like manipulation value, each axis in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ManipulateVector {
    pub x: f32,
    pub y: f32,
}

impl ManipulateVector {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Zero the vector when it is inside the dead zone, clamp otherwise
    pub fn filtered(&self, deadzone: f32) -> Self {
        if self.magnitude() < deadzone {
            return Self::default();
        }
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
        }
    }
}

/// One hand's input for a single variable tick
#[derive(Debug, Clone, PartialEq)]
pub struct HandInput {
    /// World pose of the hand; the array is anchored to it
    pub pose: Transform,
    /// World-space velocity, handed to items when they are dropped
    pub velocity: Vector3D,
    /// How closed the hand is, 0 (open) to 1 (fist)
    pub grab_amount: f32,
    pub manipulate: ManipulateVector,
    /// Signed hold value, used for the placement height
    pub move_hold: f32,
    /// Item currently inside this hand's grab zone, if any
    pub hovered: Option<ItemId>,
    /// Edge events since the previous tick, in order
    pub edges: Vec<GestureEdge>,
}

impl Default for HandInput {
    fn default() -> Self {
        Self {
            pose: Transform::IDENTITY,
            velocity: Vector3D::ZERO,
            grab_amount: 0.0,
            manipulate: ManipulateVector::default(),
            move_hold: 0.0,
            hovered: None,
            edges: Vec::new(),
        }
    }
}

impl HandInput {
    pub fn at(pose: Transform) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }

    pub fn with_edge(mut self, edge: GestureEdge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn press(self, button: Button) -> Self {
        self.with_edge(GestureEdge::Pressed(button))
    }

    pub fn with_grab(mut self, amount: f32) -> Self {
        self.grab_amount = amount.clamp(0.0, 1.0);
        self
    }

    pub fn with_manipulate(mut self, x: f32, y: f32) -> Self {
        self.manipulate = ManipulateVector::new(x, y);
        self
    }

    pub fn with_hovered(mut self, item: ItemId) -> Self {
        self.hovered = Some(item);
        self
    }

    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        self.edges.iter().filter_map(|edge| match edge {
            GestureEdge::Pressed(button) => Some(*button),
            GestureEdge::Released(_) => None,
        })
    }

    /// First mode change asked for this tick, if any
    pub fn requested_mode(&self) -> Option<InteractionMode> {
        self.pressed().find_map(|button| match button {
            Button::SwitchMode(mode) => Some(mode),
            _ => None,
        })
    }
}

/// Input for both hands in one variable tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub left: HandInput,
    pub right: HandInput,
}

impl FrameInput {
    pub fn get(&self, hand: Hand) -> &HandInput {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }
}
