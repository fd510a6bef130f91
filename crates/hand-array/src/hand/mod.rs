//! Per-hand state: the hand's array, its selection and its role

mod input;
mod manipulation;
mod placement;
mod state;

pub use input::{Button, FrameInput, GestureEdge, Hand, HandInput, ManipulateVector};
pub use manipulation::{sympathetic_rotation, ManipulationGhost};
pub use placement::PlacingItem;
pub use state::{AdjustmentInput, HandAction, HandState};

use crate::config::HandArrayConfig;

/// Both hands, addressable by [`Hand`]
#[derive(Debug, Clone)]
pub struct HandPair {
    pub left: HandState,
    pub right: HandState,
}

impl HandPair {
    pub fn new(config: &HandArrayConfig) -> Self {
        Self {
            left: HandState::new(Hand::Left, config),
            right: HandState::new(Hand::Right, config),
        }
    }

    pub fn get(&self, hand: Hand) -> &HandState {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, hand: Hand) -> &mut HandState {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// `hand` mutably, with read-only access to the other one
    pub fn split(&mut self, hand: Hand) -> (&mut HandState, &HandState) {
        match hand {
            Hand::Left => (&mut self.left, &self.right),
            Hand::Right => (&mut self.right, &self.left),
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HandState> {
        [&mut self.left, &mut self.right].into_iter()
    }

    /// Distance between the two hand anchors
    pub fn separation(&self) -> f32 {
        self.left.pose().position.distance(&self.right.pose().position)
    }

    /// The hand that holds `item`, if either does
    pub fn holder_of(&self, item: crate::item::ItemId) -> Option<Hand> {
        Hand::BOTH
            .into_iter()
            .find(|&h| self.get(h).registry().contains_item(item))
    }
}
