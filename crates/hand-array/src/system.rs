//! Both hands, the shared mode and the scene's items, ticked together

use std::time::Duration;

use tracing::trace;

use crate::clock::TickClock;
use crate::config::HandArrayConfig;
use crate::hand::{FrameInput, Hand, HandAction, HandPair, HandState};
use crate::item::ItemCatalog;
use crate::mode::{InputBindings, InteractionMode, ModeNegotiator, ModeObserver};
use crate::projector::SurfaceProjector;
use crate::spatial::Raycaster;

/// What one call to [`HandRig::advance`] did
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub mode: InteractionMode,
    pub actions: Vec<(Hand, HandAction)>,
    pub fixed_steps: u32,
}

/// The hand-array system.
///
/// `variable_tick` runs once per rendered frame: it samples input, handles
/// mode requests, negotiates roles and refreshes placement previews.
/// `fixed_tick` runs at the configured fixed rate and does all continuous
/// motion. [`HandRig::advance`] drives both from frame time.
#[derive(Debug)]
pub struct HandRig {
    config: HandArrayConfig,
    negotiator: ModeNegotiator,
    hands: HandPair,
    catalog: ItemCatalog,
    projector: SurfaceProjector,
    clock: TickClock,
}

impl HandRig {
    pub fn new(config: HandArrayConfig, catalog: ItemCatalog) -> Self {
        Self {
            negotiator: ModeNegotiator::new(&config.hands),
            hands: HandPair::new(&config),
            projector: SurfaceProjector::new(&config.placement, config.layout.smoothing),
            clock: TickClock::new(config.timing.fixed_step()),
            catalog,
            config,
        }
    }

    pub fn with_bindings(mut self, bindings: Box<dyn InputBindings>) -> Self {
        self.negotiator.set_bindings(bindings);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn ModeObserver>) {
        self.negotiator.add_observer(observer);
    }

    pub fn config(&self) -> &HandArrayConfig {
        &self.config
    }

    pub fn mode(&self) -> InteractionMode {
        self.negotiator.mode()
    }

    pub fn negotiator(&self) -> &ModeNegotiator {
        &self.negotiator
    }

    pub fn hands(&self) -> &HandPair {
        &self.hands
    }

    pub fn hand(&self, hand: Hand) -> &HandState {
        self.hands.get(hand)
    }

    /// Direct access for hosts that drive a hand without gesture input
    pub fn hand_mut(&mut self, hand: Hand) -> (&mut HandState, &mut ItemCatalog) {
        (self.hands.get_mut(hand), &mut self.catalog)
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ItemCatalog {
        &mut self.catalog
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn switch_mode(&mut self, mode: InteractionMode) -> bool {
        self.negotiator.switch_mode(mode, &mut self.hands, &self.catalog)
    }

    /// Input, mode and role bookkeeping plus placement projection
    pub fn variable_tick(&mut self, input: &FrameInput, raycaster: &dyn Raycaster) -> Vec<(Hand, HandAction)> {
        for hand in Hand::BOTH {
            self.hands.get_mut(hand).set_pose(input.get(hand).pose);
        }

        let requested = input.left.requested_mode().or_else(|| input.right.requested_mode());
        if let Some(mode) = requested {
            self.switch_mode(mode);
        }
        self.negotiator.negotiate(&mut self.hands);

        let mode = self.negotiator.mode();
        let mut actions = Vec::new();
        for hand in Hand::BOTH {
            let state = self.hands.get_mut(hand);
            for action in state.apply_input(mode, input.get(hand), &mut self.catalog) {
                actions.push((hand, action));
            }
        }
        self.negotiator.sync_dual(&self.hands);

        if mode == InteractionMode::Placement {
            for state in self.hands.iter_mut() {
                state.update_placement(&self.projector, raycaster, &self.catalog);
            }
        }
        actions
    }

    /// One fixed simulation step for both hands
    pub fn fixed_tick(&mut self, dt: Duration) {
        let mode = self.negotiator.mode();
        for hand in Hand::BOTH {
            let (state, other) = self.hands.split(hand);
            state.fixed_tick(dt, mode, other, &mut self.catalog);
        }
    }

    /// Run one frame: a variable tick, then however many fixed steps `dt`
    /// accounts for.
    pub fn advance(&mut self, dt: Duration, input: &FrameInput, raycaster: &dyn Raycaster) -> TickReport {
        let actions = self.variable_tick(input, raycaster);
        let steps = self.clock.update(dt);
        let step = self.clock.fixed_step;
        for _ in 0..steps {
            self.fixed_tick(step);
        }
        trace!(frame = self.clock.frame, steps, "frame advanced");
        TickReport {
            mode: self.negotiator.mode(),
            actions,
            fixed_steps: steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Button, HandInput};
    use crate::item::testing::catalog_with;
    use crate::item::{ItemId, ItemLifecycle};
    use crate::spatial::{LayerMask, RayHit, Transform, Vector3D};

    struct NoScene;

    impl Raycaster for NoScene {
        fn raycast(&self, _o: Vector3D, _d: Vector3D, _m: f32, _l: LayerMask) -> Option<RayHit> {
            None
        }
    }

    fn apart() -> FrameInput {
        FrameInput {
            left: HandInput::at(Transform::from_position(Vector3D::new(-0.5, 1.0, 0.0))),
            right: HandInput::at(Transform::from_position(Vector3D::new(0.5, 1.0, 0.0))),
        }
    }

    #[test]
    fn test_mode_request_from_either_hand() {
        let mut rig = HandRig::new(HandArrayConfig::default(), catalog_with(&[]));
        let mut input = apart();
        input.right = input.right.press(Button::SwitchMode(InteractionMode::Manipulation));
        rig.variable_tick(&input, &NoScene);
        assert_eq!(rig.mode(), InteractionMode::Manipulation);
    }

    #[test]
    fn test_item_held_by_one_hand_cannot_be_grabbed_by_other() {
        let mut rig = HandRig::new(HandArrayConfig::default(), catalog_with(&[0.1]));
        let mut input = apart();
        input.left = input.left.with_hovered(ItemId(1)).press(Button::Grab);
        input.right = input.right.with_hovered(ItemId(1)).press(Button::Grab);
        let actions = rig.variable_tick(&input, &NoScene);

        assert_eq!(actions, vec![(Hand::Left, HandAction::Grabbed(ItemId(1)))]);
        assert_eq!(rig.hands().holder_of(ItemId(1)), Some(Hand::Left));
        assert!(rig.hand(Hand::Right).registry().is_empty());
        assert_eq!(rig.catalog().get(ItemId(1)).unwrap().lifecycle, ItemLifecycle::Held);
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut rig = HandRig::new(HandArrayConfig::default(), catalog_with(&[]));
        let step = rig.clock().fixed_step;
        let report = rig.advance(step * 3, &apart(), &NoScene);
        assert_eq!(report.fixed_steps, 3);
        assert_eq!(report.mode, InteractionMode::Collection);
    }
}
