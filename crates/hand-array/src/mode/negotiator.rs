//! Mode switching and primary/secondary role negotiation

use std::fmt;

use tracing::{debug, info};

use super::{InputBindings, InteractionMode, ModeObserver, NoBindings};
use crate::config::HandsConfig;
use crate::hand::{Hand, HandPair};
use crate::item::ItemCatalog;

/// What role negotiation sees in one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleInputs {
    pub mode: InteractionMode,
    /// Hands are within the proximity radius
    pub near: bool,
    pub left_upwardness: f32,
    pub right_upwardness: f32,
    /// Hand currently secondary and actively manipulating, if any
    pub active_secondary: Option<Hand>,
}

impl RoleInputs {
    fn upwardness(&self, hand: Hand) -> f32 {
        match hand {
            Hand::Left => self.left_upwardness,
            Hand::Right => self.right_upwardness,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDecision {
    /// No roles; both hands are forced non-secondary
    Inactive,
    /// `primary` leads, the other hand becomes secondary
    Assign { primary: Hand },
    /// Keep the current roles
    Hold,
}

/// Decide hand roles.
///
/// The more upward hand is primary when it is palm-up (positive) and the
/// other is palm-down (negative). A secondary hand that is already
/// manipulating holds the roles on its own, as long as the hands stay close
/// and it is itself still palm-down.
pub fn resolve_roles(inputs: &RoleInputs) -> RoleDecision {
    if !inputs.mode.allows_negotiation() || !inputs.near {
        return RoleDecision::Inactive;
    }

    let primary = if inputs.left_upwardness >= inputs.right_upwardness {
        Hand::Left
    } else {
        Hand::Right
    };
    if inputs.upwardness(primary) > 0.0 && inputs.upwardness(primary.other()) < 0.0 {
        return RoleDecision::Assign { primary };
    }

    match inputs.active_secondary {
        Some(secondary) if inputs.upwardness(secondary) < 0.0 => RoleDecision::Hold,
        _ => RoleDecision::Inactive,
    }
}

/// Owner of the process-wide [`InteractionMode`] and of the hand roles.
///
/// Bindings and observers are registered once and called synchronously.
pub struct ModeNegotiator {
    mode: InteractionMode,
    previous: InteractionMode,
    proximity_radius: f32,
    proximity_active: bool,
    /// Primary hand of the running dual manipulation
    dual: Option<Hand>,
    bindings: Box<dyn InputBindings>,
    observers: Vec<Box<dyn ModeObserver>>,
}

impl fmt::Debug for ModeNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeNegotiator")
            .field("mode", &self.mode)
            .field("previous", &self.previous)
            .field("proximity_active", &self.proximity_active)
            .field("dual", &self.dual)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ModeNegotiator {
    pub fn new(config: &HandsConfig) -> Self {
        Self {
            mode: InteractionMode::default(),
            previous: InteractionMode::default(),
            proximity_radius: config.proximity_radius,
            proximity_active: false,
            dual: None,
            bindings: Box::new(NoBindings),
            observers: Vec::new(),
        }
    }

    /// Install bindings; those for the current mode are enabled at once
    pub fn with_bindings(mut self, bindings: Box<dyn InputBindings>) -> Self {
        self.set_bindings(bindings);
        self
    }

    pub fn set_bindings(&mut self, bindings: Box<dyn InputBindings>) {
        self.bindings = bindings;
        self.bindings.enable(self.mode);
    }

    pub fn add_observer(&mut self, observer: Box<dyn ModeObserver>) {
        self.observers.push(observer);
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn previous_mode(&self) -> InteractionMode {
        self.previous
    }

    pub fn is_proximity_active(&self) -> bool {
        self.proximity_active
    }

    /// Primary hand of the running dual manipulation, if one is running
    pub fn dual_primary(&self) -> Option<Hand> {
        self.dual
    }

    /// Enter `mode`. Returns false, changing nothing, if already in it.
    pub fn switch_mode(&mut self, mode: InteractionMode, hands: &mut HandPair, catalog: &ItemCatalog) -> bool {
        if mode == self.mode {
            return false;
        }
        let previous = self.mode;
        self.bindings.disable(previous);
        self.bindings.enable(mode);
        self.previous = previous;
        self.mode = mode;

        for hand in hands.iter_mut() {
            hand.clear_adjustment();
            hand.on_mode_exited(previous);
            hand.on_mode_entered(mode, catalog);
        }
        for observer in &mut self.observers {
            observer.on_mode_changed(previous, mode);
        }
        info!(from = previous.name(), to = mode.name(), "interaction mode switched");

        self.negotiate(hands);
        true
    }

    /// Re-evaluate hand roles against the current mode and poses
    pub fn negotiate(&mut self, hands: &mut HandPair) {
        let active_secondary = Hand::BOTH.into_iter().find(|&h| {
            let state = hands.get(h);
            state.is_secondary() && state.is_doing_secondary_manipulation()
        });
        let inputs = RoleInputs {
            mode: self.mode,
            near: hands.separation() <= self.proximity_radius,
            left_upwardness: hands.left.upwardness(),
            right_upwardness: hands.right.upwardness(),
            active_secondary,
        };

        match resolve_roles(&inputs) {
            RoleDecision::Assign { primary } => {
                let changed = !self.proximity_active || !hands.get(primary.other()).is_secondary();
                hands.get_mut(primary).set_secondary(false);
                hands.get_mut(primary.other()).set_secondary(true);
                if changed {
                    debug!(primary = primary.name(), "hand roles assigned");
                }
                self.proximity_active = true;
            }
            RoleDecision::Hold => {}
            RoleDecision::Inactive => {
                if self.proximity_active {
                    debug!("hand roles cleared");
                }
                for hand in hands.iter_mut() {
                    hand.set_secondary(false);
                }
                self.proximity_active = false;
            }
        }
        self.sync_dual(hands);
    }

    /// Notify observers when dual manipulation starts or stops
    pub fn sync_dual(&mut self, hands: &HandPair) {
        let current = Hand::BOTH
            .into_iter()
            .find(|&h| {
                let state = hands.get(h);
                state.is_secondary() && state.is_doing_secondary_manipulation()
            })
            .map(Hand::other);
        if current == self.dual {
            return;
        }
        if let Some(primary) = self.dual.take() {
            debug!(primary = primary.name(), "dual manipulation ended");
            for observer in &mut self.observers {
                observer.on_dual_manipulation_ended(primary);
            }
        }
        if let Some(primary) = current {
            debug!(primary = primary.name(), "dual manipulation started");
            for observer in &mut self.observers {
                observer.on_dual_manipulation_started(primary);
            }
        }
        self.dual = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandArrayConfig;
    use crate::hand::AdjustmentInput;
    use crate::item::testing::catalog_with;
    use crate::mode::testing::{Notice, Recorder};
    use crate::spatial::{Quaternion, Transform, Vector3D};

    fn inputs(mode: InteractionMode, left: f32, right: f32) -> RoleInputs {
        RoleInputs {
            mode,
            near: true,
            left_upwardness: left,
            right_upwardness: right,
            active_secondary: None,
        }
    }

    #[test]
    fn test_palm_up_hand_becomes_primary() {
        let decision = resolve_roles(&inputs(InteractionMode::Manipulation, 0.8, -0.6));
        assert_eq!(decision, RoleDecision::Assign { primary: Hand::Left });
        let decision = resolve_roles(&inputs(InteractionMode::Placement, -0.6, 0.8));
        assert_eq!(decision, RoleDecision::Assign { primary: Hand::Right });
    }

    #[test]
    fn test_negotiation_off_in_collection_and_palette() {
        for mode in [InteractionMode::Collection, InteractionMode::Palette] {
            assert_eq!(resolve_roles(&inputs(mode, 0.8, -0.6)), RoleDecision::Inactive);
        }
    }

    #[test]
    fn test_both_palms_up_is_inactive() {
        assert_eq!(
            resolve_roles(&inputs(InteractionMode::Manipulation, 0.8, 0.3)),
            RoleDecision::Inactive
        );
    }

    #[test]
    fn test_far_hands_are_inactive() {
        let mut i = inputs(InteractionMode::Manipulation, 0.8, -0.6);
        i.near = false;
        i.active_secondary = Some(Hand::Right);
        assert_eq!(resolve_roles(&i), RoleDecision::Inactive);
    }

    #[test]
    fn test_active_secondary_holds_through_primary_flicker() {
        // primary dips palm-down for a moment
        let mut i = inputs(InteractionMode::Manipulation, -0.1, -0.6);
        i.active_secondary = Some(Hand::Right);
        assert_eq!(resolve_roles(&i), RoleDecision::Hold);
    }

    #[test]
    fn test_hold_ends_when_secondary_disqualifies() {
        let mut i = inputs(InteractionMode::Manipulation, -0.1, 0.2);
        i.active_secondary = Some(Hand::Right);
        assert_eq!(resolve_roles(&i), RoleDecision::Inactive);
    }

    fn palm(up: bool, hand: Hand, x: f32) -> Transform {
        // identity has up = +Y; the right hand reads that as palm-down
        let flip = match (hand, up) {
            (Hand::Left, true) | (Hand::Right, false) => Quaternion::IDENTITY,
            _ => Quaternion::angle_axis(180.0, Vector3D::FORWARD),
        };
        Transform::from_position_rotation(Vector3D::new(x, 1.0, 0.0), flip)
    }

    fn rig() -> (ModeNegotiator, HandPair, Recorder) {
        let config = HandArrayConfig::default();
        let recorder = Recorder::default();
        let mut negotiator = ModeNegotiator::new(&config.hands).with_bindings(Box::new(recorder.clone()));
        negotiator.add_observer(Box::new(recorder.clone()));
        (negotiator, HandPair::new(&config), recorder)
    }

    #[test]
    fn test_switch_mode_renegotiates_immediately() {
        let (mut negotiator, mut hands, _) = rig();
        let catalog = catalog_with(&[]);
        hands.left.set_pose(palm(true, Hand::Left, 0.0));
        hands.right.set_pose(palm(false, Hand::Right, 0.1));

        negotiator.negotiate(&mut hands);
        assert!(!hands.right.is_secondary());

        negotiator.switch_mode(InteractionMode::Manipulation, &mut hands, &catalog);
        assert!(negotiator.is_proximity_active());
        assert!(hands.right.is_secondary());
        assert!(!hands.left.is_secondary());

        negotiator.switch_mode(InteractionMode::Collection, &mut hands, &catalog);
        assert!(!hands.right.is_secondary());
        assert!(!negotiator.is_proximity_active());
    }

    #[test]
    fn test_switch_mode_zeroes_adjustments() {
        let (mut negotiator, mut hands, _) = rig();
        let catalog = catalog_with(&[]);
        let nonzero = AdjustmentInput {
            rotation: 1.0,
            size: -0.5,
            offset: 0.25,
        };
        for mode in [InteractionMode::Manipulation, InteractionMode::Collection] {
            hands.left.set_adjustment(nonzero);
            hands.right.set_adjustment(nonzero);
            assert!(negotiator.switch_mode(mode, &mut hands, &catalog));
            assert!(hands.left.adjustment().is_idle());
            assert!(hands.right.adjustment().is_idle());
        }
    }

    #[test]
    fn test_switch_mode_toggles_bindings_and_notifies() {
        let (mut negotiator, mut hands, recorder) = rig();
        let catalog = catalog_with(&[]);
        negotiator.switch_mode(InteractionMode::Placement, &mut hands, &catalog);
        assert!(!negotiator.switch_mode(InteractionMode::Placement, &mut hands, &catalog));

        assert_eq!(negotiator.previous_mode(), InteractionMode::Collection);
        assert_eq!(
            *recorder.log.borrow(),
            vec![
                Notice::Enabled(InteractionMode::Collection),
                Notice::Disabled(InteractionMode::Collection),
                Notice::Enabled(InteractionMode::Placement),
                Notice::ModeChanged(InteractionMode::Collection, InteractionMode::Placement),
            ]
        );
    }

    #[test]
    fn test_primary_flicker_keeps_running_dual_manipulation() {
        let (mut negotiator, mut hands, recorder) = rig();
        let catalog = catalog_with(&[]);
        hands.left.set_pose(palm(true, Hand::Left, 0.0));
        hands.right.set_pose(palm(false, Hand::Right, 0.1));
        negotiator.switch_mode(InteractionMode::Manipulation, &mut hands, &catalog);
        hands.right.set_doing_secondary(true);
        negotiator.sync_dual(&hands);

        // both palms down now; the manipulating secondary holds the roles
        hands.left.set_pose(palm(false, Hand::Left, 0.0));
        negotiator.negotiate(&mut hands);
        assert!(negotiator.is_proximity_active());
        assert!(hands.right.is_secondary());
        assert!(!hands.left.is_secondary());
        assert!(hands.right.is_doing_secondary_manipulation());
        assert_eq!(negotiator.dual_primary(), Some(Hand::Left));

        hands.left.set_pose(palm(true, Hand::Left, 0.0));
        negotiator.negotiate(&mut hands);
        assert!(hands.right.is_secondary());
        assert_eq!(negotiator.dual_primary(), Some(Hand::Left));

        let log = recorder.log.borrow();
        assert_eq!(log.iter().filter(|n| matches!(n, Notice::DualStarted(_))).count(), 1);
        assert!(!log.iter().any(|n| matches!(n, Notice::DualEnded(_))));
    }

    #[test]
    fn test_leaving_proximity_clears_flags_and_ends_dual() {
        let (mut negotiator, mut hands, recorder) = rig();
        let catalog = catalog_with(&[]);
        hands.left.set_pose(palm(true, Hand::Left, 0.0));
        hands.right.set_pose(palm(false, Hand::Right, 0.1));
        negotiator.switch_mode(InteractionMode::Manipulation, &mut hands, &catalog);

        hands.right.set_doing_secondary(true);
        negotiator.sync_dual(&hands);
        assert_eq!(negotiator.dual_primary(), Some(Hand::Left));

        hands.right.set_pose(palm(false, Hand::Right, 2.0));
        negotiator.negotiate(&mut hands);
        assert!(!hands.right.is_secondary());
        assert!(!hands.right.is_doing_secondary_manipulation());
        assert_eq!(negotiator.dual_primary(), None);

        let log = recorder.log.borrow();
        assert!(log.contains(&Notice::DualStarted(Hand::Left)));
        assert_eq!(log.last(), Some(&Notice::DualEnded(Hand::Left)));
    }
}
