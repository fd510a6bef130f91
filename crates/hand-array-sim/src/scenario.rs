//! Scripted two-hand session
//!
//! The script is a pure function of the frame number so a run can be
//! replayed exactly. It walks through five phases: collect items into the
//! left hand, manipulate the array, steer it with the right hand, project it
//! onto the floor and commit, then settle back into collection while the
//! placed items land.

use std::time::Duration;

use hand_array::hand::{Button, FrameInput, HandInput};
use hand_array::{
    GhostTemplateId, HandRig, InteractionMode, Item, ItemCatalog, ItemId, ItemListener, Quaternion, Raycaster, Rgba,
    TickReport, Transform, Vector3D,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collect,
    Manipulate,
    Dual,
    Place,
    Settle,
}

impl Phase {
    const ORDER: [(Phase, f32); 5] = [
        (Phase::Collect, 0.0),
        (Phase::Manipulate, 0.25),
        (Phase::Dual, 0.45),
        (Phase::Place, 0.65),
        (Phase::Settle, 0.8),
    ];
}

/// Where the left hand rests while collecting and manipulating
const LEFT_REST: Vector3D = Vector3D::new(0.0, 1.0, 0.0);
/// Far enough from the left hand that no roles are negotiated
const RIGHT_AWAY: Vector3D = Vector3D::new(0.8, 1.0, 0.0);
/// Close enough to pair with the left hand
const RIGHT_NEAR: Vector3D = Vector3D::new(0.1, 1.0, 0.0);

#[derive(Debug, Clone)]
pub struct Scenario {
    items: usize,
    frames: u64,
}

impl Scenario {
    pub fn new(items: usize, frames: u64) -> Self {
        Self { items, frames }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Items scattered in an arc in front of the left hand. Every other
    /// item shares a ghost template so secondary manipulation has a group.
    pub fn catalog(&self) -> ItemCatalog {
        let mut catalog = ItemCatalog::new().with_listener(Box::new(LogListener));
        for i in 0..self.items {
            let id = ItemId(i as u64 + 1);
            let radius = 0.04 + 0.01 * (i % 3) as f32;
            let template = GhostTemplateId((i % 2) as u32);
            let position = Vector3D::new(i as f32 * 0.12 - 0.3, 1.0, 0.3);
            catalog.insert(
                Item::new(id, radius, template)
                    .with_placement_offset(radius)
                    .with_transform(Transform::from_position(position)),
            );
        }
        catalog
    }

    fn start_of(&self, phase: Phase) -> u64 {
        let fraction = Phase::ORDER
            .iter()
            .find(|(p, _)| *p == phase)
            .map_or(0.0, |(_, f)| *f);
        (self.frames as f32 * fraction).round() as u64
    }

    fn end_of(&self, phase: Phase) -> u64 {
        let next = Phase::ORDER
            .iter()
            .skip_while(|(p, _)| *p != phase)
            .nth(1)
            .map(|(p, _)| *p);
        next.map_or(self.frames, |p| self.start_of(p))
    }

    pub fn phase_at(&self, frame: u64) -> Phase {
        Phase::ORDER
            .iter()
            .rev()
            .find(|(p, _)| frame >= self.start_of(*p))
            .map_or(Phase::Collect, |(p, _)| *p)
    }

    /// Input for `frame`
    pub fn input_at(&self, frame: u64) -> FrameInput {
        let phase = self.phase_at(frame);
        let local = frame - self.start_of(phase);
        let length = self.end_of(phase) - self.start_of(phase);

        let mut left = HandInput::at(Transform::from_position(LEFT_REST));
        let mut right = HandInput::at(Transform::from_position(RIGHT_AWAY));

        match phase {
            Phase::Collect => {
                if (1..=self.items as u64).contains(&local) {
                    left = left.with_hovered(ItemId(local)).press(Button::Grab);
                }
            }
            Phase::Manipulate => {
                if local == 0 {
                    left = left
                        .press(Button::SwitchMode(InteractionMode::Manipulation))
                        .press(Button::SelectNext);
                } else if local < length / 2 {
                    left = left.with_manipulate(0.8, 0.0);
                } else if local == length / 2 {
                    left = left.press(Button::JogForward);
                } else {
                    left = left.with_manipulate(0.0, 0.5);
                }
            }
            Phase::Dual => {
                let turn = 90.0 * local as f32 / length.max(1) as f32;
                right = HandInput::at(Transform::from_position_rotation(
                    RIGHT_NEAR,
                    Quaternion::angle_axis(turn, Vector3D::UP),
                ))
                .with_grab(1.0);
            }
            Phase::Place => {
                left.pose = Transform::from_position_rotation(
                    Vector3D::new(0.0, 1.2, 0.0),
                    Quaternion::angle_axis(60.0, Vector3D::RIGHT),
                );
                if local == 0 {
                    left = left.press(Button::SwitchMode(InteractionMode::Placement));
                } else if local < 10 {
                    left.move_hold = 0.5;
                } else if local + 1 == length {
                    left = left.press(Button::Place);
                }
            }
            Phase::Settle => {
                if local == 0 {
                    left = left.press(Button::SwitchMode(InteractionMode::Collection));
                }
            }
        }

        FrameInput { left, right }
    }

    /// Run one frame against `rig`
    pub fn step(&self, rig: &mut HandRig, frame: u64, dt: Duration, surface: &dyn Raycaster) -> TickReport {
        let input = self.input_at(frame);
        let report = rig.advance(dt, &input, surface);
        for (hand, action) in &report.actions {
            info!(frame, hand = hand.name(), ?action, "hand action");
        }
        report
    }
}

/// Logs item lifecycle callbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl ItemListener for LogListener {
    fn on_grabbed(&mut self, item: ItemId) {
        debug!(%item, "grabbed");
    }

    fn on_released(&mut self, item: ItemId, velocity: Vector3D) {
        debug!(%item, speed = velocity.magnitude(), "released");
    }

    fn on_placed(&mut self, item: ItemId, transform: &Transform) {
        let p = transform.position;
        info!(%item, x = p.x, y = p.y, z = p.z, "placed");
    }

    fn on_selected(&mut self, item: ItemId, _highlight: Rgba) {
        debug!(%item, "selected");
    }
}
