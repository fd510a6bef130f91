//! Shared geometric configuration of one hand's array

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::spacing::{radius_for_chord, required_separation};
use crate::config::{LayoutConfig, SizeRange};
use crate::spatial::{delta_degrees, normalize_degrees, Quaternion, SpatialNode, Vector3D};

/// How slots are arranged around the hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// A row along the hand's right axis
    Linear,
    /// A ring around the hand's up axis
    #[default]
    Circular,
}

impl LayoutKind {
    pub fn toggled(self) -> Self {
        match self {
            LayoutKind::Linear => LayoutKind::Circular,
            LayoutKind::Circular => LayoutKind::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Linear => "linear",
            LayoutKind::Circular => "circular",
        }
    }
}

/// Size recorded the last time the user resized the array by hand
#[derive(Debug, Clone, Copy, PartialEq)]
struct RecordedSize {
    separation: f32,
    radius: f32,
}

/// Layout kind plus live separation, radius, rotation and offset.
///
/// Separation and radius always stay inside their configured ranges. The
/// rotation is kept in `[0, 360)` degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLayout {
    kind: LayoutKind,
    separation: f32,
    radius: f32,
    rotation: f32,
    offset: f32,
    recorded: Option<RecordedSize>,
    separation_range: SizeRange,
    radius_range: SizeRange,
}

impl ArrayLayout {
    /// Slots are laid out in the plane perpendicular to this axis
    pub const UP: Vector3D = Vector3D::UP;
    /// Direction of ring slot 0 before any rotation
    pub const REFERENCE_AXIS: Vector3D = Vector3D::RIGHT;
    /// Ring angle that selection-centering brings the selected slot to
    pub const FRONT_ANGLE: f32 = 270.0;

    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            kind: config.kind,
            separation: config.separation.default,
            radius: config.radius.default,
            rotation: 0.0,
            offset: 0.0,
            recorded: None,
            separation_range: config.separation,
            radius_range: config.radius,
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn separation(&self) -> f32 {
        self.separation
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Global rotation in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Switch kind; the linear offset does not carry over
    pub fn set_kind(&mut self, kind: LayoutKind) {
        if self.kind != kind {
            self.kind = kind;
            self.offset = 0.0;
        }
    }

    /// Angle between neighbouring ring slots
    pub fn step_degrees(count: usize) -> f32 {
        if count == 0 {
            0.0
        } else {
            360.0 / count as f32
        }
    }

    /// Distance from the row's midpoint to either end
    pub fn setback(&self, count: usize) -> f32 {
        self.separation * count.saturating_sub(1) as f32 / 2.0
    }

    /// Rotation of the array pivot about [`Self::UP`]
    pub fn pivot_rotation(&self) -> Quaternion {
        Quaternion::angle_axis(self.rotation, Self::UP)
    }

    /// Target position of slot `index` in array space, rotation included
    pub fn slot_target(&self, index: usize, count: usize) -> Vector3D {
        let unrotated = match self.kind {
            LayoutKind::Linear => {
                let x = index as f32 * self.separation - self.setback(count) + self.offset;
                Vector3D::new(x, 0.0, 0.0)
            }
            LayoutKind::Circular => {
                let angle = index as f32 * Self::step_degrees(count);
                Quaternion::angle_axis(angle, Self::UP) * (Self::REFERENCE_AXIS * self.radius)
            }
        };
        self.pivot_rotation() * unrotated
    }

    /// Target positions for `count` slots, in array order
    pub fn compute_targets(&self, count: usize) -> Vec<Vector3D> {
        (0..count).map(|i| self.slot_target(i, count)).collect()
    }

    /// Add `delta` degrees to the global rotation and counter-rotate every
    /// slot in place by the same amount, so items keep their world facing
    /// while their position on the array moves.
    pub fn rotate_array<'a>(&mut self, delta: f32, nodes: impl IntoIterator<Item = &'a mut SpatialNode>) {
        if delta == 0.0 {
            return;
        }
        self.rotation = normalize_degrees(self.rotation + delta);
        let counter = Quaternion::angle_axis(-delta, Self::UP);
        for node in nodes {
            node.spin(counter);
        }
    }

    /// Slide a linear row along its axis. The offset saturates so the row's
    /// midpoint never leaves the span of its own slots.
    pub fn shift_array(&mut self, delta: f32, count: usize) {
        if self.kind != LayoutKind::Linear {
            return;
        }
        let limit = self.setback(count);
        self.offset = (self.offset + delta).clamp(-limit, limit);
    }

    /// Re-apply the offset limit after the slot count changed
    pub fn clamp_offset(&mut self, count: usize) {
        let limit = self.setback(count);
        self.offset = self.offset.clamp(-limit, limit);
    }

    /// Grow or shrink the array by hand; the result is remembered so it can
    /// be restored by [`Self::recall_state`].
    pub fn resize_array(&mut self, delta: f32) {
        match self.kind {
            LayoutKind::Linear => self.separation = self.separation_range.clamp(self.separation + delta),
            LayoutKind::Circular => self.radius = self.radius_range.clamp(self.radius + delta),
        }
        self.recorded = Some(RecordedSize {
            separation: self.separation,
            radius: self.radius,
        });
    }

    /// Restore the last hand-set size and consume the record, so a second
    /// recall without an intervening resize leaves the array alone.
    pub fn recall_state(&mut self) {
        if let Some(recorded) = self.recorded.take() {
            self.separation = recorded.separation;
            self.radius = recorded.radius;
        }
    }

    /// Auto-spacing from the bounding radii of the slots in array order
    /// (zero for empty slots). Fewer than two slots resets to defaults.
    pub fn apply_item_bounds(&mut self, radii: &[f32]) {
        let wrap = self.kind == LayoutKind::Circular;
        let Some(required) = required_separation(radii, wrap) else {
            self.separation = self.separation_range.default;
            self.radius = self.radius_range.default;
            return;
        };
        match self.kind {
            LayoutKind::Linear => self.separation = self.separation_range.clamp(required),
            LayoutKind::Circular => {
                self.radius = self.radius_range.clamp(radius_for_chord(radii.len(), required))
            }
        }
        trace!(
            kind = self.kind.name(),
            count = radii.len(),
            required,
            separation = self.separation,
            radius = self.radius,
            "auto-spacing applied"
        );
    }

    /// Drift one smoothing step toward putting slot `index` at the array's
    /// logical center: offset zero on a row, the front of a ring.
    pub fn center_on<'a>(
        &mut self,
        index: usize,
        count: usize,
        smoothing: f32,
        nodes: impl IntoIterator<Item = &'a mut SpatialNode>,
    ) {
        if index >= count {
            return;
        }
        match self.kind {
            LayoutKind::Linear => {
                let target = self.setback(count) - index as f32 * self.separation;
                self.offset += (target - self.offset) * smoothing;
                self.clamp_offset(count);
            }
            LayoutKind::Circular => {
                let target = normalize_degrees(Self::FRONT_ANGLE - index as f32 * Self::step_degrees(count));
                let delta = delta_degrees(self.rotation, target) * smoothing;
                self.rotate_array(delta, nodes);
            }
        }
    }
}
