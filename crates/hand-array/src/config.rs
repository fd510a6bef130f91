//! Configuration for arrays, hands and placement
//!
//! Every field has a default, so an empty TOML document is a valid config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::error::ConfigError;
use crate::item::Rgba;
use crate::layout::LayoutKind;
use crate::spatial::{LayerMask, Vector3D};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandArrayConfig {
    pub layout: LayoutConfig,
    pub hands: HandsConfig,
    pub placement: PlacementConfig,
    pub timing: TimingConfig,
}

/// Inclusive range with the value used when an array holds fewer than two items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl SizeRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min > 0.0 && self.min <= self.default && self.default <= self.max) {
            return Err(ConfigError::Invalid {
                field,
                reason: format!(
                    "expected 0 < min <= default <= max, got min={} default={} max={}",
                    self.min, self.default, self.max
                ),
            });
        }
        Ok(())
    }
}

/// Array geometry and motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Layout used by newly created arrays
    pub kind: LayoutKind,
    /// Fraction of the remaining distance covered per fixed tick
    pub smoothing: f32,
    /// Linear spacing between slot centers
    pub separation: SizeRange,
    /// Circular ring radius
    pub radius: SizeRange,
    /// Degrees per fixed tick at full input deflection
    pub rotation_speed: f32,
    /// Separation/radius change per fixed tick at full deflection
    pub size_speed: f32,
    /// Linear offset change per fixed tick at full deflection
    pub offset_speed: f32,
    /// Where a stowed array collapses to, in hand space
    pub stow_point: Vector3D,
    /// Uniform slot scale while stowed
    pub stow_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            kind: LayoutKind::Circular,
            smoothing: 0.2,
            separation: SizeRange::new(0.05, 0.6, 0.12),
            radius: SizeRange::new(0.05, 0.6, 0.12),
            rotation_speed: 4.0,
            size_speed: 0.005,
            offset_speed: 0.005,
            stow_point: Vector3D::new(0.0, -0.04, -0.06),
            stow_scale: 0.2,
        }
    }
}

/// Per-hand interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsConfig {
    /// Hands closer than this may enter primary/secondary negotiation
    pub proximity_radius: f32,
    /// Grab amount at which the secondary hand starts manipulating
    pub secondary_grab_threshold: f32,
    /// Manipulate-vector magnitude below which input counts as idle
    pub input_deadzone: f32,
    /// Color passed to items when they become selected
    pub highlight_color: Rgba,
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 0.3,
            secondary_grab_threshold: 0.6,
            input_deadzone: 0.1,
            highlight_color: Rgba::new(0.2, 0.8, 1.0, 1.0),
        }
    }
}

/// Surface projection and the drop-into-place animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Height above the surface at which the projected array floats
    pub height_offset: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Height change per variable tick at full deflection
    pub height_speed: f32,
    /// Reach of the primary pointing ray
    pub max_distance: f32,
    pub layer_mask: LayerMask,
    pub place_duration_secs: f32,
    pub easing: Easing,
    /// Extra factor on top of the hand's own scale for speculative offsets
    pub scale_correction: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.25,
            min_height: 0.05,
            max_height: 1.0,
            height_speed: 0.01,
            max_distance: 10.0,
            layer_mask: LayerMask::ALL,
            place_duration_secs: 0.35,
            easing: Easing::BackOut,
            scale_correction: 1.0,
        }
    }
}

impl PlacementConfig {
    pub fn place_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.place_duration_secs).unwrap_or(Duration::ZERO)
    }
}

/// Tick rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_step_hz: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { fixed_step_hz: 72 }
    }
}

impl TimingConfig {
    pub fn fixed_step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fixed_step_hz.max(1)))
    }
}

impl HandArrayConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.separation.validate("layout.separation")?;
        self.layout.radius.validate("layout.radius")?;

        if !(self.layout.smoothing > 0.0 && self.layout.smoothing <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "layout.smoothing",
                reason: format!("must be in (0, 1], got {}", self.layout.smoothing),
            });
        }
        let p = &self.placement;
        for (field, value) in [
            ("layout.rotation_speed", self.layout.rotation_speed),
            ("layout.size_speed", self.layout.size_speed),
            ("layout.offset_speed", self.layout.offset_speed),
            ("layout.stow_scale", self.layout.stow_scale),
            ("hands.proximity_radius", self.hands.proximity_radius),
            ("hands.secondary_grab_threshold", self.hands.secondary_grab_threshold),
            ("hands.input_deadzone", self.hands.input_deadzone),
            ("placement.height_speed", p.height_speed),
            ("placement.max_distance", p.max_distance),
            ("placement.place_duration_secs", p.place_duration_secs),
            ("placement.scale_correction", p.scale_correction),
        ] {
            finite_non_negative(field, value)?;
        }
        if !(p.min_height > 0.0 && p.min_height <= p.height_offset && p.height_offset <= p.max_height) {
            return Err(ConfigError::Invalid {
                field: "placement.height_offset",
                reason: format!(
                    "expected 0 < min_height <= height_offset <= max_height, got {} / {} / {}",
                    p.min_height, p.height_offset, p.max_height
                ),
            });
        }
        if self.timing.fixed_step_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.fixed_step_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn finite_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite and not negative, got {value}"),
        });
    }
    Ok(())
}
