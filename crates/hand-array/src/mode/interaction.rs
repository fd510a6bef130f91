//! Process-wide interaction modes

use serde::{Deserialize, Serialize};

/// What the hands are currently doing with their arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Picking items up into the arrays
    #[default]
    Collection,
    /// Rotating, resizing and reordering an array
    Manipulation,
    /// Projecting an array onto surfaces
    Placement,
    /// Browsing a palette of spawnable items
    Palette,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 4] = [
        InteractionMode::Collection,
        InteractionMode::Manipulation,
        InteractionMode::Placement,
        InteractionMode::Palette,
    ];

    /// Whether primary/secondary roles may be assigned in this mode
    pub fn allows_negotiation(&self) -> bool {
        matches!(self, InteractionMode::Manipulation | InteractionMode::Placement)
    }

    /// Whether the grab zone is shown to the user
    pub fn shows_grab_zone(&self) -> bool {
        matches!(self, InteractionMode::Collection)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Collection => "collection",
            InteractionMode::Manipulation => "manipulation",
            InteractionMode::Placement => "placement",
            InteractionMode::Palette => "palette",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(InteractionMode::default(), InteractionMode::Collection);
    }

    #[test]
    fn test_negotiation_modes() {
        let allowed: Vec<_> = InteractionMode::ALL
            .iter()
            .filter(|m| m.allows_negotiation())
            .collect();
        assert_eq!(allowed, vec![&InteractionMode::Manipulation, &InteractionMode::Placement]);
    }

    #[test]
    fn test_mode_names_parse_back() {
        for mode in InteractionMode::ALL {
            let text = format!("mode = \"{}\"", mode.name());
            #[derive(Deserialize)]
            struct Wrapper {
                mode: InteractionMode,
            }
            let parsed: Wrapper = toml::from_str(&text).unwrap();
            assert_eq!(parsed.mode, mode);
        }
    }
}
