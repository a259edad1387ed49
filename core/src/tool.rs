use serde::{Deserialize, Serialize};

use crate::*;

/// Parameters of a single mining action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolProfile {
    pub power: Power,
    pub resistance: Resistance,
    /// Stability the wall loses per strike.
    pub damage: u32,
}

impl ToolProfile {
    pub const fn new(power: Power, resistance: Resistance, damage: u32) -> Self {
        Self {
            power,
            resistance,
            damage,
        }
    }

    pub fn pattern_at(&self, origin: Cell) -> MinePattern {
        compute_pattern(origin, self.power, self.resistance)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Strong centre, weak cross, light on the wall.
    Pickaxe,
    /// Wide diamond with decaying power, heavy on the wall.
    Hammer,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Pickaxe, Tool::Hammer];

    pub const fn profile(self) -> ToolProfile {
        match self {
            Self::Pickaxe => ToolProfile::new(3, -1, 1),
            Self::Hammer => ToolProfile::new(4, 0, 2),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pickaxe => "pickaxe",
            Self::Hammer => "hammer",
        }
    }
}

impl Default for Tool {
    fn default() -> Self {
        Self::Pickaxe
    }
}

impl core::str::FromStr for Tool {
    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
