//! Terrain zone categories and the score ("elevation") table the agents climb.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score reported for any coordinate outside the grid.
/// Lower than every real zone score so it is never selectable.
pub const OUT_OF_BOUNDS_SCORE: i32 = -999;

/// Terrain category of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    Transition,
    Village,
    Drought,
    Mountain,
}

impl ZoneType {
    /// All zone types, in the order used to break majority-vote ties.
    pub const ALL: [ZoneType; 4] = [
        ZoneType::Transition,
        ZoneType::Village,
        ZoneType::Drought,
        ZoneType::Mountain,
    ];

    /// Fixed desirability of this zone.
    pub fn score(self) -> i32 {
        match self {
            ZoneType::Village    => 100,
            ZoneType::Mountain   =>  80,
            ZoneType::Transition =>  50,
            ZoneType::Drought    =>  10,
        }
    }

    /// Human-readable name, as shown in a status panel.
    pub fn name(self) -> &'static str {
        match self {
            ZoneType::Transition => "Transition",
            ZoneType::Village    => "Village",
            ZoneType::Drought    => "Drought",
            ZoneType::Mountain   => "Mountain",
        }
    }

    /// Dense index into per-zone count arrays.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            ZoneType::Transition => 0,
            ZoneType::Village    => 1,
            ZoneType::Drought    => 2,
            ZoneType::Mountain   => 3,
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
