//! Terrain types and their effects on movement, line of sight and piloting

use serde::{Deserialize, Serialize};

/// Primary terrain type for a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Clear,
    Pavement,     // Skid risk when turning after running
    Rough,
    LightWoods,   // +1 to-hit when intervening or occupied
    HeavyWoods,   // +2 to-hit, tanks cannot enter
    ShallowWater, // Depth 1, piloting roll to enter
    DeepWater,    // Depth 2+, mechs only
    Rubble,       // Piloting roll to enter
    Building,     // Construction factor lives on the hex
}

impl Terrain {
    /// Move point cost to enter, before elevation changes
    pub fn movement_cost(&self) -> u32 {
        match self {
            Terrain::Clear | Terrain::Pavement => 1,
            Terrain::Rough | Terrain::LightWoods | Terrain::Rubble => 2,
            Terrain::ShallowWater | Terrain::Building => 2,
            Terrain::HeavyWoods => 3,
            Terrain::DeepWater => 4,
        }
    }

    /// To-hit modifier for shooting through or into this terrain
    pub fn woods_modifier(&self) -> i32 {
        match self {
            Terrain::LightWoods => 1,
            Terrain::HeavyWoods => 2,
            _ => 0,
        }
    }

    /// Does this terrain block line of sight outright?
    pub fn blocks_los(&self) -> bool {
        matches!(self, Terrain::Building)
    }

    /// Is entering this terrain a piloting hazard?
    pub fn requires_piloting_roll(&self) -> bool {
        matches!(
            self,
            Terrain::ShallowWater | Terrain::DeepWater | Terrain::Rubble
        )
    }

    /// Piloting modifier for the roll required to enter
    pub fn piloting_modifier(&self) -> i32 {
        match self {
            Terrain::ShallowWater => -1,
            Terrain::DeepWater => 1,
            _ => 0,
        }
    }

    /// Is this terrain impassable for tanks?
    pub fn impassable_for_tanks(&self) -> bool {
        matches!(self, Terrain::HeavyWoods | Terrain::DeepWater)
    }

    /// Is this terrain impassable for infantry?
    pub fn impassable_for_infantry(&self) -> bool {
        matches!(self, Terrain::DeepWater)
    }

    /// Is this a paved surface?
    pub fn is_paved(&self) -> bool {
        matches!(self, Terrain::Pavement)
    }
}

/// A building standing on a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Current construction factor (tons the structure can bear)
    pub construction_factor: u32,
}

impl Building {
    pub fn new(construction_factor: u32) -> Self {
        Self {
            construction_factor,
        }
    }

    /// Will the building hold a unit of this weight?
    pub fn supports(&self, weight_tons: f64) -> bool {
        self.construction_factor as f64 >= weight_tons
    }
}
