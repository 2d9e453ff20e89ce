//! Read-only game context handed to every evaluation call

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::board::{Board, HexCoord};
use crate::core::error::{PrincessError, Result};
use crate::core::types::{TeamId, UnitId};
use crate::units::Unit;

/// Turn phase as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    Deployment,
    Initiative,
    #[default]
    Movement,
    Firing,
    Physical,
    End,
}

impl Phase {
    pub fn is_movement(&self) -> bool {
        matches!(self, Phase::Movement)
    }
}

/// Rules switches the decision core needs to respect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Teams that may not make punch or kick attacks
    #[serde(default)]
    pub physical_attacks_disabled: BTreeSet<TeamId>,
}

impl GameOptions {
    pub fn physical_attacks_allowed(&self, team: TeamId) -> bool {
        !self.physical_attacks_disabled.contains(&team)
    }
}

/// A non-unit objective (building, supply point) worth shooting at or
/// heading toward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicTarget {
    pub name: String,
    pub coord: HexCoord,
}

impl StrategicTarget {
    pub fn new(name: &str, coord: HexCoord) -> Self {
        Self {
            name: name.to_string(),
            coord,
        }
    }
}

/// Everything the decision core reads about the game
///
/// Units live in a `BTreeMap` so iteration order, and with it every
/// floating point sum over units, is stable between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub units: BTreeMap<UnitId, Unit>,
    #[serde(default)]
    pub options: GameOptions,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub strategic_targets: Vec<StrategicTarget>,
}

impl GameSnapshot {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            units: BTreeMap::new(),
            options: GameOptions::default(),
            phase: Phase::Movement,
            round: 1,
            strategic_targets: Vec::new(),
        }
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.units.insert(unit.id, unit);
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.add_unit(unit);
        self
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Look up a unit that must exist
    pub fn require_unit(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id).ok_or(PrincessError::UnitNotFound(id))
    }

    /// Units that are deployed and have a position
    pub fn active_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(|u| u.is_active())
    }

    pub fn is_enemy(&self, a: &Unit, b: &Unit) -> bool {
        a.team != b.team
    }

    /// Active enemies of `unit`
    pub fn enemies_of<'a>(&'a self, unit: &'a Unit) -> impl Iterator<Item = &'a Unit> + 'a {
        self.active_units().filter(move |other| other.team != unit.team)
    }

    /// Active friends of `unit`, not counting itself
    pub fn friends_of<'a>(&'a self, unit: &'a Unit) -> impl Iterator<Item = &'a Unit> + 'a {
        self.active_units()
            .filter(move |other| other.team == unit.team && other.id != unit.id)
    }

    /// Active units standing in a hex
    pub fn units_at(&self, coord: HexCoord) -> impl Iterator<Item = &Unit> {
        self.active_units().filter(move |u| u.position == Some(coord))
    }

    /// Is this hex held by a unit hostile to `team`?
    pub fn occupied_by_enemy(&self, coord: HexCoord, team: TeamId) -> bool {
        self.units_at(coord).any(|u| u.team != team && !u.is_airborne())
    }

    /// Is this hex held by a friendly unit other than `exclude`?
    pub fn occupied_by_friend(&self, coord: HexCoord, team: TeamId, exclude: UnitId) -> bool {
        self.units_at(coord)
            .any(|u| u.team == team && u.id != exclude && !u.is_airborne())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Facing;

    fn snapshot() -> GameSnapshot {
        GameSnapshot::new(Board::new(10, 10))
            .with_unit(Unit::mech(1, "Alpha", 0, 50.0, 4, 0).at(HexCoord::new(1, 1), Facing::East))
            .with_unit(Unit::mech(2, "Bravo", 0, 50.0, 4, 0).at(HexCoord::new(2, 1), Facing::East))
            .with_unit(Unit::mech(3, "Hostile", 1, 50.0, 4, 0).at(HexCoord::new(8, 8), Facing::West))
    }

    #[test]
    fn test_enemies_and_friends() {
        let game = snapshot();
        let alpha = game.unit(UnitId(1)).cloned().unwrap();
        let enemies: Vec<UnitId> = game.enemies_of(&alpha).map(|u| u.id).collect();
        let friends: Vec<UnitId> = game.friends_of(&alpha).map(|u| u.id).collect();
        assert_eq!(enemies, vec![UnitId(3)]);
        assert_eq!(friends, vec![UnitId(2)]);
    }

    #[test]
    fn test_occupancy() {
        let game = snapshot();
        assert!(game.occupied_by_enemy(HexCoord::new(8, 8), TeamId(0)));
        assert!(!game.occupied_by_enemy(HexCoord::new(2, 1), TeamId(0)));
        assert!(game.occupied_by_friend(HexCoord::new(2, 1), TeamId(0), UnitId(1)));
        assert!(!game.occupied_by_friend(HexCoord::new(1, 1), TeamId(0), UnitId(1)));
    }

    #[test]
    fn test_require_unknown_unit() {
        let game = snapshot();
        assert!(matches!(
            game.require_unit(UnitId(99)),
            Err(PrincessError::UnitNotFound(UnitId(99)))
        ));
    }

    #[test]
    fn test_undeployed_units_are_inactive() {
        let mut game = snapshot();
        game.add_unit(Unit::mech(4, "Reserve", 1, 50.0, 4, 0));
        assert_eq!(game.active_units().count(), 3);
    }

    #[test]
    fn test_physical_attack_option() {
        let mut options = GameOptions::default();
        assert!(options.physical_attacks_allowed(TeamId(1)));
        options.physical_attacks_disabled.insert(TeamId(1));
        assert!(!options.physical_attacks_allowed(TeamId(1)));
    }
}
