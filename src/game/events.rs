//! Game state change notifications fed to the background worker

use serde::{Deserialize, Serialize};

use crate::board::HexCoord;
use crate::core::types::UnitId;
use crate::game::snapshot::Phase;

/// Something changed in the authoritative game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    UnitMoved {
        unit: UnitId,
        from: Option<HexCoord>,
        to: HexCoord,
    },
    UnitDeployed {
        unit: UnitId,
        at: HexCoord,
    },
    UnitRemoved {
        unit: UnitId,
        last_position: Option<HexCoord>,
    },
    PhaseChanged {
        phase: Phase,
    },
    /// Terrain or buildings changed somewhere
    BoardChanged,
}

impl GameEvent {
    /// The unit the event is about, if any
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            GameEvent::UnitMoved { unit, .. }
            | GameEvent::UnitDeployed { unit, .. }
            | GameEvent::UnitRemoved { unit, .. } => Some(*unit),
            GameEvent::PhaseChanged { .. } | GameEvent::BoardChanged => None,
        }
    }

    /// Hexes whose occupancy changed
    pub fn touched_hexes(&self) -> Vec<HexCoord> {
        match self {
            GameEvent::UnitMoved { from, to, .. } => from.iter().copied().chain([*to]).collect(),
            GameEvent::UnitDeployed { at, .. } => vec![*at],
            GameEvent::UnitRemoved { last_position, .. } => last_position.iter().copied().collect(),
            GameEvent::PhaseChanged { .. } | GameEvent::BoardChanged => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_event_touches_both_hexes() {
        let event = GameEvent::UnitMoved {
            unit: UnitId(1),
            from: Some(HexCoord::new(1, 1)),
            to: HexCoord::new(2, 1),
        };
        assert_eq!(event.unit(), Some(UnitId(1)));
        assert_eq!(event.touched_hexes(), vec![HexCoord::new(1, 1), HexCoord::new(2, 1)]);
    }

    #[test]
    fn test_board_change_has_no_unit() {
        assert_eq!(GameEvent::BoardChanged.unit(), None);
        assert!(GameEvent::BoardChanged.touched_hexes().is_empty());
    }
}
