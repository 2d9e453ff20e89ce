//! Background upkeep of every unit's reachable set
//!
//! A dedicated worker thread owns the dirty queue. Callers talk to it only
//! through a command channel: game events and dirty marks go in, and a
//! barrier request comes back answered once nothing is left to recompute.
//! Finished sets are published into a shared table by swapping in a new
//! `Arc`, so readers see either the old set or the new one, never a
//! partial rebuild.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use crate::board::HexCoord;
use crate::core::config::DecisionConfig;
use crate::core::error::{PrincessError, Result};
use crate::core::types::UnitId;
use crate::game::{GameEvent, GameSnapshot};
use crate::princess::movement::{PathEnumerator, ReachableSet, ReachableTable};

/// What the worker is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrecognitionState {
    /// Nothing dirty, waiting on the channel
    Idle = 0,
    /// Draining queued commands into dirty marks
    ProcessingEvents = 1,
    /// Rebuilding one unit's reachable set
    RecomputingUnit = 2,
    /// The worker has exited
    Stopped = 3,
}

impl PrecognitionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PrecognitionState::Idle,
            1 => PrecognitionState::ProcessingEvents,
            2 => PrecognitionState::RecomputingUnit,
            _ => PrecognitionState::Stopped,
        }
    }
}

/// Commands accepted by the worker
enum Command {
    Event(GameEvent),
    MarkDirty(UnitId),
    UpdateSnapshot(Arc<GameSnapshot>),
    /// Answered once the dirty queue is empty
    Barrier(oneshot::Sender<()>),
    Shutdown,
}

type SharedTable = Arc<RwLock<ReachableTable>>;

fn read_table(table: &RwLock<ReachableTable>) -> RwLockReadGuard<'_, ReachableTable> {
    table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_table(table: &RwLock<ReachableTable>) -> RwLockWriteGuard<'_, ReachableTable> {
    table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to the background worker
///
/// Dropping the handle stops the worker and joins its thread.
pub struct Precognition {
    commands: mpsc::UnboundedSender<Command>,
    table: SharedTable,
    state: Arc<AtomicU8>,
    worker: Option<JoinHandle<()>>,
}

impl Precognition {
    /// Start the worker with every active unit marked dirty
    pub fn spawn(game: Arc<GameSnapshot>, config: DecisionConfig) -> Result<Self> {
        let (commands, receiver) = mpsc::unbounded_channel();
        let table: SharedTable = Arc::new(RwLock::new(ReachableTable::new()));
        let state = Arc::new(AtomicU8::new(PrecognitionState::Idle as u8));

        let dirty: BTreeSet<UnitId> = game.active_units().map(|u| u.id).collect();
        let worker = Worker {
            receiver,
            game,
            config,
            table: Arc::clone(&table),
            state: Arc::clone(&state),
            dirty,
            barriers: Vec::new(),
        };
        let handle = std::thread::Builder::new()
            .name("precognition".into())
            .spawn(move || worker.run())?;
        info!("precognition worker started");

        Ok(Self {
            commands,
            table,
            state,
            worker: Some(handle),
        })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PrincessError::WorkerDisconnected)
    }

    pub fn mark_unit_dirty(&self, unit: UnitId) -> Result<()> {
        self.send(Command::MarkDirty(unit))
    }

    /// Feed a game change; the worker works out which units it affects
    pub fn handle_event(&self, event: GameEvent) -> Result<()> {
        self.send(Command::Event(event))
    }

    /// Replace the game state the worker enumerates against
    pub fn update_snapshot(&self, game: Arc<GameSnapshot>) -> Result<()> {
        self.send(Command::UpdateSnapshot(game))
    }

    /// Block until every unit dirty at the time of the call has been
    /// recomputed and the worker has gone idle
    pub fn wait_until_current(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.send(Command::Barrier(reply))?;
        done.blocking_recv().map_err(|_| PrincessError::WorkerDisconnected)
    }

    /// Closed copy of the table for one decision
    pub fn snapshot(&self) -> ReachableTable {
        read_table(&self.table).clone()
    }

    pub fn reachable(&self, unit: UnitId) -> Option<Arc<ReachableSet>> {
        read_table(&self.table).get(&unit).cloned()
    }

    pub fn state(&self) -> PrecognitionState {
        PrecognitionState::from_u8(self.state.load(Ordering::Acquire))
    }
}

impl Drop for Precognition {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    receiver: mpsc::UnboundedReceiver<Command>,
    game: Arc<GameSnapshot>,
    config: DecisionConfig,
    table: SharedTable,
    state: Arc<AtomicU8>,
    /// Ordered so recompute order is repeatable
    dirty: BTreeSet<UnitId>,
    barriers: Vec<oneshot::Sender<()>>,
}

impl Worker {
    fn run(mut self) {
        loop {
            if self.dirty.is_empty() {
                self.release_barriers();
                self.set_state(PrecognitionState::Idle);
                match self.receiver.blocking_recv() {
                    Some(command) => {
                        self.set_state(PrecognitionState::ProcessingEvents);
                        if !self.apply(command) {
                            break;
                        }
                    }
                    None => break,
                }
            }

            self.set_state(PrecognitionState::ProcessingEvents);
            if !self.drain() {
                break;
            }

            if let Some(unit) = self.dirty.pop_first() {
                self.set_state(PrecognitionState::RecomputingUnit);
                self.recompute(unit);
            }
        }

        self.set_state(PrecognitionState::Stopped);
        info!("precognition worker stopped");
    }

    /// Apply everything already queued; false once told to stop
    fn drain(&mut self) -> bool {
        loop {
            match self.receiver.try_recv() {
                Ok(command) => {
                    if !self.apply(command) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Event(event) => self.process_event(event),
            Command::MarkDirty(unit) => {
                self.dirty.insert(unit);
            }
            Command::UpdateSnapshot(game) => {
                let previous = std::mem::replace(&mut self.game, game);
                self.mark_moved_since(&previous);
                self.mark_stale();
            }
            Command::Barrier(reply) => {
                if self.dirty.is_empty() {
                    let _ = reply.send(());
                } else {
                    self.barriers.push(reply);
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn process_event(&mut self, event: GameEvent) {
        trace!(?event, "precognition event");
        match &event {
            GameEvent::PhaseChanged { phase } if phase.is_movement() => self.mark_all(),
            GameEvent::PhaseChanged { .. } => {}
            GameEvent::BoardChanged => self.mark_all(),
            GameEvent::UnitRemoved { unit, .. } => {
                write_table(&self.table).remove(unit);
                self.dirty.remove(unit);
                self.mark_touching(&event.touched_hexes());
            }
            GameEvent::UnitMoved { unit, .. } | GameEvent::UnitDeployed { unit, .. } => {
                self.dirty.insert(*unit);
                self.mark_touching(&event.touched_hexes());
            }
        }
    }

    /// Dirty every unit whose reachable set includes one of `hexes`
    fn mark_touching(&mut self, hexes: &[HexCoord]) {
        if hexes.is_empty() {
            return;
        }
        let touched: Vec<UnitId> = read_table(&self.table)
            .iter()
            .filter(|(_, set)| set.contains_any(hexes))
            .map(|(id, _)| *id)
            .collect();
        self.dirty.extend(touched);
    }

    fn mark_all(&mut self) {
        self.dirty.extend(self.game.active_units().map(|u| u.id));
    }

    /// Dirty units whose position differs from `previous`, along with every
    /// set touching the hexes they left or entered. Events can arrive ahead
    /// of the snapshot they describe, so neighbours may have been computed
    /// against stale occupancy.
    fn mark_moved_since(&mut self, previous: &GameSnapshot) {
        let mut moved = Vec::new();
        let mut hexes = Vec::new();
        for unit in self.game.units.values() {
            let before = previous.unit(unit.id).and_then(|u| u.position.filter(|_| u.deployed));
            let now = unit.position.filter(|_| unit.deployed);
            if before != now {
                moved.push(unit.id);
                hexes.extend(before);
                hexes.extend(now);
            }
        }
        for unit in previous.units.values() {
            if self.game.unit(unit.id).is_none() {
                hexes.extend(unit.position);
            }
        }
        if moved.is_empty() && hexes.is_empty() {
            return;
        }
        trace!(units = moved.len(), hexes = hexes.len(), "snapshot moved units");
        self.dirty.extend(moved);
        self.mark_touching(&hexes);
    }

    /// Dirty units the table has no current set for
    fn mark_stale(&mut self) {
        let table = read_table(&self.table);
        let stale: Vec<UnitId> = self
            .game
            .active_units()
            .filter(|unit| table.get(&unit.id).map_or(true, |set| set.is_stale_for(unit)))
            .map(|unit| unit.id)
            .collect();
        drop(table);
        self.dirty.extend(stale);
    }

    fn recompute(&self, id: UnitId) {
        let Some(unit) = self.game.unit(id) else {
            write_table(&self.table).remove(&id);
            return;
        };
        let set = PathEnumerator::new(&self.game, &self.config).recalculate_reachable_set(unit);
        debug!(unit = %id, states = set.len(), truncated = set.truncated, "recomputed reachable set");
        write_table(&self.table).insert(id, Arc::new(set));
    }

    fn release_barriers(&mut self) {
        for reply in self.barriers.drain(..) {
            let _ = reply.send(());
        }
    }

    fn set_state(&self, state: PrecognitionState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Facing};
    use crate::units::Unit;

    fn game() -> Arc<GameSnapshot> {
        Arc::new(
            GameSnapshot::new(Board::new(12, 12))
                .with_unit(Unit::mech(1, "Alpha", 0, 50.0, 4, 0).at(HexCoord::new(2, 2), Facing::East))
                .with_unit(Unit::mech(2, "Bravo", 1, 50.0, 4, 0).at(HexCoord::new(9, 9), Facing::West)),
        )
    }

    #[test]
    fn test_initial_sets_are_published() {
        let precog = Precognition::spawn(game(), DecisionConfig::default()).unwrap();
        precog.wait_until_current().unwrap();
        let table = precog.snapshot();
        assert_eq!(table.len(), 2);
        assert!(table.get(&UnitId(1)).unwrap().contains(HexCoord::new(3, 2)));
    }

    #[test]
    fn test_state_is_idle_after_barrier() {
        let precog = Precognition::spawn(game(), DecisionConfig::default()).unwrap();
        precog.wait_until_current().unwrap();
        // The worker may still be between answering and parking
        for _ in 0..100 {
            if precog.state() == PrecognitionState::Idle {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(precog.state(), PrecognitionState::Idle);
    }

    #[test]
    fn test_removed_unit_leaves_table() {
        let precog = Precognition::spawn(game(), DecisionConfig::default()).unwrap();
        precog.wait_until_current().unwrap();
        precog
            .handle_event(GameEvent::UnitRemoved {
                unit: UnitId(2),
                last_position: Some(HexCoord::new(9, 9)),
            })
            .unwrap();
        precog.wait_until_current().unwrap();
        assert!(precog.reachable(UnitId(2)).is_none());
        assert!(precog.reachable(UnitId(1)).is_some());
    }

    #[test]
    fn test_state_round_trips_through_atomic() {
        for state in [
            PrecognitionState::Idle,
            PrecognitionState::ProcessingEvents,
            PrecognitionState::RecomputingUnit,
            PrecognitionState::Stopped,
        ] {
            assert_eq!(PrecognitionState::from_u8(state as u8), state);
        }
    }
}
