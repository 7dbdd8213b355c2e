//! Passenger-to-taxi assignment strategies
//!
//! Both strategies look at the same snapshot of idle taxis and unassigned
//! waiting passengers and propose pairings. Applying them is the world's job
//! (see `SimulationState::commit_pairings`), which re-checks every pairing.

pub mod greedy;
pub mod hungarian;
pub mod optimal;

pub use greedy::GreedyAssignment;
pub use optimal::{OptimalAssignment, UNREACHABLE_COST};

use super::city::City;
use super::types::{PassengerId, Position, TaxiId};
use super::world::SimulationState;

/// A proposed taxi/passenger match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub taxi: TaxiId,
    pub passenger: PassengerId,
    /// Path distance from the taxi to the pickup spot at scoring time
    pub distance: usize,
}

/// Idle taxis and unassigned waiting passengers, in roster and queue order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub taxis: Vec<(TaxiId, Position)>,
    pub passengers: Vec<(PassengerId, Position)>,
}

impl Snapshot {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            taxis: state
                .idle_taxis()
                .map(|taxi| (taxi.id, taxi.position))
                .collect(),
            passengers: state
                .unassigned_passengers()
                .map(|passenger| (passenger.id, passenger.pickup))
                .collect(),
        }
    }
}

/// A way of matching idle taxis to waiting passengers
///
/// Every returned pairing references a taxi and a passenger from the
/// snapshot, and no ID appears twice.
pub trait AssignmentStrategy {
    fn name(&self) -> &'static str;

    fn assign(&self, city: &City, snapshot: &Snapshot) -> Vec<Pairing>;

    fn propose(&self, state: &SimulationState) -> Vec<Pairing> {
        self.assign(state.city(), &Snapshot::from_state(state))
    }
}

/// Summed pickup distance of a batch
pub fn total_distance(pairings: &[Pairing]) -> usize {
    pairings.iter().map(|pairing| pairing.distance).sum()
}
