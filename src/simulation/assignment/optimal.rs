//! Globally optimal batch assignment

use log::debug;

use super::hungarian;
use super::{AssignmentStrategy, Pairing, Snapshot};
use crate::simulation::city::City;

/// Cost used for taxi/passenger pairs with no road path
///
/// Larger than any real path, small enough that a full batch of them cannot
/// overflow `i64` inside the solver.
pub const UNREACHABLE_COST: i64 = 1_000_000_000_000;

/// Minimum-total-distance matching over the whole batch
///
/// Does nothing until at least `min_queue_size` unassigned passengers are
/// waiting. There is no greedy fallback below the threshold.
#[derive(Debug, Clone, Copy)]
pub struct OptimalAssignment {
    pub min_queue_size: usize,
}

impl OptimalAssignment {
    pub fn new(min_queue_size: usize) -> Self {
        Self { min_queue_size }
    }
}

impl AssignmentStrategy for OptimalAssignment {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn assign(&self, city: &City, snapshot: &Snapshot) -> Vec<Pairing> {
        if snapshot.taxis.is_empty()
            || snapshot.passengers.is_empty()
            || snapshot.passengers.len() < self.min_queue_size
        {
            debug!(
                "Optimal skipped: {} unassigned passenger(s), {} idle taxi(s), threshold {}",
                snapshot.passengers.len(),
                snapshot.taxis.len(),
                self.min_queue_size
            );
            return Vec::new();
        }

        // Rows are taxis, columns are passengers; the solver handles either shape
        let costs: Vec<Vec<i64>> = snapshot
            .taxis
            .iter()
            .map(|&(_, position)| {
                snapshot
                    .passengers
                    .iter()
                    .map(|&(_, pickup)| {
                        city.path_distance(position, pickup)
                            .map_or(UNREACHABLE_COST, |distance| distance as i64)
                    })
                    .collect()
            })
            .collect();

        let solution = hungarian::solve(&costs);

        let pairings: Vec<Pairing> = solution
            .pairs
            .iter()
            .filter(|&&(row, col)| row < snapshot.taxis.len() && col < snapshot.passengers.len())
            .filter(|&&(row, col)| costs[row][col] < UNREACHABLE_COST)
            .map(|&(row, col)| Pairing {
                taxi: snapshot.taxis[row].0,
                passenger: snapshot.passengers[col].0,
                distance: costs[row][col] as usize,
            })
            .collect();

        debug!(
            "Optimal proposed {} pairing(s) for {} passenger(s) and {} idle taxi(s)",
            pairings.len(),
            snapshot.passengers.len(),
            snapshot.taxis.len()
        );
        pairings
    }
}
