//! Greedy nearest-taxi assignment

use log::debug;

use super::{AssignmentStrategy, Pairing, Snapshot};
use crate::simulation::city::City;

/// Each passenger, in queue order, takes the nearest taxi still available
///
/// Ties go to the taxi found first in roster order. Taxis that cannot reach
/// the pickup are never chosen; a passenger with no reachable taxi stays
/// unassigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssignment;

impl AssignmentStrategy for GreedyAssignment {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn assign(&self, city: &City, snapshot: &Snapshot) -> Vec<Pairing> {
        let mut claimed = vec![false; snapshot.taxis.len()];
        let mut available = snapshot.taxis.len();
        let mut pairings = Vec::new();

        for &(passenger_id, pickup) in &snapshot.passengers {
            if available == 0 {
                break;
            }

            let mut best: Option<(usize, usize)> = None;
            for (index, &(_, position)) in snapshot.taxis.iter().enumerate() {
                if claimed[index] {
                    continue;
                }
                let Some(distance) = city.path_distance(position, pickup) else {
                    continue;
                };
                if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                    best = Some((index, distance));
                }
            }

            if let Some((index, distance)) = best {
                claimed[index] = true;
                available -= 1;
                pairings.push(Pairing {
                    taxi: snapshot.taxis[index].0,
                    passenger: passenger_id,
                    distance,
                });
            }
        }

        debug!(
            "Greedy proposed {} pairing(s) for {} passenger(s) and {} idle taxi(s)",
            pairings.len(),
            snapshot.passengers.len(),
            snapshot.taxis.len()
        );
        pairings
    }
}
