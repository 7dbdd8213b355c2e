//! Fleet placement, movement and assignment commits
//!
//! Free functions over the taxi roster and the waiting queue.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use super::assignment::Pairing;
use super::city::City;
use super::passenger::Passenger;
use super::rng::Lcg;
use super::taxi::{Taxi, TaxiUpdateResult};
use super::types::{PassengerId, TaxiId};

/// Place `fleet_size` taxis on random road cells
///
/// Taxi IDs are their roster indices.
pub fn spawn_fleet(city: &City, fleet_size: usize, rng: &mut Lcg) -> Vec<Taxi> {
    let roads = city.road_cells();
    (0..fleet_size)
        .map(|index| Taxi::new(TaxiId(index), roads[rng.next_index(roads.len())]))
        .collect()
}

/// Move every taxi one step, in roster order
///
/// Returns the taxis whose path just ran out and need a state transition.
pub fn update_taxis(taxis: &mut [Taxi]) -> Vec<(TaxiId, TaxiUpdateResult)> {
    let mut results = Vec::new();

    for taxi in taxis.iter_mut() {
        match taxi.update() {
            TaxiUpdateResult::Idle | TaxiUpdateResult::Continue | TaxiUpdateResult::Stuck => {}
            result => results.push((taxi.id, result)),
        }
    }

    results
}

/// Apply proposed pairings
///
/// Each pairing is re-checked against the current state: the taxi must be
/// idle, the passenger waiting and unassigned, neither used earlier in this
/// batch, and the pickup reachable. Pairings that fail are dropped.
/// Returns the number applied.
pub fn commit_pairings(
    city: &City,
    taxis: &mut [Taxi],
    waiting: &mut BTreeMap<PassengerId, Passenger>,
    pairings: &[Pairing],
) -> usize {
    let mut used_taxis = HashSet::new();
    let mut used_passengers = HashSet::new();
    let mut applied = 0;

    for pairing in pairings {
        let Some(taxi) = taxis.get_mut(pairing.taxi.0) else {
            debug!("Dropping pairing for unknown taxi {:?}", pairing.taxi);
            continue;
        };
        let Some(passenger) = waiting.get_mut(&pairing.passenger) else {
            debug!(
                "Dropping pairing for passenger {:?}: not waiting",
                pairing.passenger
            );
            continue;
        };

        if !taxi.is_idle()
            || passenger.is_assigned()
            || used_taxis.contains(&pairing.taxi)
            || used_passengers.contains(&pairing.passenger)
        {
            debug!(
                "Dropping stale pairing {:?} -> {:?}",
                pairing.taxi, pairing.passenger
            );
            continue;
        }

        let path = city.find_path(taxi.position, passenger.pickup);
        if path.is_empty() {
            debug!(
                "Dropping pairing {:?} -> {:?}: pickup unreachable",
                pairing.taxi, pairing.passenger
            );
            continue;
        }

        passenger.assigned_taxi = Some(taxi.id);
        taxi.begin_pickup(passenger.id, passenger.pickup, path);
        used_taxis.insert(pairing.taxi);
        used_passengers.insert(pairing.passenger);
        applied += 1;
    }

    applied
}
