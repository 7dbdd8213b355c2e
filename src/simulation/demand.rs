//! Passenger demand generation
//!
//! The generator owns its own PRNG and the passenger ID counter, so two
//! hosts running side by side never share either.

use super::city::City;
use super::config::SimConfig;
use super::passenger::Passenger;
use super::rng::Lcg;
use super::types::PassengerId;

/// Spawn one passenger between two distinct pickup spots
///
/// The city guarantees at least two pickup spots. Draws exactly two values
/// from `rng`.
pub fn spawn_passenger(city: &City, id: PassengerId, tick: u64, rng: &mut Lcg) -> Passenger {
    let spots = city.pickup_spots();
    let pickup_index = rng.next_index(spots.len());

    // Draw from the remaining spots and skip over the pickup
    let mut destination_index = rng.next_index(spots.len().saturating_sub(1));
    if destination_index >= pickup_index {
        destination_index += 1;
    }
    let destination_index = destination_index.min(spots.len() - 1);

    Passenger::new(id, spots[pickup_index], spots[destination_index], tick)
}

/// Per-tick passenger spawner
#[derive(Debug, Clone)]
pub struct DemandGenerator {
    spawn_probability: f64,
    spawn_interval: u64,
    burst_probability: f64,
    burst_min: usize,
    burst_max: usize,
    rng: Lcg,
    next_passenger_id: u64,
}

impl DemandGenerator {
    pub fn new(config: &SimConfig, seed: u32) -> Self {
        Self {
            spawn_probability: config.spawn_probability,
            spawn_interval: config.spawn_interval.max(1),
            burst_probability: config.burst_probability,
            burst_min: config.burst_min,
            burst_max: config.burst_max,
            rng: Lcg::new(seed),
            next_passenger_id: 0,
        }
    }

    fn next_id(&mut self) -> PassengerId {
        let id = PassengerId(self.next_passenger_id);
        self.next_passenger_id += 1;
        id
    }

    /// Number of passengers spawned so far
    pub fn spawned(&self) -> u64 {
        self.next_passenger_id
    }

    /// Passengers appearing at `tick`
    ///
    /// Only ticks that are a multiple of the spawn interval run a check: one
    /// passenger with the spawn probability, then a burst with the burst
    /// probability.
    pub fn generate(&mut self, city: &City, tick: u64) -> Vec<Passenger> {
        let mut spawned = Vec::new();
        if tick % self.spawn_interval != 0 {
            return spawned;
        }

        if self.rng.chance(self.spawn_probability) {
            let id = self.next_id();
            spawned.push(spawn_passenger(city, id, tick, &mut self.rng));
        }

        if self.rng.chance(self.burst_probability) {
            let size = self.rng.range_inclusive(self.burst_min, self.burst_max);
            for _ in 0..size {
                let id = self.next_id();
                spawned.push(spawn_passenger(city, id, tick, &mut self.rng));
            }
        }

        spawned
    }
}
