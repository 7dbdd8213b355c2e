//! Service metrics
//!
//! Recomputed from the current state on demand, never stored.

use super::types::TaxiState;
use super::world::SimulationState;

/// Running service metrics for one simulation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metrics {
    /// Mean ticks from spawn to pickup, pooling served and still-waiting passengers
    pub average_wait_time: f64,
    /// Mean ticks from pickup to delivery over served passengers
    pub average_trip_time: f64,
    pub total_passengers_served: usize,
    pub passengers_waiting: usize,
    pub passengers_riding: usize,
    /// Fraction of the fleet not idle
    pub fleet_utilization: f64,
    pub total_distance: u64,
}

/// Aggregate metrics over the current state without touching it
pub fn compute_metrics(state: &SimulationState) -> Metrics {
    let now = state.tick();
    let served = state.completed.len();
    let waiting = state.waiting.len();

    let served_wait: u64 = state
        .completed
        .values()
        .map(|passenger| passenger.wait_time(now))
        .sum();
    let pending_wait: u64 = state
        .waiting
        .values()
        .map(|passenger| passenger.wait_time(now))
        .sum();
    let trip_total: u64 = state
        .completed
        .values()
        .filter_map(|passenger| passenger.trip_time())
        .sum();

    let busy = state
        .taxis
        .iter()
        .filter(|taxi| taxi.state != TaxiState::Idle)
        .count();

    Metrics {
        average_wait_time: mean(served_wait + pending_wait, served + waiting),
        average_trip_time: mean(trip_total, served),
        total_passengers_served: served,
        passengers_waiting: waiting,
        passengers_riding: state.active.len(),
        fleet_utilization: mean(busy as u64, state.taxis.len()),
        total_distance: state.taxis.iter().map(|taxi| taxi.distance_traveled).sum(),
    }
}

fn mean(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

impl Metrics {
    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Served: {} | Waiting: {} | Riding: {} | Avg wait: {:.2} | Avg trip: {:.2} | Utilization: {:.1}% | Distance: {}",
            self.total_passengers_served,
            self.passengers_waiting,
            self.passengers_riding,
            self.average_wait_time,
            self.average_trip_time,
            self.fleet_utilization * 100.0,
            self.total_distance
        )
    }
}
