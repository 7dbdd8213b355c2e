//! Passenger records
//!
//! A passenger moves through the simulation's waiting, active and completed
//! collections. Taxis refer to passengers by ID only.

use super::types::{PassengerId, Position, TaxiId};

/// A passenger and their trip timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passenger {
    pub id: PassengerId,
    pub pickup: Position,
    pub destination: Position,
    pub spawn_tick: u64,
    pub pickup_tick: Option<u64>,
    pub delivery_tick: Option<u64>,
    pub assigned_taxi: Option<TaxiId>,
}

impl Passenger {
    pub fn new(id: PassengerId, pickup: Position, destination: Position, spawn_tick: u64) -> Self {
        Self {
            id,
            pickup,
            destination,
            spawn_tick,
            pickup_tick: None,
            delivery_tick: None,
            assigned_taxi: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_taxi.is_some()
    }

    /// Ticks spent waiting: until pickup, or until `now` if still waiting
    pub fn wait_time(&self, now: u64) -> u64 {
        self.pickup_tick.unwrap_or(now).saturating_sub(self.spawn_tick)
    }

    /// Ticks spent in the taxi, once delivered
    pub fn trip_time(&self) -> Option<u64> {
        match (self.pickup_tick, self.delivery_tick) {
            (Some(pickup), Some(delivery)) => Some(delivery.saturating_sub(pickup)),
            _ => None,
        }
    }
}
