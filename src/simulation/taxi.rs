//! Taxi movement logic for the dispatch simulation
//!
//! A taxi moves one cell per tick along its planned path. State transitions
//! happen in the world once the path runs out.

use std::collections::VecDeque;

use super::types::{PassengerId, Position, TaxiId, TaxiState};

/// Result of a taxi update indicating what the world should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiUpdateResult {
    Idle,                                // Nothing to do, waiting for an assignment
    Continue,                            // Moved one cell, path not finished
    ArrivedAtPickup(PassengerId),        // Path finished while picking up
    ArrivedAtDestination(PassengerId),   // Path finished while delivering
    Stuck,                               // Busy but holds no path to follow
}

/// A taxi in the dispatch simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxi {
    pub id: TaxiId,
    pub position: Position,
    pub target: Option<Position>,
    /// Remaining planned path; the front is the next step
    pub path: VecDeque<Position>,
    /// The passenger being served, looked up in the world by ID
    pub passenger: Option<PassengerId>,
    pub state: TaxiState,
    pub deliveries: u64,
    pub distance_traveled: u64,
}

impl Taxi {
    pub fn new(id: TaxiId, position: Position) -> Self {
        Self {
            id,
            position,
            target: None,
            path: VecDeque::new(),
            passenger: None,
            state: TaxiState::Idle,
            deliveries: 0,
            distance_traveled: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == TaxiState::Idle
    }

    /// Attach a passenger and head for their pickup spot
    pub fn begin_pickup(&mut self, passenger: PassengerId, pickup: Position, path: Vec<Position>) {
        self.state = TaxiState::PickingUp;
        self.passenger = Some(passenger);
        self.target = Some(pickup);
        self.path = path.into();
    }

    /// Head for the passenger's destination
    pub fn begin_delivery(&mut self, destination: Position, path: Vec<Position>) {
        self.state = TaxiState::Delivering;
        self.target = Some(destination);
        self.path = path.into();
    }

    /// Drop the passenger and return to idle
    pub fn finish_delivery(&mut self) {
        self.deliveries += 1;
        self.passenger = None;
        self.target = None;
        self.path.clear();
        self.state = TaxiState::Idle;
    }

    /// Advance one cell along the path
    pub fn update(&mut self) -> TaxiUpdateResult {
        let Some(next) = self.path.pop_front() else {
            return match self.state {
                TaxiState::Idle => TaxiUpdateResult::Idle,
                _ => TaxiUpdateResult::Stuck,
            };
        };

        self.position = next;
        self.distance_traveled += 1;

        if !self.path.is_empty() {
            return TaxiUpdateResult::Continue;
        }

        match (self.state, self.passenger) {
            (TaxiState::PickingUp, Some(passenger)) => TaxiUpdateResult::ArrivedAtPickup(passenger),
            (TaxiState::Delivering, Some(passenger)) => {
                TaxiUpdateResult::ArrivedAtDestination(passenger)
            }
            // A path without a passenger only happens if the world was edited by hand
            _ => TaxiUpdateResult::Continue,
        }
    }
}
