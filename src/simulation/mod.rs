//! Standalone taxi dispatch simulation
//!
//! This module contains the deterministic core: city generation,
//! pathfinding, the assignment strategies and the tick state machine. It
//! has no rendering or timing concerns and can be driven from any host.

mod city;
mod config;
mod demand;
mod fleet;
mod metrics;
mod passenger;
mod rng;
mod road_network;
mod runner;
mod taxi;
mod types;
mod world;

pub mod assignment;

pub use assignment::{
    hungarian, total_distance, AssignmentStrategy, GreedyAssignment, OptimalAssignment, Pairing,
    Snapshot, UNREACHABLE_COST,
};
pub use city::{
    generate_city, City, BUILDING_PROBABILITY_INTERIOR, BUILDING_PROBABILITY_NEAR_ROAD,
    MIN_ARTERIAL_SPACING,
};
pub use config::{
    SimConfig, DEFAULT_BURST_MAX, DEFAULT_BURST_MIN, DEFAULT_BURST_PROBABILITY,
    DEFAULT_FLEET_SIZE, DEFAULT_HEIGHT, DEFAULT_MIN_QUEUE_SIZE, DEFAULT_SPAWN_INTERVAL,
    DEFAULT_SPAWN_PROBABILITY, DEFAULT_WIDTH,
};
pub use demand::{spawn_passenger, DemandGenerator};
pub use metrics::{compute_metrics, Metrics};
pub use passenger::Passenger;
pub use rng::Lcg;
pub use road_network::{Path, RoadNetwork};
pub use runner::{ComparisonRun, Lane};
pub use taxi::{Taxi, TaxiUpdateResult};
pub use types::{CellKind, PassengerId, Position, TaxiId, TaxiState};
pub use world::SimulationState;
