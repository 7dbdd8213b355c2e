//! Taxi Dispatch Simulation Library
//!
//! Simulates a taxi fleet on a procedurally generated grid city and compares
//! greedy and optimal passenger assignment under identical demand.

pub mod simulation;
