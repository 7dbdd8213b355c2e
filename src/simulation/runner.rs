//! Side-by-side runs of several strategies under identical demand

use std::sync::Arc;

use anyhow::Result;

use super::assignment::{AssignmentStrategy, GreedyAssignment, OptimalAssignment};
use super::city::City;
use super::config::SimConfig;
use super::demand::DemandGenerator;
use super::metrics::Metrics;
use super::world::SimulationState;

/// One strategy and the simulation it drives
pub struct Lane {
    pub strategy: Box<dyn AssignmentStrategy>,
    pub state: SimulationState,
}

impl Lane {
    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn metrics(&self) -> Metrics {
        self.state.compute_metrics()
    }
}

/// Drives demand, assignment and ticks for one or more lanes
///
/// All lanes start from the same fleet placement and receive identical
/// passengers every tick, but share no mutable state.
pub struct ComparisonRun {
    city: Arc<City>,
    demand: DemandGenerator,
    lanes: Vec<Lane>,
}

impl ComparisonRun {
    /// Build one lane per strategy from the same initial state
    pub fn new(
        city: Arc<City>,
        config: &SimConfig,
        seed: u32,
        strategies: Vec<Box<dyn AssignmentStrategy>>,
    ) -> Result<Self> {
        let initial = SimulationState::new(Arc::clone(&city), config, seed)?;
        let lanes = strategies
            .into_iter()
            .map(|strategy| Lane {
                strategy,
                state: initial.clone(),
            })
            .collect();

        Ok(Self {
            demand: DemandGenerator::new(config, seed.wrapping_add(1)),
            city,
            lanes,
        })
    }

    /// Greedy and optimal lanes, in that order
    pub fn greedy_vs_optimal(city: Arc<City>, config: &SimConfig, seed: u32) -> Result<Self> {
        Self::new(
            city,
            config,
            seed,
            vec![
                Box::new(GreedyAssignment),
                Box::new(OptimalAssignment::new(config.min_queue_size)),
            ],
        )
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn tick(&self) -> u64 {
        self.lanes.first().map_or(0, |lane| lane.state.tick())
    }

    /// Spawn this tick's passengers into every lane, assign, then advance
    pub fn step(&mut self) {
        let tick = self.tick();
        let arrivals = self.demand.generate(&self.city, tick);

        for lane in &mut self.lanes {
            for passenger in &arrivals {
                lane.state.add_passenger(passenger.clone());
            }
            lane.state.run_assignment(lane.strategy.as_ref());
            lane.state.advance_tick();
        }
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }
}
