//! Main simulation state that ties everything together
//!
//! `SimulationState` owns the fleet, the three passenger collections and the
//! tick counter. The city is shared read-only behind an `Arc`, so cloning a
//! state yields a fully independent simulation over the same map.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{ensure, Result};
use log::{debug, warn};

use super::assignment::{
    total_distance, AssignmentStrategy, GreedyAssignment, OptimalAssignment, Pairing,
};
use super::city::City;
use super::config::SimConfig;
use super::fleet;
use super::metrics::{compute_metrics, Metrics};
use super::passenger::Passenger;
use super::rng::Lcg;
use super::taxi::{Taxi, TaxiUpdateResult};
use super::types::{PassengerId, Position, TaxiId, TaxiState};

/// The authoritative state of one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    city: Arc<City>,

    /// The fleet in roster order; `taxis[i].id == TaxiId(i)`
    pub taxis: Vec<Taxi>,

    /// Spawned and not yet picked up (assigned or not), in queue order
    pub waiting: BTreeMap<PassengerId, Passenger>,

    /// Picked up and riding
    pub active: BTreeMap<PassengerId, Passenger>,

    /// Delivered; never modified again
    pub completed: BTreeMap<PassengerId, Passenger>,

    tick: u64,
}

impl SimulationState {
    /// Create a simulation with `config.fleet_size` taxis on random road cells
    pub fn new(city: Arc<City>, config: &SimConfig, seed: u32) -> Result<Self> {
        config.validate()?;
        let mut rng = Lcg::new(seed);
        let taxis = fleet::spawn_fleet(&city, config.fleet_size, &mut rng);
        Ok(Self::from_parts(city, taxis))
    }

    /// Create a simulation with taxis at the given road cells, in order
    pub fn with_taxis(city: Arc<City>, positions: &[Position]) -> Result<Self> {
        for position in positions {
            ensure!(
                city.is_road(*position),
                "Taxi start {:?} is not a road cell",
                position
            );
        }
        let taxis = positions
            .iter()
            .enumerate()
            .map(|(index, position)| Taxi::new(TaxiId(index), *position))
            .collect();
        Ok(Self::from_parts(city, taxis))
    }

    fn from_parts(city: Arc<City>, taxis: Vec<Taxi>) -> Self {
        Self {
            city,
            taxis,
            waiting: BTreeMap::new(),
            active: BTreeMap::new(),
            completed: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    /// Shared handle to the city, for building sibling simulations
    pub fn city_handle(&self) -> Arc<City> {
        Arc::clone(&self.city)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn taxi(&self, id: TaxiId) -> Option<&Taxi> {
        self.taxis.get(id.0)
    }

    /// Look a passenger up in whichever collection holds them
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.waiting
            .get(&id)
            .or_else(|| self.active.get(&id))
            .or_else(|| self.completed.get(&id))
    }

    /// The passenger a taxi is currently serving
    pub fn current_passenger(&self, taxi: TaxiId) -> Option<&Passenger> {
        self.taxi(taxi)
            .and_then(|taxi| taxi.passenger)
            .and_then(|id| self.passenger(id))
    }

    pub fn total_passengers(&self) -> usize {
        self.waiting.len() + self.active.len() + self.completed.len()
    }

    pub fn idle_taxis(&self) -> impl Iterator<Item = &Taxi> {
        self.taxis.iter().filter(|taxi| taxi.is_idle())
    }

    pub fn unassigned_passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.waiting.values().filter(|passenger| !passenger.is_assigned())
    }

    /// Add a newly spawned passenger to the waiting queue
    ///
    /// Returns false (and changes nothing) if the ID is already known.
    pub fn add_passenger(&mut self, passenger: Passenger) -> bool {
        if self.passenger(passenger.id).is_some() {
            warn!("Passenger {:?} already exists, ignoring spawn", passenger.id);
            return false;
        }
        self.waiting.insert(passenger.id, passenger);
        true
    }

    /// Propose pairings with `strategy` and commit them; returns the number applied
    pub fn run_assignment(&mut self, strategy: &dyn AssignmentStrategy) -> usize {
        let pairings = strategy.propose(self);
        let applied = self.commit_pairings(&pairings);
        if applied > 0 {
            debug!(
                "Tick {}: {} committed {} of {} pairing(s), total pickup distance {}",
                self.tick,
                strategy.name(),
                applied,
                pairings.len(),
                total_distance(&pairings)
            );
        }
        applied
    }

    pub fn run_greedy_assignment(&mut self) -> usize {
        self.run_assignment(&GreedyAssignment)
    }

    pub fn run_optimal_assignment(&mut self, min_queue_size: usize) -> usize {
        self.run_assignment(&OptimalAssignment::new(min_queue_size))
    }

    /// Apply pairings, dropping any that no longer hold
    pub fn commit_pairings(&mut self, pairings: &[Pairing]) -> usize {
        fleet::commit_pairings(&self.city, &mut self.taxis, &mut self.waiting, pairings)
    }

    /// Main simulation tick
    ///
    /// Moves every taxi one step in roster order, handles pickups and
    /// deliveries for taxis whose path ran out, then increments the tick.
    pub fn advance_tick(&mut self) {
        let results = fleet::update_taxis(&mut self.taxis);

        for (taxi_id, result) in results {
            match result {
                TaxiUpdateResult::ArrivedAtPickup(passenger_id) => {
                    self.pick_up(taxi_id, passenger_id);
                }
                TaxiUpdateResult::ArrivedAtDestination(passenger_id) => {
                    self.drop_off(taxi_id, passenger_id);
                }
                TaxiUpdateResult::Idle | TaxiUpdateResult::Continue | TaxiUpdateResult::Stuck => {}
            }
        }

        self.tick += 1;
    }

    fn pick_up(&mut self, taxi_id: TaxiId, passenger_id: PassengerId) {
        let Some(mut passenger) = self.waiting.remove(&passenger_id) else {
            warn!(
                "Taxi {:?} reached pickup for passenger {:?} who is not waiting",
                taxi_id, passenger_id
            );
            return;
        };
        let Some(taxi) = self.taxis.get_mut(taxi_id.0) else {
            self.waiting.insert(passenger_id, passenger);
            return;
        };

        passenger.pickup_tick = Some(self.tick);
        let path = self.city.find_path(taxi.position, passenger.destination);
        if path.is_empty() {
            warn!(
                "Taxi {:?} is stuck: destination {:?} of passenger {:?} is unreachable from {:?}",
                taxi_id, passenger.destination, passenger_id, taxi.position
            );
        }
        taxi.begin_delivery(passenger.destination, path);
        debug!(
            "Tick {}: taxi {:?} picked up passenger {:?}",
            self.tick, taxi_id, passenger_id
        );
        self.active.insert(passenger_id, passenger);
    }

    fn drop_off(&mut self, taxi_id: TaxiId, passenger_id: PassengerId) {
        let Some(mut passenger) = self.active.remove(&passenger_id) else {
            warn!(
                "Taxi {:?} reached destination for passenger {:?} who is not riding",
                taxi_id, passenger_id
            );
            return;
        };

        passenger.delivery_tick = Some(self.tick);
        if let Some(taxi) = self.taxis.get_mut(taxi_id.0) {
            taxi.finish_delivery();
        }
        debug!(
            "Tick {}: taxi {:?} delivered passenger {:?}",
            self.tick, taxi_id, passenger_id
        );
        self.completed.insert(passenger_id, passenger);
    }

    pub fn compute_metrics(&self) -> Metrics {
        compute_metrics(self)
    }

    /// Count taxis in each state: (idle, picking up, delivering)
    pub fn fleet_breakdown(&self) -> (usize, usize, usize) {
        self.taxis
            .iter()
            .fold((0, 0, 0), |(idle, picking, delivering), taxi| match taxi.state {
                TaxiState::Idle => (idle + 1, picking, delivering),
                TaxiState::PickingUp => (idle, picking + 1, delivering),
                TaxiState::Delivering => (idle, picking, delivering + 1),
            })
    }

    /// Print a summary of the simulation state
    pub fn print_summary(&self) {
        let (idle, picking, delivering) = self.fleet_breakdown();
        println!("Tick: {}", self.tick);
        println!(
            "Fleet: {} (idle {}, picking up {}, delivering {})",
            self.taxis.len(),
            idle,
            picking,
            delivering
        );
        println!("{}", self.compute_metrics().summary());

        let busy: Vec<&Taxi> = self.taxis.iter().filter(|taxi| !taxi.is_idle()).collect();
        if !busy.is_empty() {
            println!("--- Busy Taxis ---");
            for taxi in busy {
                println!(
                    "  Taxi {}: {} at ({}, {}), passenger={:?}, path_remaining={}",
                    taxi.id.0,
                    taxi.state.label(),
                    taxi.position.x,
                    taxi.position.y,
                    taxi.passenger.map(|id| id.0),
                    taxi.path.len()
                );
            }
        }
    }

    /// Draw the city with taxis (`T`) and waiting pickups (`P`)
    pub fn render_map(&self) -> Vec<String> {
        let mut grid: Vec<Vec<char>> = self
            .city
            .render()
            .into_iter()
            .map(|row| row.chars().collect())
            .collect();

        for passenger in self.waiting.values() {
            set_cell(&mut grid, passenger.pickup, 'P');
        }
        for taxi in &self.taxis {
            set_cell(&mut grid, taxi.position, 'T');
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    /// Draw a visual map of the simulation in the terminal
    pub fn draw_map(&self) {
        println!("\n=== City Map ===");
        println!("Legend: T=Taxi, P=Waiting pickup, ==Road, #=Building, .=Empty");
        println!();
        for row in self.render_map() {
            println!("{}", row);
        }
        println!();
    }
}

fn set_cell(grid: &mut [Vec<char>], position: Position, symbol: char) {
    if position.x < 0 || position.y < 0 {
        return;
    }
    if let Some(cell) = grid
        .get_mut(position.y as usize)
        .and_then(|row| row.get_mut(position.x as usize))
    {
        *cell = symbol;
    }
}
