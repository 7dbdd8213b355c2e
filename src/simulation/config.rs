//! Host-supplied simulation settings
//!
//! Pure data. The defaults give a small city with steady demand and the
//! occasional burst.

use anyhow::{ensure, Result};

pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_FLEET_SIZE: usize = 8;

/// Unassigned passengers needed before the optimal strategy runs
pub const DEFAULT_MIN_QUEUE_SIZE: usize = 3;

pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.3;
pub const DEFAULT_SPAWN_INTERVAL: u64 = 2;
pub const DEFAULT_BURST_PROBABILITY: f64 = 0.05;
pub const DEFAULT_BURST_MIN: usize = 2;
pub const DEFAULT_BURST_MAX: usize = 5;

/// Recognized configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub fleet_size: usize,
    pub min_queue_size: usize,
    /// Chance of one passenger per spawn check
    pub spawn_probability: f64,
    /// Ticks between spawn checks
    pub spawn_interval: u64,
    /// Chance of a burst per spawn check
    pub burst_probability: f64,
    pub burst_min: usize,
    pub burst_max: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fleet_size: DEFAULT_FLEET_SIZE,
            min_queue_size: DEFAULT_MIN_QUEUE_SIZE,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            burst_probability: DEFAULT_BURST_PROBABILITY,
            burst_min: DEFAULT_BURST_MIN,
            burst_max: DEFAULT_BURST_MAX,
        }
    }
}

impl SimConfig {
    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "City dimensions must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.spawn_interval > 0, "Spawn interval must be at least 1 tick");
        ensure!(
            (0.0..=1.0).contains(&self.spawn_probability),
            "Spawn probability {} is outside [0, 1]",
            self.spawn_probability
        );
        ensure!(
            (0.0..=1.0).contains(&self.burst_probability),
            "Burst probability {} is outside [0, 1]",
            self.burst_probability
        );
        ensure!(
            self.burst_min <= self.burst_max,
            "Burst size range {}..={} is empty",
            self.burst_min,
            self.burst_max
        );
        Ok(())
    }

    /// One-line description for reports
    pub fn summary(&self) -> String {
        format!(
            "City: {}x{} | Fleet: {} | Optimal threshold: {} | Spawn: {:.0}% every {} tick(s) | Burst: {:.0}% of {}-{}",
            self.width,
            self.height,
            self.fleet_size,
            self.min_queue_size,
            self.spawn_probability * 100.0,
            self.spawn_interval,
            self.burst_probability * 100.0,
            self.burst_min,
            self.burst_max
        )
    }
}
