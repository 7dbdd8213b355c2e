use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};

use taxi_dispatch::simulation::{
    generate_city, AssignmentStrategy, ComparisonRun, GreedyAssignment, OptimalAssignment,
    SimConfig, DEFAULT_BURST_MAX, DEFAULT_BURST_MIN, DEFAULT_BURST_PROBABILITY,
    DEFAULT_FLEET_SIZE, DEFAULT_HEIGHT, DEFAULT_MIN_QUEUE_SIZE, DEFAULT_SPAWN_INTERVAL,
    DEFAULT_SPAWN_PROBABILITY, DEFAULT_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Nearest idle taxi per passenger, in queue order
    Greedy,
    /// Minimum total pickup distance over the batch
    Optimal,
    /// Run greedy and optimal side by side on identical demand
    Compare,
}

#[derive(Parser)]
#[command(name = "taxi_dispatch")]
#[command(about = "Headless taxi dispatch simulation comparing assignment strategies")]
struct Cli {
    /// City width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// City height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Number of taxis
    #[arg(long, default_value_t = DEFAULT_FLEET_SIZE)]
    fleet_size: usize,

    /// Unassigned passengers required before the optimal strategy runs
    #[arg(long, default_value_t = DEFAULT_MIN_QUEUE_SIZE)]
    min_queue_size: usize,

    /// Chance of one passenger per spawn check
    #[arg(long, default_value_t = DEFAULT_SPAWN_PROBABILITY)]
    spawn_probability: f64,

    /// Ticks between spawn checks
    #[arg(long, default_value_t = DEFAULT_SPAWN_INTERVAL)]
    spawn_interval: u64,

    /// Chance of a burst of passengers per spawn check
    #[arg(long, default_value_t = DEFAULT_BURST_PROBABILITY)]
    burst_probability: f64,

    /// Smallest burst
    #[arg(long, default_value_t = DEFAULT_BURST_MIN)]
    burst_min: usize,

    /// Largest burst
    #[arg(long, default_value_t = DEFAULT_BURST_MAX)]
    burst_max: usize,

    /// Seed for the city, the fleet placement and the demand
    #[arg(long, default_value = "42")]
    seed: u32,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "200")]
    ticks: u64,

    /// Which assignment strategy to run
    #[arg(long, value_enum, default_value_t = Strategy::Compare)]
    strategy: Strategy,

    /// Print a summary every this many ticks (0 = only at the end)
    #[arg(long, default_value = "50")]
    report_every: u64,

    /// Draw the city map in each report
    #[arg(long)]
    map: bool,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            width: self.width,
            height: self.height,
            fleet_size: self.fleet_size,
            min_queue_size: self.min_queue_size,
            spawn_probability: self.spawn_probability,
            spawn_interval: self.spawn_interval,
            burst_probability: self.burst_probability,
            burst_min: self.burst_min,
            burst_max: self.burst_max,
        }
    }

    fn strategies(&self) -> Vec<Box<dyn AssignmentStrategy>> {
        match self.strategy {
            Strategy::Greedy => vec![Box::new(GreedyAssignment)],
            Strategy::Optimal => vec![Box::new(OptimalAssignment::new(self.min_queue_size))],
            Strategy::Compare => vec![
                Box::new(GreedyAssignment),
                Box::new(OptimalAssignment::new(self.min_queue_size)),
            ],
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,taxi_dispatch=info"),
    )
    .init();

    let cli = Cli::parse();
    match run_headless(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate().context("Invalid configuration")?;

    println!("Running taxi dispatch simulation in headless mode...");
    println!("{}", config.summary());
    println!("Seed: {}, Ticks: {}", cli.seed, cli.ticks);
    println!();

    let city = Arc::new(
        generate_city(config.width, config.height, cli.seed).context("City generation failed")?,
    );
    let mut run = ComparisonRun::new(city, &config, cli.seed, cli.strategies())?;

    print_report(&run, cli.map);

    while run.tick() < cli.ticks {
        run.step();
        if cli.report_every > 0 && run.tick() % cli.report_every == 0 && run.tick() < cli.ticks {
            print_report(&run, cli.map);
        }
    }

    println!("=== Final State ===");
    print_report(&run, cli.map);
    print_comparison(&run);
    info!("Simulation finished after {} ticks", run.tick());
    Ok(())
}

fn print_report(run: &ComparisonRun, map: bool) {
    for lane in run.lanes() {
        println!("=== {} ===", lane.name());
        lane.state.print_summary();
        if map {
            lane.state.draw_map();
        }
        println!();
    }
}

fn print_comparison(run: &ComparisonRun) {
    println!("=== Strategy Comparison ===");
    println!(
        "{:<10} {:>8} {:>8} {:>10} {:>10} {:>12} {:>10}",
        "strategy", "served", "waiting", "avg_wait", "avg_trip", "utilization", "distance"
    );
    for lane in run.lanes() {
        let metrics = lane.metrics();
        println!(
            "{:<10} {:>8} {:>8} {:>10.2} {:>10.2} {:>11.1}% {:>10}",
            lane.name(),
            metrics.total_passengers_served,
            metrics.passengers_waiting,
            metrics.average_wait_time,
            metrics.average_trip_time,
            metrics.fleet_utilization * 100.0,
            metrics.total_distance
        );
    }
}
