//! Tick state machine and lifecycle tests

use std::collections::HashSet;
use std::sync::Arc;

use taxi_dispatch::simulation::{
    generate_city, spawn_passenger, City, ComparisonRun, DemandGenerator, Lcg, Passenger,
    PassengerId, Position, SimConfig, SimulationState, TaxiId, TaxiState,
};

fn reference_city() -> Arc<City> {
    Arc::new(generate_city(10, 10, 42).expect("reference city should generate"))
}

fn busy_config() -> SimConfig {
    SimConfig {
        width: 18,
        height: 14,
        fleet_size: 5,
        min_queue_size: 2,
        spawn_probability: 0.6,
        spawn_interval: 1,
        burst_probability: 0.1,
        burst_min: 2,
        burst_max: 4,
    }
}

/// Every passenger sits in exactly one collection with consistent timestamps
fn assert_lifecycle_consistent(state: &SimulationState) {
    let waiting: HashSet<PassengerId> = state.waiting.keys().copied().collect();
    let active: HashSet<PassengerId> = state.active.keys().copied().collect();
    let completed: HashSet<PassengerId> = state.completed.keys().copied().collect();
    assert!(waiting.is_disjoint(&active));
    assert!(waiting.is_disjoint(&completed));
    assert!(active.is_disjoint(&completed));

    for passenger in state.waiting.values() {
        assert!(passenger.pickup_tick.is_none());
        assert!(passenger.delivery_tick.is_none());
        if let Some(taxi_id) = passenger.assigned_taxi {
            let taxi = state.taxi(taxi_id).expect("assigned taxi exists");
            assert_eq!(taxi.state, TaxiState::PickingUp);
            assert_eq!(taxi.passenger, Some(passenger.id));
        }
    }
    for passenger in state.active.values() {
        assert!(passenger.pickup_tick.is_some());
        assert!(passenger.delivery_tick.is_none());
        let taxi_id = passenger.assigned_taxi.expect("riding passenger has a taxi");
        let taxi = state.taxi(taxi_id).expect("assigned taxi exists");
        assert_eq!(taxi.state, TaxiState::Delivering);
        assert_eq!(taxi.passenger, Some(passenger.id));
    }
    for passenger in state.completed.values() {
        let pickup = passenger.pickup_tick.expect("served passenger was picked up");
        let delivery = passenger.delivery_tick.expect("served passenger was delivered");
        assert!(pickup >= passenger.spawn_tick);
        assert!(pickup < delivery);
    }

    for taxi in &state.taxis {
        match taxi.state {
            TaxiState::Idle => {
                assert!(taxi.passenger.is_none());
                assert!(taxi.path.is_empty());
            }
            TaxiState::PickingUp => {
                let id = taxi.passenger.expect("picking up a passenger");
                assert!(state.waiting.contains_key(&id));
            }
            TaxiState::Delivering => {
                let id = taxi.passenger.expect("delivering a passenger");
                assert!(state.active.contains_key(&id));
            }
        }
    }
}

#[test]
fn test_reference_scenario_single_trip() {
    let city = reference_city();
    let mut state =
        SimulationState::with_taxis(Arc::clone(&city), &[Position::new(0, 0)]).expect("taxi");
    let origin = Position::new(0, 0);
    let destination = Position::new(9, 9);
    assert!(state.add_passenger(Passenger::new(PassengerId(0), origin, destination, 0)));

    assert_eq!(state.run_greedy_assignment(), 1);
    let taxi = state.taxi(TaxiId(0)).expect("taxi exists");
    assert_eq!(taxi.state, TaxiState::PickingUp);
    assert_eq!(taxi.path.iter().copied().collect::<Vec<_>>(), vec![origin]);

    state.advance_tick();
    assert_eq!(state.tick(), 1);
    let taxi = state.taxi(TaxiId(0)).expect("taxi exists");
    assert_eq!(taxi.state, TaxiState::Delivering);
    assert_eq!(taxi.target, Some(destination));
    assert_eq!(taxi.path.back(), Some(&destination));
    let trip_length = taxi.path.len();
    assert_eq!(trip_length, 18);
    assert_eq!(state.active[&PassengerId(0)].pickup_tick, Some(0));
    assert!(state.waiting.is_empty());

    for _ in 0..trip_length - 1 {
        state.advance_tick();
        assert_eq!(state.taxi(TaxiId(0)).map(|t| t.state), Some(TaxiState::Delivering));
    }
    state.advance_tick();

    let taxi = state.taxi(TaxiId(0)).expect("taxi exists");
    assert_eq!(taxi.state, TaxiState::Idle);
    assert_eq!(taxi.position, destination);
    assert_eq!(taxi.passenger, None);
    assert_eq!(taxi.target, None);
    assert_eq!(taxi.deliveries, 1);
    assert_eq!(taxi.distance_traveled, 1 + trip_length as u64);

    let served = &state.completed[&PassengerId(0)];
    assert_eq!(served.pickup_tick, Some(0));
    assert_eq!(served.delivery_tick, Some(trip_length as u64));
    assert_eq!(state.compute_metrics().total_passengers_served, 1);
    assert!(state.active.is_empty());
}

#[test]
fn test_idle_taxis_do_not_move() {
    let city = reference_city();
    let mut state = SimulationState::with_taxis(city, &[Position::new(0, 0), Position::new(9, 0)])
        .expect("taxis");
    for _ in 0..5 {
        state.advance_tick();
    }
    assert_eq!(state.tick(), 5);
    assert_eq!(state.taxis[0].position, Position::new(0, 0));
    assert_eq!(state.taxis[1].position, Position::new(9, 0));
    assert!(state.taxis.iter().all(|taxi| taxi.distance_traveled == 0));
}

#[test]
fn test_taxi_stuck_when_destination_unreachable() {
    let city = Arc::new(City::from_ascii(&["==#==", "==#=="]).expect("map should parse"));
    let mut state =
        SimulationState::with_taxis(city, &[Position::new(0, 0)]).expect("taxi on road");
    state.add_passenger(Passenger::new(
        PassengerId(0),
        Position::new(1, 0),
        Position::new(3, 0),
        0,
    ));

    assert_eq!(state.run_greedy_assignment(), 1);
    state.advance_tick();

    let taxi = &state.taxis[0];
    assert_eq!(taxi.state, TaxiState::Delivering);
    assert!(taxi.path.is_empty());
    assert!(state.active.contains_key(&PassengerId(0)));

    for _ in 0..5 {
        state.advance_tick();
    }
    let taxi = &state.taxis[0];
    assert_eq!(taxi.state, TaxiState::Delivering);
    assert_eq!(taxi.position, Position::new(1, 0));
    assert_eq!(taxi.distance_traveled, 1);
    assert!(state.completed.is_empty());

    // A stuck taxi is never offered to the assignment strategies
    state.add_passenger(Passenger::new(
        PassengerId(1),
        Position::new(0, 0),
        Position::new(1, 1),
        6,
    ));
    assert_eq!(state.run_greedy_assignment(), 0);
}

#[test]
fn test_duplicate_passenger_is_ignored() {
    let city = reference_city();
    let mut state = SimulationState::with_taxis(city, &[]).expect("empty fleet");
    let passenger = Passenger::new(PassengerId(3), Position::new(0, 0), Position::new(9, 9), 0);
    assert!(state.add_passenger(passenger.clone()));
    assert!(!state.add_passenger(passenger));
    assert_eq!(state.total_passengers(), 1);
}

#[test]
fn test_taxis_must_start_on_roads() {
    let city = Arc::new(City::from_ascii(&["=====", "=#.#=", "====="]).expect("map"));
    assert!(SimulationState::with_taxis(Arc::clone(&city), &[Position::new(1, 1)]).is_err());
    assert!(SimulationState::with_taxis(city, &[Position::new(7, 7)]).is_err());
}

#[test]
fn test_fleet_placement_is_deterministic_and_on_roads() {
    let config = busy_config();
    let city = Arc::new(generate_city(config.width, config.height, 9).expect("city"));
    let first = SimulationState::new(Arc::clone(&city), &config, 77).expect("state");
    let second = SimulationState::new(Arc::clone(&city), &config, 77).expect("state");
    assert_eq!(first, second);
    assert_eq!(first.taxis.len(), config.fleet_size);
    for (index, taxi) in first.taxis.iter().enumerate() {
        assert_eq!(taxi.id, TaxiId(index));
        assert!(city.is_road(taxi.position));
        assert_eq!(taxi.state, TaxiState::Idle);
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let city = reference_city();
    let config = SimConfig {
        spawn_interval: 0,
        ..SimConfig::default()
    };
    assert!(SimulationState::new(city, &config, 1).is_err());
}

#[test]
fn test_clone_is_independent() {
    let config = busy_config();
    let city = Arc::new(generate_city(config.width, config.height, 4).expect("city"));
    let mut original = SimulationState::new(Arc::clone(&city), &config, 5).expect("state");
    let mut rng = Lcg::new(8);
    for id in 0..4 {
        original.add_passenger(spawn_passenger(&city, PassengerId(id), 0, &mut rng));
    }
    let before = original.clone();
    let mut branch = original.clone();

    branch.run_greedy_assignment();
    for _ in 0..10 {
        branch.advance_tick();
    }
    branch.add_passenger(spawn_passenger(&city, PassengerId(10), 10, &mut rng));

    assert_eq!(original, before);
    assert!(original.taxis.iter().all(|taxi| taxi.is_idle()));
    assert_eq!(original.tick(), 0);
    assert_ne!(branch, original);

    // The branch can diverge further without touching the original
    original.run_optimal_assignment(1);
    assert_eq!(branch.tick(), 10);
}

#[test]
fn test_lifecycle_conservation_over_long_run() {
    let config = busy_config();
    let city = Arc::new(generate_city(config.width, config.height, 21).expect("city"));
    let mut run = ComparisonRun::greedy_vs_optimal(city, &config, 21).expect("run");

    let mut previous_totals = vec![0usize; run.lanes().len()];
    for _ in 0..300 {
        run.step();
        for (lane, previous) in run.lanes().iter().zip(previous_totals.iter_mut()) {
            assert_lifecycle_consistent(&lane.state);
            let total = lane.state.total_passengers();
            assert!(total >= *previous, "{} lost passengers", lane.name());
            *previous = total;
        }
    }

    assert_eq!(run.tick(), 300);
    let totals: Vec<usize> = run.lanes().iter().map(|lane| lane.state.total_passengers()).collect();
    assert_eq!(totals[0], totals[1], "lanes must see identical demand");
    assert!(run.lanes().iter().all(|lane| lane.metrics().total_passengers_served > 0));
}

#[test]
fn test_full_runs_are_reproducible() {
    let config = busy_config();
    let city = Arc::new(generate_city(config.width, config.height, 33).expect("city"));
    let mut first = ComparisonRun::greedy_vs_optimal(Arc::clone(&city), &config, 33).expect("run");
    let mut second = ComparisonRun::greedy_vs_optimal(city, &config, 33).expect("run");

    for _ in 0..150 {
        first.step();
        second.step();
        for (a, b) in first.lanes().iter().zip(second.lanes()) {
            assert_eq!(a.state, b.state);
        }
    }
}

#[test]
fn test_demand_generator_is_deterministic() {
    let config = busy_config();
    let city = generate_city(config.width, config.height, 2).expect("city");
    let mut first = DemandGenerator::new(&config, 99);
    let mut second = DemandGenerator::new(&config, 99);
    for tick in 0..100 {
        assert_eq!(first.generate(&city, tick), second.generate(&city, tick));
    }
    assert_eq!(first.spawned(), second.spawned());
    assert!(first.spawned() > 0);
}

#[test]
fn test_demand_respects_interval_and_bursts() {
    let city = generate_city(12, 12, 6).expect("city");
    let config = SimConfig {
        spawn_probability: 1.0,
        spawn_interval: 3,
        burst_probability: 1.0,
        burst_min: 4,
        burst_max: 4,
        ..SimConfig::default()
    };
    let mut demand = DemandGenerator::new(&config, 1);

    let mut next_id = 0;
    for tick in 0..12 {
        let spawned = demand.generate(&city, tick);
        if tick % 3 == 0 {
            assert_eq!(spawned.len(), 5);
        } else {
            assert!(spawned.is_empty());
        }
        for passenger in spawned {
            assert_eq!(passenger.id, PassengerId(next_id));
            assert_eq!(passenger.spawn_tick, tick);
            assert!(passenger.assigned_taxi.is_none());
            next_id += 1;
        }
    }
    assert_eq!(demand.spawned(), 20);
}

#[test]
fn test_spawned_passengers_use_distinct_pickup_spots() {
    let city = City::from_ascii(&["=#=", "..."]).expect("map with two pickup spots");
    assert_eq!(city.pickup_spots().len(), 2);
    let mut rng = Lcg::new(13);
    for id in 0..200 {
        let passenger = spawn_passenger(&city, PassengerId(id), 0, &mut rng);
        assert_ne!(passenger.pickup, passenger.destination);
        assert!(city.is_pickup_spot(passenger.pickup));
        assert!(city.is_pickup_spot(passenger.destination));
    }
}
