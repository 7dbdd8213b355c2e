//! Grid pathfinding tests

use std::collections::{HashMap, VecDeque};

use taxi_dispatch::simulation::{generate_city, City, Lcg, Position};

fn bfs_distances(city: &City, start: Position) -> HashMap<Position, usize> {
    let mut distances = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        let distance = distances[&cell];
        for next in cell.neighbors4() {
            if city.is_road(next) && !distances.contains_key(&next) {
                distances.insert(next, distance + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}

fn assert_valid_path(city: &City, start: Position, path: &[Position]) {
    let mut previous = start;
    for step in path {
        assert!(city.is_road(*step), "{:?} is not a road", step);
        assert_eq!(previous.manhattan(step), 1, "{:?} -> {:?} is not a step", previous, step);
        previous = *step;
    }
}

#[test]
fn test_same_cell_returns_single_step() {
    let city = City::from_ascii(&["=====", "=#.#=", "====="]).expect("map should parse");
    let here = Position::new(2, 0);
    assert_eq!(city.find_path(here, here), vec![here]);
    assert_eq!(city.path_distance(here, here), Some(1));
}

#[test]
fn test_path_excludes_start_and_includes_end() {
    let city = City::from_ascii(&["======", "######"]).expect("map should parse");
    let path = city.find_path(Position::new(0, 0), Position::new(3, 0));
    assert_eq!(
        path,
        vec![Position::new(1, 0), Position::new(2, 0), Position::new(3, 0)]
    );
}

#[test]
fn test_path_detours_around_buildings() {
    let city = City::from_ascii(&["=======", "=#####=", "======="]).expect("map should parse");
    let start = Position::new(0, 1);
    let end = Position::new(6, 1);
    let path = city.find_path(start, end);
    assert_eq!(path.len(), 8);
    assert_eq!(path.last(), Some(&end));
    assert_valid_path(&city, start, &path);
}

#[test]
fn test_disconnected_cells_are_unreachable() {
    let city = City::from_ascii(&["==#==", "==#=="]).expect("map should parse");
    assert!(city.find_path(Position::new(0, 0), Position::new(4, 1)).is_empty());
    assert_eq!(city.path_distance(Position::new(0, 0), Position::new(4, 1)), None);
}

#[test]
fn test_non_road_endpoints_are_unreachable() {
    let city = City::from_ascii(&["=====", "=#.#=", "====="]).expect("map should parse");
    assert!(city.find_path(Position::new(0, 0), Position::new(1, 1)).is_empty());
    assert!(city.find_path(Position::new(2, 1), Position::new(0, 0)).is_empty());
    assert!(city.find_path(Position::new(0, 0), Position::new(50, 50)).is_empty());
    assert!(city.find_path(Position::new(-1, 0), Position::new(0, 0)).is_empty());
}

#[test]
fn test_paths_match_breadth_first_distances() {
    let city = generate_city(30, 24, 17).expect("city should generate");
    let roads = city.road_cells();
    let mut rng = Lcg::new(5);

    for _ in 0..40 {
        let start = roads[rng.next_index(roads.len())];
        let distances = bfs_distances(&city, start);
        for _ in 0..10 {
            let end = roads[rng.next_index(roads.len())];
            let path = city.find_path(start, end);
            let expected = distances[&end].max(1);
            assert_eq!(path.len(), expected, "{:?} -> {:?}", start, end);
            assert_eq!(path.last(), Some(&end));
            if start != end {
                assert_valid_path(&city, start, &path);
            }
        }
    }
}

#[test]
fn test_repeated_searches_return_identical_paths() {
    let city = generate_city(20, 20, 8).expect("city should generate");
    let start = Position::new(0, 0);
    let end = Position::new(19, 19);
    let first = city.find_path(start, end);
    for _ in 0..5 {
        assert_eq!(city.find_path(start, end), first);
    }
    let twin = generate_city(20, 20, 8).expect("city should generate");
    assert_eq!(twin.find_path(start, end), first);
}
