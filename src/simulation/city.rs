//! Procedural grid city
//!
//! A city is a fixed `width × height` grid of cell kinds. Roads form a
//! connected lattice of arterials around blocks of buildings and empty lots.
//! Road cells next to a building are pickup spots, the only places a
//! passenger can be picked up or dropped off.

use anyhow::{bail, ensure, Result};
use log::info;

use super::rng::Lcg;
use super::road_network::{Path, RoadNetwork};
use super::types::{CellKind, Position};

/// Probability that a cell touching a road becomes a building
pub const BUILDING_PROBABILITY_NEAR_ROAD: f64 = 0.85;

/// Probability that a cell away from the roads becomes a building
pub const BUILDING_PROBABILITY_INTERIOR: f64 = 0.3;

/// Smallest arterial spacing; the generator picks this or the next value
pub const MIN_ARTERIAL_SPACING: usize = 4;

/// A generated (or hand-drawn) city
///
/// Immutable once built. Share it between simulations behind an `Arc`.
#[derive(Debug, Clone)]
pub struct City {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
    road_cells: Vec<Position>,
    pickup_spots: Vec<Position>,
    network: RoadNetwork,
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        // Everything else is derived from the grid
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

/// Generate a city deterministically from its size and a seed
pub fn generate_city(width: usize, height: usize, seed: u32) -> Result<City> {
    City::generate(width, height, seed)
}

impl City {
    /// Generate a city deterministically from its size and a seed
    ///
    /// Fails when the grid is empty or fewer than two pickup spots exist.
    pub fn generate(width: usize, height: usize, seed: u32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "City dimensions must be positive, got {}x{}",
            width,
            height
        );

        let mut rng = Lcg::new(seed);
        let spacing_x = MIN_ARTERIAL_SPACING + rng.next_index(2);
        let spacing_y = MIN_ARTERIAL_SPACING + rng.next_index(2);

        let mut cells = vec![CellKind::Empty; width * height];

        // Arterials plus the outer ring
        for y in 0..height {
            for x in 0..width {
                let on_ring = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                if on_ring || x % spacing_x == 0 || y % spacing_y == 0 {
                    cells[y * width + x] = CellKind::Road;
                }
            }
        }

        // Buildings, denser along the roads
        for y in 0..height {
            for x in 0..width {
                let index = y * width + x;
                if cells[index] == CellKind::Road {
                    continue;
                }
                let position = Position::new(x as i32, y as i32);
                let touches_road = position
                    .neighbors8()
                    .iter()
                    .any(|n| kind_in(&cells, width, height, *n) == Some(CellKind::Road));
                let probability = if touches_road {
                    BUILDING_PROBABILITY_NEAR_ROAD
                } else {
                    BUILDING_PROBABILITY_INTERIOR
                };
                if rng.chance(probability) {
                    cells[index] = CellKind::Building;
                }
            }
        }

        // Buildings with no road and no building next to them are unreachable pockets
        let snapshot = cells.clone();
        for y in 0..height {
            for x in 0..width {
                let index = y * width + x;
                if snapshot[index] != CellKind::Building {
                    continue;
                }
                let position = Position::new(x as i32, y as i32);
                let connected = position.neighbors4().iter().any(|n| {
                    matches!(
                        kind_in(&snapshot, width, height, *n),
                        Some(CellKind::Road) | Some(CellKind::Building)
                    )
                });
                if !connected {
                    cells[index] = CellKind::Empty;
                }
            }
        }

        let city = Self::from_cells(width, height, cells)?;
        info!(
            "Generated {}x{} city (seed {}, arterials every {}/{} cells): {} road cells, {} pickup spots",
            width,
            height,
            seed,
            spacing_x,
            spacing_y,
            city.road_cells.len(),
            city.pickup_spots.len()
        );
        Ok(city)
    }

    /// Build a city from rows of `=` (road), `#` (building) and `.` (empty)
    pub fn from_ascii(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        ensure!(width > 0 && height > 0, "City map is empty");

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row_cells: Vec<CellKind> = row
                .chars()
                .map(|symbol| {
                    CellKind::from_symbol(symbol).ok_or_else(|| {
                        anyhow::anyhow!("Unknown map symbol {:?} on row {}", symbol, y)
                    })
                })
                .collect::<Result<_>>()?;
            if row_cells.len() != width {
                bail!(
                    "Row {} has {} cells, expected {}",
                    y,
                    row_cells.len(),
                    width
                );
            }
            cells.extend(row_cells);
        }

        Self::from_cells(width, height, cells)
    }

    /// Derive road cells, pickup spots and the road graph from a finished grid
    fn from_cells(width: usize, height: usize, cells: Vec<CellKind>) -> Result<Self> {
        let mut road_cells = Vec::new();
        let mut pickup_spots = Vec::new();

        for y in 0..height {
            for x in 0..width {
                if cells[y * width + x] != CellKind::Road {
                    continue;
                }
                let position = Position::new(x as i32, y as i32);
                road_cells.push(position);
                let near_building = position
                    .neighbors8()
                    .iter()
                    .any(|n| kind_in(&cells, width, height, *n) == Some(CellKind::Building));
                if near_building {
                    pickup_spots.push(position);
                }
            }
        }

        if pickup_spots.len() < 2 {
            bail!(
                "Degenerate city: found {} pickup spot(s), at least 2 are required",
                pickup_spots.len()
            );
        }

        let network = RoadNetwork::from_cells(width, height, &cells);

        Ok(Self {
            width,
            height,
            cells,
            road_cells,
            pickup_spots,
            network,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell kind at a position, or `None` outside the grid
    pub fn cell(&self, position: Position) -> Option<CellKind> {
        kind_in(&self.cells, self.width, self.height, position)
    }

    pub fn is_road(&self, position: Position) -> bool {
        self.cell(position) == Some(CellKind::Road)
    }

    /// All road cells in row-major order
    pub fn road_cells(&self) -> &[Position] {
        &self.road_cells
    }

    /// Road cells adjacent to a building, in row-major order
    pub fn pickup_spots(&self) -> &[Position] {
        &self.pickup_spots
    }

    pub fn is_pickup_spot(&self, position: Position) -> bool {
        self.is_road(position)
            && position
                .neighbors8()
                .iter()
                .any(|n| self.cell(*n) == Some(CellKind::Building))
    }

    pub fn road_network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Shortest road path, see [`RoadNetwork::find_path`]
    pub fn find_path(&self, start: Position, end: Position) -> Path {
        self.network.find_path(start, end)
    }

    /// Path length, or `None` when unreachable
    pub fn path_distance(&self, start: Position, end: Position) -> Option<usize> {
        self.network.path_distance(start, end)
    }

    /// Render the grid in the notation accepted by `from_ascii`
    pub fn render(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|kind| kind.symbol()).collect())
            .collect()
    }
}

fn kind_in(cells: &[CellKind], width: usize, height: usize, position: Position) -> Option<CellKind> {
    if position.x < 0 || position.y < 0 {
        return None;
    }
    let (x, y) = (position.x as usize, position.y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(cells[y * width + x])
}
