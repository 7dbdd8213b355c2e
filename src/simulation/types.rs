//! Core types for the dispatch simulation
//!
//! Plain value types shared by the city, the fleet and the assignment code.

/// A wrapper type for taxi IDs
///
/// Taxi IDs are roster indices, so iterating the roster visits them in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxiId(pub usize);

/// A wrapper type for passenger IDs
///
/// IDs are minted in spawn order, so ordering by ID is queue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerId(pub u64);

/// Integer grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the admissible heuristic for 4-directional unit steps
    pub fn manhattan(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours (east, west, south, north)
    pub fn neighbors4(&self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
        ]
    }

    /// All eight surrounding cells, orthogonal and diagonal
    pub fn neighbors8(&self) -> [Position; 8] {
        [
            Position::new(self.x - 1, self.y - 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y + 1),
        ]
    }
}

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Road,
    Building,
    Empty,
}

impl CellKind {
    /// ASCII symbol used by `City::render` and `City::from_ascii`
    pub fn symbol(self) -> char {
        match self {
            CellKind::Road => '=',
            CellKind::Building => '#',
            CellKind::Empty => '.',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(CellKind::Road),
            '#' => Some(CellKind::Building),
            '.' => Some(CellKind::Empty),
            _ => None,
        }
    }
}

/// Lifecycle state of a taxi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxiState {
    /// Waiting for an assignment
    Idle,
    /// Driving to the assigned passenger's pickup spot
    PickingUp,
    /// Carrying the passenger to their destination
    Delivering,
}

impl TaxiState {
    pub fn label(self) -> &'static str {
        match self {
            TaxiState::Idle => "idle",
            TaxiState::PickingUp => "picking_up",
            TaxiState::Delivering => "delivering",
        }
    }
}
