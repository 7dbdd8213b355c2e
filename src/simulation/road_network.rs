//! Road network graph for pathfinding
//!
//! Every road cell is a node; orthogonally adjacent road cells are joined by
//! an undirected edge of unit length.

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::types::{CellKind, Position};

/// Path from a start cell (excluded) to an end cell (included)
pub type Path = Vec<Position>;

/// Road graph built once per city
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    /// The underlying petgraph undirected graph
    graph: UnGraph<Position, u32>,

    /// Row-major lookup from cell to node; `None` for non-road cells
    cell_to_node: Vec<Option<NodeIndex>>,

    width: usize,
    height: usize,
}

impl RoadNetwork {
    /// Build the graph from a row-major grid of cell kinds
    pub fn from_cells(width: usize, height: usize, cells: &[CellKind]) -> Self {
        let mut graph = UnGraph::default();
        let mut cell_to_node = vec![None; cells.len()];

        for (index, kind) in cells.iter().enumerate() {
            if *kind == CellKind::Road {
                let position = Position::new((index % width) as i32, (index / width) as i32);
                cell_to_node[index] = Some(graph.add_node(position));
            }
        }

        // East and south links are enough to cover every adjacent pair once
        for y in 0..height {
            for x in 0..width {
                let Some(node) = cell_to_node[y * width + x] else {
                    continue;
                };
                if x + 1 < width {
                    if let Some(east) = cell_to_node[y * width + x + 1] {
                        graph.add_edge(node, east, 1);
                    }
                }
                if y + 1 < height {
                    if let Some(south) = cell_to_node[(y + 1) * width + x] {
                        graph.add_edge(node, south, 1);
                    }
                }
            }
        }

        Self {
            graph,
            cell_to_node,
            width,
            height,
        }
    }

    fn node_at(&self, position: Position) -> Option<NodeIndex> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        let (x, y) = (position.x as usize, position.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cell_to_node[y * self.width + x]
    }

    /// Finds the shortest road path between two cells using A*
    ///
    /// The returned path excludes `start` and includes `end`. When
    /// `start == end` the path is `[end]`. An empty path means the end is
    /// unreachable (or one of the cells is not a road).
    pub fn find_path(&self, start: Position, end: Position) -> Path {
        let (Some(start_node), Some(end_node)) = (self.node_at(start), self.node_at(end)) else {
            return Vec::new();
        };

        if start == end {
            return vec![end];
        }

        let result = astar(
            &self.graph,
            start_node,
            |node| node == end_node,
            |edge| *edge.weight(),
            |node| self.graph[node].manhattan(&end),
        );

        match result {
            Some((_, node_path)) => node_path
                .iter()
                .skip(1)
                .map(|node| self.graph[*node])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Length of `find_path`, or `None` when unreachable
    pub fn path_distance(&self, start: Position, end: Position) -> Option<usize> {
        let path = self.find_path(start, end);
        if path.is_empty() {
            None
        } else {
            Some(path.len())
        }
    }

    /// Number of road cells
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of adjacent road pairs
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
