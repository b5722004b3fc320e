use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;

use crate::dungeon::carve::{Corridor, DungeonCell};
use crate::geometry::Grid;

/// Граф комнат: вершина — индекс комнаты, ребро — коридор.
pub fn build_room_graph(room_count: usize, corridors: &[Corridor]) -> UnGraph<usize, ()> {
    let mut graph = UnGraph::new_undirected();
    let nodes: Vec<_> = (0..room_count).map(|i| graph.add_node(i)).collect();
    for c in corridors {
        if let (Some(&a), Some(&b)) = (nodes.get(c.from_room), nodes.get(c.to_room)) {
            graph.update_edge(a, b, ());
        }
    }
    graph
}

/// Все комнаты в одной компоненте связности.
#[must_use]
pub fn is_single_component(graph: &UnGraph<usize, ()>) -> bool {
    graph.node_count() <= 1 || connected_components(graph) == 1
}

/// Заливка по проходимым клеткам от стартовой клетки.
#[must_use]
pub fn flood_navigable(grid: &Grid<DungeonCell>, start: (usize, usize)) -> Grid<bool> {
    let mut visited = Grid::new(grid.width, grid.height, false);
    if !grid.get(start.0, start.1).is_some_and(|c| c.is_navigable()) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.set(start.0, start.1, true);
    queue.push_back(start);

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in grid.neighbors(x, y) {
            let open = grid.get(nx, ny).is_some_and(|c| c.is_navigable());
            if open && visited.get(nx, ny) == Some(&false) {
                visited.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }
    visited
}
