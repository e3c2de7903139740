//! Randomised checks of the search cores on small generated problems.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;

use puzzle_search::puzzles::grid::{Cell, GridConfig, GridPath};
use puzzle_search::{best_first, breadth_first, depth_first, verify_plan, SearchProblem};

/// Directed graph over nodes `0..size` with node `size - 1` as the goal.
#[derive(Debug, Clone)]
struct Digraph {
    size: u8,
    edges: Vec<(u8, u8)>,
}

impl Digraph {
    fn goal(&self) -> u8 {
        self.size - 1
    }

    /// Reference shortest distance from node 0 using a global visited set.
    fn distance_to_goal(&self) -> Option<usize> {
        let mut seen = HashSet::from([0u8]);
        let mut queue = VecDeque::from([(0u8, 0usize)]);
        while let Some((node, depth)) = queue.pop_front() {
            if node == self.goal() {
                return Some(depth);
            }
            for &(_, to) in self.edges.iter().filter(|(from, _)| *from == node) {
                if seen.insert(to) {
                    queue.push_back((to, depth + 1));
                }
            }
        }
        None
    }
}

impl SearchProblem for Digraph {
    type State = u8;
    type Action = (u8, u8);

    fn initial_state(&self) -> u8 {
        0
    }

    fn is_goal(&self, state: &u8) -> bool {
        *state == self.goal()
    }

    fn successors(&self, state: &u8) -> Vec<((u8, u8), u8)> {
        self.edges
            .iter()
            .filter(|(from, _)| from == state)
            .map(|&(from, to)| ((from, to), to))
            .collect()
    }
}

fn digraph() -> impl Strategy<Value = Digraph> {
    (2u8..7).prop_flat_map(|size| {
        prop::collection::vec((0..size, 0..size), 0..14).prop_map(move |edges| Digraph { size, edges })
    })
}

fn grid_config() -> impl Strategy<Value = GridConfig> {
    (2usize..4).prop_flat_map(|size| {
        let cell = move || (0..size, 0..size).prop_map(|(row, col)| Cell::new(row, col));
        (cell(), cell(), prop::collection::vec(cell(), 0..4)).prop_map(move |(source, destination, water)| {
            let water = water
                .into_iter()
                .filter(|cell| *cell != source && *cell != destination)
                .collect();
            GridConfig {
                size,
                source,
                destination,
                water,
            }
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_breadth_first_finds_shortest_plan(graph in digraph()) {
        match (breadth_first(&graph), graph.distance_to_goal()) {
            (Ok(solution), Some(distance)) => {
                prop_assert_eq!(solution.plan.len(), distance);
                prop_assert!(verify_plan(&graph, &solution.plan).unwrap());
            }
            (Err(err), None) => prop_assert!(err.is_exhausted()),
            (result, distance) => prop_assert!(false, "bfs {:?} vs distance {:?}", result.map(|s| s.plan.len()), distance),
        }
    }

    #[test]
    fn test_depth_first_never_repeats_a_state(graph in digraph()) {
        if let Ok(solution) = depth_first(&graph) {
            let states: Vec<u8> = solution.plan.states().copied().collect();
            let unique: HashSet<u8> = states.iter().copied().collect();
            prop_assert_eq!(unique.len(), states.len());
            prop_assert!(verify_plan(&graph, &solution.plan).unwrap());
        } else {
            prop_assert!(graph.distance_to_goal().is_none());
        }
    }

    #[test]
    fn test_depth_first_is_deterministic(graph in digraph()) {
        let first = depth_first(&graph).map(|solution| solution.plan);
        let second = depth_first(&graph).map(|solution| solution.plan);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_best_first_cost_matches_breadth_first(config in grid_config()) {
        let grid = GridPath::new(&config).unwrap();
        match (best_first(&grid), breadth_first(&grid)) {
            (Ok(informed), Ok(bfs)) => {
                prop_assert_eq!(informed.cost, bfs.plan.len() as u64);
                prop_assert_eq!(informed.cost, informed.plan.len() as u64);
            }
            (Err(left), Err(right)) => {
                prop_assert!(left.is_exhausted());
                prop_assert!(right.is_exhausted());
            }
            _ => prop_assert!(false, "strategies disagree on reachability"),
        }
    }
}
