//! Informed best-first search ordered by f = g + h.
//!
//! Nodes live in a [`NodeArena`] and the frontier holds only their ids. Stale
//! frontier entries are never updated in place; a child is pushed only when it
//! strictly improves the best known g for its state, and entries whose state
//! was already expanded at an equal or lower g are dropped when popped.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use crate::arena::{Node, NodeArena, NodeId};
use crate::error::{Result, SearchError};
use crate::plan::{SearchStats, Solution};
use crate::problem::{Cost, InformedProblem};

/// Ordering key of a frontier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrontierKey {
    /// g + h of the node.
    pub f: Cost,
    /// Insertion counter; earlier entries win ties on `f`.
    pub sequence: u64,
}

/// Decide which of two frontier entries is expanded first.
///
/// `Ordering::Less` means `a` is expanded before `b`: lowest f first, then
/// lowest sequence number, so ties follow successor enumeration order.
pub fn expansion_order(a: &FrontierKey, b: &FrontierKey) -> Ordering {
    a.f.cmp(&b.f).then(a.sequence.cmp(&b.sequence))
}

#[derive(Debug)]
struct FrontierEntry {
    key: FrontierKey,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    // `BinaryHeap` pops its greatest element, so the entry that must be
    // expanded first has to compare greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        expansion_order(&other.key, &self.key)
    }
}

/// Priority frontier popping entries in [`expansion_order`].
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `node` with priority `f` and return the key it was assigned.
    pub fn push(&mut self, node: NodeId, f: Cost) -> FrontierKey {
        let key = FrontierKey {
            f,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(FrontierEntry { key, node });
        self.high_water = self.high_water.max(self.heap.len());
        key
    }

    /// Remove the entry that comes first in expansion order.
    pub fn pop(&mut self) -> Option<(NodeId, FrontierKey)> {
        self.heap.pop().map(|entry| (entry.node, entry.key))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of entries held at once.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// A*-style search: expand the lowest f = g + h node until a goal is popped.
///
/// With an admissible heuristic the returned plan has minimum total cost.
/// The heuristic is evaluated once per created node.
pub fn best_first<P: InformedProblem>(problem: &P) -> Result<Solution<P::State, P::Action>> {
    let initial = problem.initial_state();
    let root_h = problem.heuristic(&initial);
    debug!(initial = ?initial, h = root_h, "best-first search started");

    let mut best_g: HashMap<P::State, Cost> = HashMap::new();
    best_g.insert(initial.clone(), 0);
    let (mut arena, root) = NodeArena::with_root(initial, root_h);

    let mut closed: HashMap<P::State, Cost> = HashMap::new();
    let mut frontier = Frontier::new();
    let mut stats = SearchStats::default();
    frontier.push(root, arena.get(root).f());

    while let Some((id, key)) = frontier.pop() {
        let node: &Node<P::State, P::Action> = arena.get(id);

        if closed.get(&node.state).is_some_and(|&g| g <= node.g) {
            stats.stale_discarded += 1;
            continue;
        }
        closed.insert(node.state.clone(), node.g);
        stats.observe_depth(node.depth);

        if problem.is_goal(&node.state) {
            let cost = node.g;
            stats.frontier_high_water = frontier.high_water();
            debug!(cost, steps = node.depth, expanded = stats.expanded, "best-first search found a plan");
            return Ok(Solution {
                plan: arena.into_plan(id),
                cost,
                stats,
            });
        }

        trace!(state = ?node.state, g = node.g, f = key.f, "expanding");
        stats.expanded += 1;
        let g = node.g;
        let successors = problem.successors(&node.state);

        for (action, next) in successors {
            let step = problem.step_cost(&arena.get(id).state, &action, &next);
            let tentative = g.saturating_add(step);
            if best_g.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            best_g.insert(next.clone(), tentative);

            let h = problem.heuristic(&next);
            let child = arena.push_child(id, action, next, tentative, h);
            frontier.push(child, arena.get(child).f());
            stats.generated += 1;
        }
    }

    stats.frontier_high_water = frontier.high_water();
    debug!(expanded = stats.expanded, "best-first search exhausted");
    Err(SearchError::Exhausted {
        expanded: stats.expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::SearchProblem;
    use proptest::prelude::*;
    use std::cell::RefCell;

    /// Weighted directed graph with a per-node heuristic table.
    struct Weighted {
        edges: Vec<(u8, u8, Cost)>,
        h: Vec<Cost>,
        goal: u8,
        expansions: RefCell<Vec<u8>>,
    }

    impl Weighted {
        fn new(edges: Vec<(u8, u8, Cost)>, h: Vec<Cost>, goal: u8) -> Self {
            Self {
                edges,
                h,
                goal,
                expansions: RefCell::new(Vec::new()),
            }
        }
    }

    impl SearchProblem for Weighted {
        type State = u8;
        type Action = (u8, u8);

        fn initial_state(&self) -> u8 {
            0
        }

        fn is_goal(&self, state: &u8) -> bool {
            *state == self.goal
        }

        fn successors(&self, state: &u8) -> Vec<((u8, u8), u8)> {
            self.expansions.borrow_mut().push(*state);
            self.edges
                .iter()
                .filter(|(from, _, _)| from == state)
                .map(|&(from, to, _)| ((from, to), to))
                .collect()
        }
    }

    impl InformedProblem for Weighted {
        fn heuristic(&self, state: &u8) -> Cost {
            self.h[*state as usize]
        }

        fn step_cost(&self, _from: &u8, action: &(u8, u8), _to: &u8) -> Cost {
            self.edges
                .iter()
                .find(|(from, to, _)| (*from, *to) == *action)
                .map_or(1, |&(_, _, cost)| cost)
        }
    }

    #[test]
    fn test_prefers_cheaper_path_over_fewer_steps() {
        // Direct edge 0 -> 3 costs 10, the detour 0 -> 1 -> 2 -> 3 costs 3.
        let problem = Weighted::new(
            vec![(0, 3, 10), (0, 1, 1), (1, 2, 1), (2, 3, 1)],
            vec![0, 0, 0, 0],
            3,
        );
        let solution = best_first(&problem).unwrap();
        assert_eq!(solution.cost, 3);
        assert_eq!(solution.plan.states().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_no_state_expanded_twice_with_consistent_heuristic() {
        // Two routes into 2 with different costs, plus a cycle back to 0.
        let problem = Weighted::new(
            vec![(0, 1, 1), (0, 2, 5), (1, 2, 1), (2, 0, 1), (2, 3, 1)],
            vec![2, 2, 1, 0],
            3,
        );
        let solution = best_first(&problem).unwrap();
        assert_eq!(solution.cost, 3);

        let expansions = problem.expansions.borrow();
        let mut unique = expansions.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), expansions.len(), "expanded twice: {expansions:?}");
    }

    #[test]
    fn test_stale_entry_discarded_at_pop() {
        // 2 is first reached at g=5 and later improved to g=2.
        let problem = Weighted::new(
            vec![(0, 2, 5), (0, 1, 1), (1, 2, 1), (2, 3, 10)],
            vec![0, 0, 0, 0],
            3,
        );
        let solution = best_first(&problem).unwrap();
        assert_eq!(solution.cost, 12);
        assert_eq!(solution.stats.stale_discarded, 1);
    }

    #[test]
    fn test_exhausted_when_goal_unreachable() {
        let problem = Weighted::new(vec![(0, 1, 1), (1, 0, 1)], vec![0, 0, 0], 2);
        assert_eq!(best_first(&problem).unwrap_err(), SearchError::Exhausted { expanded: 2 });
    }

    #[test]
    fn test_frontier_ties_follow_insertion_order() {
        let mut frontier = Frontier::new();
        frontier.push(NodeId(7), 4);
        frontier.push(NodeId(3), 4);
        frontier.push(NodeId(9), 2);

        let order: Vec<NodeId> = std::iter::from_fn(|| frontier.pop().map(|(id, _)| id)).collect();
        assert_eq!(order, vec![NodeId(9), NodeId(7), NodeId(3)]);
        assert_eq!(frontier.high_water(), 3);
        assert!(frontier.is_empty());
    }

    proptest! {
        #[test]
        fn prop_expansion_order_is_antisymmetric(
            fa in 0u64..50, sa in 0u64..50, fb in 0u64..50, sb in 0u64..50
        ) {
            let a = FrontierKey { f: fa, sequence: sa };
            let b = FrontierKey { f: fb, sequence: sb };
            prop_assert_eq!(expansion_order(&a, &b), expansion_order(&b, &a).reverse());
        }

        #[test]
        fn prop_frontier_pops_minimum_f_first(priorities in prop::collection::vec(0u64..100, 1..40)) {
            let mut frontier = Frontier::new();
            for (index, f) in priorities.iter().enumerate() {
                frontier.push(NodeId(index), *f);
            }

            let mut previous: Option<FrontierKey> = None;
            while let Some((_, key)) = frontier.pop() {
                if let Some(prev) = previous {
                    prop_assert_ne!(expansion_order(&prev, &key), Ordering::Greater);
                    prop_assert!(prev.f <= key.f);
                }
                previous = Some(key);
            }
            prop_assert_eq!(previous.map(|key| key.f), priorities.iter().copied().max());
        }
    }
}
