//! Uninformed search: depth-first with backtracking and breadth-first.
//!
//! Both cores prune cycles only along the path being extended. A state can
//! be explored again through a different branch; that costs time, never
//! correctness.

use std::collections::{HashSet, VecDeque};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::arena::NodeArena;
use crate::error::{Result, SearchError};
use crate::plan::{Plan, SearchStats, Solution, Step};
use crate::problem::SearchProblem;

/// A frame on the depth-first stack: a state on the current path and the
/// successors not yet tried from it.
struct Frame<S, A> {
    state: S,
    action: Option<A>,
    pending: std::vec::IntoIter<(A, S)>,
}

type FrameStack<S, A> = SmallVec<[Frame<S, A>; 32]>;

/// Depth-first search with path-local visited pruning.
///
/// Successors are tried in enumeration order. A successor already on the
/// current path is skipped; when a frame runs out of successors it is
/// popped and the search resumes at its parent. Returns the first plan found,
/// which is not necessarily the shortest.
pub fn depth_first<P: SearchProblem>(problem: &P) -> Result<Solution<P::State, P::Action>> {
    let initial = problem.initial_state();
    let mut stats = SearchStats::default();
    debug!(initial = ?initial, "depth-first search started");

    if problem.is_goal(&initial) {
        return Ok(Solution {
            plan: Plan::empty(initial),
            cost: 0,
            stats,
        });
    }

    let mut on_path: HashSet<P::State> = HashSet::new();
    on_path.insert(initial.clone());

    let mut stack: FrameStack<P::State, P::Action> = SmallVec::new();
    stats.expanded += 1;
    stack.push(Frame {
        pending: problem.successors(&initial).into_iter(),
        state: initial,
        action: None,
    });
    stats.observe_frontier(stack.len());

    while let Some(frame) = stack.last_mut() {
        let Some((action, next)) = frame.pending.next() else {
            // Dead end: every successor was tried or is already on the path.
            if let Some(done) = stack.pop() {
                trace!(state = ?done.state, "backtracking");
                on_path.remove(&done.state);
            }
            continue;
        };

        if on_path.contains(&next) {
            continue;
        }
        stats.generated += 1;

        if problem.is_goal(&next) {
            let plan = plan_from_stack(stack, action, next);
            stats.observe_depth(plan.len());
            debug!(steps = plan.len(), expanded = stats.expanded, "depth-first search found a plan");
            return Ok(Solution {
                cost: plan.len() as u64,
                plan,
                stats,
            });
        }

        trace!(state = ?next, depth = stack.len(), "expanding");
        stats.expanded += 1;
        let pending = problem.successors(&next).into_iter();
        on_path.insert(next.clone());
        stack.push(Frame {
            state: next,
            action: Some(action),
            pending,
        });
        stats.observe_depth(stack.len() - 1);
        stats.observe_frontier(stack.len());
    }

    debug!(expanded = stats.expanded, "depth-first search exhausted");
    Err(SearchError::Exhausted {
        expanded: stats.expanded,
    })
}

/// Turn the current path plus the goal transition into a plan.
fn plan_from_stack<S, A>(stack: FrameStack<S, A>, action: A, goal: S) -> Plan<S, A> {
    let mut frames = stack.into_iter();
    let Some(root) = frames.next() else {
        return Plan::empty(goal);
    };

    let mut steps: Vec<Step<S, A>> = frames
        .filter_map(|frame| {
            frame.action.map(|action| Step {
                action,
                state: frame.state,
            })
        })
        .collect();
    steps.push(Step {
        action,
        state: goal,
    });

    Plan {
        initial: root.state,
        steps,
    }
}

/// Breadth-first search over whole candidate paths.
///
/// The queue is strictly FIFO and paths are enqueued in non-decreasing
/// length order, so the first path whose tail is a goal has the minimum
/// number of steps. A successor that already occurs on the path being
/// extended is discarded.
pub fn breadth_first<P: SearchProblem>(problem: &P) -> Result<Solution<P::State, P::Action>> {
    let (mut arena, root) = NodeArena::with_root(problem.initial_state(), 0);
    let mut stats = SearchStats::default();
    debug!(initial = ?arena.get(root).state, "breadth-first search started");

    let mut queue = VecDeque::new();
    queue.push_back(root);
    stats.observe_frontier(queue.len());

    while let Some(id) = queue.pop_front() {
        let node = arena.get(id);
        if problem.is_goal(&node.state) {
            let cost = node.g;
            stats.observe_depth(node.depth);
            debug!(steps = node.depth, expanded = stats.expanded, "breadth-first search found a plan");
            return Ok(Solution {
                plan: arena.into_plan(id),
                cost,
                stats,
            });
        }

        trace!(state = ?node.state, depth = node.depth, "expanding");
        stats.expanded += 1;
        stats.observe_depth(node.depth);
        let g = node.g + 1;
        let successors = problem.successors(&node.state);

        for (action, next) in successors {
            if arena.on_path(id, &next) {
                continue;
            }
            let child = arena.push_child(id, action, next, g, 0);
            stats.generated += 1;
            queue.push_back(child);
        }
        stats.observe_frontier(queue.len());
    }

    debug!(expanded = stats.expanded, "breadth-first search exhausted");
    Err(SearchError::Exhausted {
        expanded: stats.expanded,
    })
}
