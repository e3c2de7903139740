//! Plans, solutions and search statistics returned by the search cores.

use std::fmt;

use serde::Serialize;

use crate::problem::Cost;

/// One transition in a plan: the action taken and the state it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step<S, A> {
    pub action: A,
    pub state: S,
}

/// An ordered route from the initial state to a goal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan<S, A> {
    pub initial: S,
    pub steps: Vec<Step<S, A>>,
}

impl<S, A> Plan<S, A> {
    /// A plan with no steps (the initial state already satisfies the goal).
    pub fn empty(initial: S) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    /// Number of transitions in the plan.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The state the plan ends in.
    pub fn final_state(&self) -> &S {
        self.steps.last().map_or(&self.initial, |step| &step.state)
    }

    pub fn actions(&self) -> impl Iterator<Item = &A> {
        self.steps.iter().map(|step| &step.action)
    }

    /// Every state along the plan, including the initial one.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        std::iter::once(&self.initial).chain(self.steps.iter().map(|step| &step.state))
    }
}

impl<S: fmt::Display, A: fmt::Display> fmt::Display for Plan<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial: {}", self.initial)?;
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "Step {}: {} -> {}", index + 1, step.action, step.state)?;
        }
        write!(f, "Total steps: {}", self.len())
    }
}

/// Counters collected while a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// States whose successors were enumerated.
    pub expanded: usize,
    /// Successor states created (after cycle/duplicate filtering).
    pub generated: usize,
    /// Frontier entries popped and dropped as stale.
    pub stale_discarded: usize,
    /// Largest frontier size observed.
    pub frontier_high_water: usize,
    /// Deepest path length reached.
    pub max_depth: usize,
}

impl SearchStats {
    pub(crate) fn observe_frontier(&mut self, size: usize) {
        self.frontier_high_water = self.frontier_high_water.max(size);
    }

    pub(crate) fn observe_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }
}

/// A successful search result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution<S, A> {
    pub plan: Plan<S, A>,
    /// Total path cost (the step count for the uninformed cores).
    pub cost: Cost,
    pub stats: SearchStats,
}
