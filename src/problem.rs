//! The contract every puzzle implements to be searchable.
//!
//! A problem is an implicit graph: an initial state, a goal predicate, and a
//! transition function enumerating `(action, successor)` pairs. The search
//! cores never look inside a state beyond `Eq` and `Hash`.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Result, SearchError};
use crate::plan::Plan;

/// Path cost unit used by the informed search core.
pub type Cost = u64;

/// A deterministic state-space search problem.
pub trait SearchProblem {
    /// Immutable snapshot of the world.
    type State: Clone + Eq + Hash + Debug;
    /// Label of the transition taken between two states.
    type Action: Clone + Eq + Debug;

    /// State the search starts from.
    fn initial_state(&self) -> Self::State;

    /// Pure goal predicate.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Every legal one-step transition from `state`, in a fixed order.
    ///
    /// An empty vector means the state has no moves; that is a normal dead
    /// end, not an error. Implementations must not filter out states that
    /// were already visited.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Action, Self::State)>;
}

/// A problem that also supplies transition costs and a heuristic estimate.
///
/// Admissibility of `heuristic` is the implementor's obligation; the engine
/// does not check it.
pub trait InformedProblem: SearchProblem {
    /// Estimated remaining cost from `state` to a goal.
    fn heuristic(&self, state: &Self::State) -> Cost;

    /// Cost of taking `action` from `from` to `to`.
    fn step_cost(&self, _from: &Self::State, _action: &Self::Action, _to: &Self::State) -> Cost {
        1
    }
}

/// Follow `action` from `state`, failing if the transition function does not produce it.
pub fn apply<P: SearchProblem>(
    problem: &P,
    state: &P::State,
    action: &P::Action,
) -> Result<P::State> {
    problem
        .successors(state)
        .into_iter()
        .find(|(candidate, _)| candidate == action)
        .map(|(_, next)| next)
        .ok_or_else(|| SearchError::invalid_transition(state, action))
}

/// Replay `plan` from the problem's initial state.
///
/// Returns `Ok(true)` when every step is a legal transition producing the
/// recorded state and the final state satisfies the goal.
pub fn verify_plan<P: SearchProblem>(problem: &P, plan: &Plan<P::State, P::Action>) -> Result<bool> {
    let mut current = problem.initial_state();
    if current != plan.initial {
        return Ok(false);
    }

    for step in &plan.steps {
        let next = apply(problem, &current, &step.action)?;
        if next != step.state {
            return Ok(false);
        }
        current = next;
    }

    Ok(problem.is_goal(&current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Step;

    /// Counter that can step +1 or +2 up to a ceiling.
    struct Counter {
        goal: u32,
        ceiling: u32,
    }

    impl SearchProblem for Counter {
        type State = u32;
        type Action = u32;

        fn initial_state(&self) -> u32 {
            0
        }

        fn is_goal(&self, state: &u32) -> bool {
            *state == self.goal
        }

        fn successors(&self, state: &u32) -> Vec<(u32, u32)> {
            [1, 2]
                .into_iter()
                .filter(|delta| state + delta <= self.ceiling)
                .map(|delta| (delta, state + delta))
                .collect()
        }
    }

    #[test]
    fn test_apply_follows_listed_action() {
        let problem = Counter { goal: 3, ceiling: 5 };
        assert_eq!(apply(&problem, &1, &2).unwrap(), 3);
    }

    #[test]
    fn test_apply_rejects_unlisted_action() {
        let problem = Counter { goal: 3, ceiling: 5 };
        let err = apply(&problem, &4, &2).unwrap_err();
        assert!(matches!(err, SearchError::InvalidTransition { .. }));
        assert!(!err.is_exhausted());
    }

    #[test]
    fn test_verify_plan() {
        let problem = Counter { goal: 3, ceiling: 5 };
        let good = Plan {
            initial: 0,
            steps: vec![Step { action: 1, state: 1 }, Step { action: 2, state: 3 }],
        };
        assert!(verify_plan(&problem, &good).unwrap());

        let short = Plan {
            initial: 0,
            steps: vec![Step { action: 2, state: 2 }],
        };
        assert!(!verify_plan(&problem, &short).unwrap());

        let tampered = Plan {
            initial: 0,
            steps: vec![Step { action: 1, state: 2 }],
        };
        assert!(!verify_plan(&problem, &tampered).unwrap());
    }
}
