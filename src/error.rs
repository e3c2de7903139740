//! Error types for the search engine.

use thiserror::Error;

/// Failures reported by the search cores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchError {
    /// The frontier (or every depth-first branch) ran out without reaching a goal.
    #[error("search exhausted after {expanded} expansions without reaching a goal")]
    Exhausted { expanded: usize },

    /// A caller asked to follow an action that is not a transition from `state`.
    #[error("action {action} is not a legal transition from state {state}")]
    InvalidTransition { state: String, action: String },
}

impl SearchError {
    /// Build an `InvalidTransition` from the debug renderings of a state and action.
    pub fn invalid_transition(state: &impl std::fmt::Debug, action: &impl std::fmt::Debug) -> Self {
        Self::InvalidTransition {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        }
    }

    /// True when the search simply found no plan.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
