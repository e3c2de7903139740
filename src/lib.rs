//! State-space search engine with classic planning puzzles.
//!
//! The engine offers depth-first and breadth-first search, informed
//! best-first (A*-style) search and exhaustive minimax. Puzzles plug in by
//! implementing [`SearchProblem`], [`InformedProblem`] or [`TwoPlayerGame`].

pub mod arena;
pub mod error;
pub mod informed;
pub mod minimax;
pub mod plan;
pub mod problem;
pub mod puzzles;
pub mod uninformed;

// Re-export main types
pub use arena::{Node, NodeArena, NodeId};
pub use error::SearchError;
pub use informed::{best_first, expansion_order, Frontier, FrontierKey};
pub use minimax::{GameNode, GameTree, Turn, TwoPlayerGame};
pub use plan::{Plan, SearchStats, Solution, Step};
pub use problem::{apply, verify_plan, Cost, InformedProblem, SearchProblem};
pub use uninformed::{breadth_first, depth_first};
