//! Water-jug puzzle: measure a target amount with two unmarked jugs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::problem::SearchProblem;
use crate::puzzles::ConfigError;

/// Jug capacities and the amount to measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JugConfig {
    pub capacity_a: u32,
    pub capacity_b: u32,
    pub target: u32,
}

impl Default for JugConfig {
    fn default() -> Self {
        Self {
            capacity_a: 4,
            capacity_b: 3,
            target: 2,
        }
    }
}

/// Water currently held by each jug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jugs {
    pub a: u32,
    pub b: u32,
}

impl fmt::Display for Jugs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// The six jug operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JugAction {
    FillA,
    FillB,
    EmptyA,
    EmptyB,
    PourAToB,
    PourBToA,
}

impl fmt::Display for JugAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JugAction::FillA => "Fill Jug A",
            JugAction::FillB => "Fill Jug B",
            JugAction::EmptyA => "Empty Jug A",
            JugAction::EmptyB => "Empty Jug B",
            JugAction::PourAToB => "Pour A to B",
            JugAction::PourBToA => "Pour B to A",
        };
        f.write_str(label)
    }
}

/// Validated water-jug problem starting from two empty jugs.
#[derive(Debug, Clone)]
pub struct WaterJug {
    config: JugConfig,
}

impl WaterJug {
    pub fn new(config: JugConfig) -> Result<Self, ConfigError> {
        if config.capacity_a == 0 || config.capacity_b == 0 {
            return Err(ConfigError::InvalidCapacity {
                message: format!(
                    "jug capacities must be positive, got ({}, {})",
                    config.capacity_a, config.capacity_b
                ),
            });
        }
        if config.target > config.capacity_a.max(config.capacity_b) {
            return Err(ConfigError::UnreachableTarget {
                target: config.target,
                capacity_a: config.capacity_a,
                capacity_b: config.capacity_b,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &JugConfig {
        &self.config
    }
}

impl SearchProblem for WaterJug {
    type State = Jugs;
    type Action = JugAction;

    fn initial_state(&self) -> Jugs {
        Jugs { a: 0, b: 0 }
    }

    fn is_goal(&self, state: &Jugs) -> bool {
        state.a == self.config.target || state.b == self.config.target
    }

    fn successors(&self, state: &Jugs) -> Vec<(JugAction, Jugs)> {
        let JugConfig {
            capacity_a,
            capacity_b,
            ..
        } = self.config;
        let pour_a_to_b = state.a.min(capacity_b - state.b);
        let pour_b_to_a = state.b.min(capacity_a - state.a);

        vec![
            (JugAction::FillA, Jugs { a: capacity_a, b: state.b }),
            (JugAction::FillB, Jugs { a: state.a, b: capacity_b }),
            (JugAction::EmptyA, Jugs { a: 0, b: state.b }),
            (JugAction::EmptyB, Jugs { a: state.a, b: 0 }),
            (
                JugAction::PourAToB,
                Jugs {
                    a: state.a - pour_a_to_b,
                    b: state.b + pour_a_to_b,
                },
            ),
            (
                JugAction::PourBToA,
                Jugs {
                    a: state.a + pour_b_to_a,
                    b: state.b - pour_b_to_a,
                },
            ),
        ]
    }
}
