//! Monkey and banana: walk, push the box under the banana, climb, grasp.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::problem::SearchProblem;
use crate::puzzles::ConfigError;

/// Places in the room, in the order destinations are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Window,
    Center,
    Door,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Window, Location::Center, Location::Door];
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Location::Window => "window",
            Location::Center => "center",
            Location::Door => "door",
        };
        f.write_str(name)
    }
}

/// Whether the monkey stands on the floor or on the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Footing {
    Floor,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonkeyState {
    pub monkey: Location,
    pub footing: Footing,
    pub box_at: Location,
    pub has_banana: bool,
}

impl fmt::Display for MonkeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let footing = match self.footing {
            Footing::Floor => "on floor",
            Footing::Box => "on box",
        };
        let banana = if self.has_banana { "has banana" } else { "no banana" };
        write!(
            f,
            "(monkey at {}, {}, box at {}, {})",
            self.monkey, footing, self.box_at, banana
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum MonkeyAction {
    Walk { from: Location, to: Location },
    Push { from: Location, to: Location },
    Climb,
    Grasp,
}

impl fmt::Display for MonkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonkeyAction::Walk { from, to } => write!(f, "walk from {from} to {to}"),
            MonkeyAction::Push { from, to } => write!(f, "push box from {from} to {to}"),
            MonkeyAction::Climb => f.write_str("climb onto box"),
            MonkeyAction::Grasp => f.write_str("grasp banana"),
        }
    }
}

/// Starting situation and where the banana hangs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonkeyConfig {
    pub initial: MonkeyState,
    pub banana_at: Location,
}

impl Default for MonkeyConfig {
    fn default() -> Self {
        Self {
            initial: MonkeyState {
                monkey: Location::Door,
                footing: Footing::Floor,
                box_at: Location::Window,
                has_banana: false,
            },
            banana_at: Location::Center,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonkeyBanana {
    config: MonkeyConfig,
}

impl MonkeyBanana {
    pub fn new(config: MonkeyConfig) -> Result<Self, ConfigError> {
        let initial = &config.initial;
        if initial.footing == Footing::Box && initial.monkey != initial.box_at {
            return Err(ConfigError::Inconsistent {
                message: format!(
                    "monkey stands on the box at {} but the box is at {}",
                    initial.monkey, initial.box_at
                ),
            });
        }
        Ok(Self { config })
    }
}

impl SearchProblem for MonkeyBanana {
    type State = MonkeyState;
    type Action = MonkeyAction;

    fn initial_state(&self) -> MonkeyState {
        self.config.initial
    }

    fn is_goal(&self, state: &MonkeyState) -> bool {
        state.has_banana
    }

    /// Transitions are listed grasp, climb, push, walk: the moves closest to
    /// the goal are tried first by depth-first search.
    fn successors(&self, state: &MonkeyState) -> Vec<(MonkeyAction, MonkeyState)> {
        let mut moves = Vec::new();
        let under_box = state.monkey == state.box_at;

        if state.footing == Footing::Box
            && state.monkey == self.config.banana_at
            && under_box
            && !state.has_banana
        {
            moves.push((
                MonkeyAction::Grasp,
                MonkeyState {
                    has_banana: true,
                    ..*state
                },
            ));
        }

        if state.footing == Footing::Floor && under_box && !state.has_banana {
            moves.push((
                MonkeyAction::Climb,
                MonkeyState {
                    footing: Footing::Box,
                    ..*state
                },
            ));

            for to in Location::ALL.into_iter().filter(|to| *to != state.monkey) {
                moves.push((
                    MonkeyAction::Push {
                        from: state.monkey,
                        to,
                    },
                    MonkeyState {
                        monkey: to,
                        box_at: to,
                        ..*state
                    },
                ));
            }
        }

        if state.footing == Footing::Floor {
            for to in Location::ALL.into_iter().filter(|to| *to != state.monkey) {
                moves.push((
                    MonkeyAction::Walk {
                        from: state.monkey,
                        to,
                    },
                    MonkeyState { monkey: to, ..*state },
                ));
            }
        }

        moves
    }
}
