//! Blocks world with a single gripper.
//!
//! A state maps every block on the table or on another block to its support;
//! the block in the gripper (if any) has no entry. Using a sorted map makes
//! equality independent of the order in which relations were listed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::problem::SearchProblem;
use crate::puzzles::ConfigError;

/// What a block rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    Table,
    Block(char),
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Support::Table => f.write_str("table"),
            Support::Block(block) => write!(f, "{block}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlocksState {
    pub on: BTreeMap<char, Support>,
    pub holding: Option<char>,
}

impl BlocksState {
    /// A block is clear when nothing rests on it and it is not being held.
    pub fn is_clear(&self, block: char) -> bool {
        self.holding != Some(block) && !self.on.values().any(|s| *s == Support::Block(block))
    }
}

impl fmt::Display for BlocksState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relations: Vec<String> = self
            .on
            .iter()
            .map(|(block, support)| format!("{block} on {support}"))
            .collect();
        match self.holding {
            Some(block) => write!(f, "[{}] holding {block}", relations.join(", ")),
            None => write!(f, "[{}] hand empty", relations.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum BlocksAction {
    Unstack { block: char, from: char },
    PutDown { block: char },
    PickUp { block: char },
    Stack { block: char, onto: char },
}

impl fmt::Display for BlocksAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlocksAction::Unstack { block, from } => write!(f, "unstack({block}, {from})"),
            BlocksAction::PutDown { block } => write!(f, "putdown({block})"),
            BlocksAction::PickUp { block } => write!(f, "pickup({block})"),
            BlocksAction::Stack { block, onto } => write!(f, "stack({block}, {onto})"),
        }
    }
}

/// A single `block on support` relation as written in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub block: String,
    pub on: String,
}

impl Placement {
    pub fn new(block: &str, on: &str) -> Self {
        Self {
            block: block.to_string(),
            on: on.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksConfig {
    pub initial: Vec<Placement>,
    /// Relations that must hold at the goal, with the hand empty.
    pub goal: Vec<Placement>,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            initial: vec![
                Placement::new("a", "table"),
                Placement::new("b", "table"),
                Placement::new("c", "a"),
            ],
            goal: vec![
                Placement::new("b", "c"),
                Placement::new("c", "a"),
                Placement::new("a", "table"),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlocksWorld {
    initial: BlocksState,
    goal: BTreeMap<char, Support>,
}

impl BlocksWorld {
    pub fn new(config: &BlocksConfig) -> Result<Self, ConfigError> {
        let initial = parse_relations(&config.initial, None, "initial state")?;
        let blocks: BTreeSet<char> = initial.keys().copied().collect();
        let goal = parse_relations(&config.goal, Some(&blocks), "goal")?;

        Ok(Self {
            initial: BlocksState {
                on: initial,
                holding: None,
            },
            goal,
        })
    }

    pub fn goal(&self) -> &BTreeMap<char, Support> {
        &self.goal
    }
}

fn parse_block(name: &str, context: &'static str) -> Result<char, ConfigError> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(block), None) if block.is_alphanumeric() => Ok(block),
        _ => Err(ConfigError::UnknownBlock {
            block: name.to_string(),
            context,
        }),
    }
}

/// Parse and check a list of placements: each block placed once, at most one
/// block on any other, supports known, and no cycles.
fn parse_relations(
    placements: &[Placement],
    known: Option<&BTreeSet<char>>,
    context: &'static str,
) -> Result<BTreeMap<char, Support>, ConfigError> {
    let mut relations = BTreeMap::new();
    for placement in placements {
        let block = parse_block(&placement.block, context)?;
        let support = if placement.on == "table" {
            Support::Table
        } else {
            Support::Block(parse_block(&placement.on, context)?)
        };
        if relations.insert(block, support).is_some() {
            return Err(ConfigError::DuplicateBlock { block, context });
        }
    }

    let names: BTreeSet<char> = match known {
        Some(known) => known.clone(),
        None => relations.keys().copied().collect(),
    };
    let mut supporting = BTreeSet::new();
    for (&block, support) in &relations {
        if !names.contains(&block) {
            return Err(ConfigError::UnknownBlock {
                block: block.to_string(),
                context,
            });
        }
        if let Support::Block(below) = *support {
            if !names.contains(&below) {
                return Err(ConfigError::UnknownBlock {
                    block: below.to_string(),
                    context,
                });
            }
            if below == block || !supporting.insert(below) {
                return Err(ConfigError::Inconsistent {
                    message: format!("block '{below}' cannot hold '{block}' in {context}"),
                });
            }
        }
    }

    for &start in relations.keys() {
        let mut current = start;
        for _ in 0..=relations.len() {
            match relations.get(&current) {
                Some(Support::Block(below)) => current = *below,
                _ => break,
            }
            if current == start {
                return Err(ConfigError::CyclicStack {
                    block: start,
                    context,
                });
            }
        }
    }

    Ok(relations)
}

impl SearchProblem for BlocksWorld {
    type State = BlocksState;
    type Action = BlocksAction;

    fn initial_state(&self) -> BlocksState {
        self.initial.clone()
    }

    fn is_goal(&self, state: &BlocksState) -> bool {
        state.holding.is_none()
            && self
                .goal
                .iter()
                .all(|(block, support)| state.on.get(block) == Some(support))
    }

    fn successors(&self, state: &BlocksState) -> Vec<(BlocksAction, BlocksState)> {
        let mut moves = Vec::new();

        match state.holding {
            None => {
                for (&block, &support) in &state.on {
                    if let Support::Block(from) = support {
                        if state.is_clear(block) {
                            let mut next = state.clone();
                            next.on.remove(&block);
                            next.holding = Some(block);
                            moves.push((BlocksAction::Unstack { block, from }, next));
                        }
                    }
                }
                for (&block, &support) in &state.on {
                    if support == Support::Table && state.is_clear(block) {
                        let mut next = state.clone();
                        next.on.remove(&block);
                        next.holding = Some(block);
                        moves.push((BlocksAction::PickUp { block }, next));
                    }
                }
            }
            Some(block) => {
                let mut down = state.clone();
                down.on.insert(block, Support::Table);
                down.holding = None;
                moves.push((BlocksAction::PutDown { block }, down));

                for &onto in state.on.keys() {
                    if state.is_clear(onto) {
                        let mut next = state.clone();
                        next.on.insert(block, Support::Block(onto));
                        next.holding = None;
                        moves.push((BlocksAction::Stack { block, onto }, next));
                    }
                }
            }
        }

        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::verify_plan;
    use crate::uninformed::{breadth_first, depth_first};

    #[test]
    fn test_default_instance() {
        let world = BlocksWorld::new(&BlocksConfig::default()).unwrap();
        let solution = breadth_first(&world).unwrap();
        let actions: Vec<BlocksAction> = solution.plan.actions().copied().collect();
        assert_eq!(
            actions,
            vec![
                BlocksAction::PickUp { block: 'b' },
                BlocksAction::Stack { block: 'b', onto: 'c' },
            ]
        );
    }

    #[test]
    fn test_sussman_anomaly_takes_six_steps() {
        let config = BlocksConfig {
            initial: vec![
                Placement::new("a", "table"),
                Placement::new("b", "table"),
                Placement::new("c", "a"),
            ],
            goal: vec![
                Placement::new("a", "b"),
                Placement::new("b", "c"),
                Placement::new("c", "table"),
            ],
        };
        let world = BlocksWorld::new(&config).unwrap();
        let solution = breadth_first(&world).unwrap();
        assert_eq!(solution.plan.len(), 6);
        assert!(verify_plan(&world, &solution.plan).unwrap());

        let dfs = depth_first(&world).unwrap();
        assert!(world.is_goal(dfs.plan.final_state()));
    }

    #[test]
    fn test_state_equality_ignores_listing_order() {
        let forward = BlocksConfig {
            initial: vec![Placement::new("a", "table"), Placement::new("b", "a")],
            goal: vec![],
        };
        let backward = BlocksConfig {
            initial: vec![Placement::new("b", "a"), Placement::new("a", "table")],
            goal: vec![],
        };
        let left = BlocksWorld::new(&forward).unwrap().initial_state();
        let right = BlocksWorld::new(&backward).unwrap().initial_state();
        assert_eq!(left, right);
    }

    #[test]
    fn test_rejects_invalid_configs() {
        let cyclic = BlocksConfig {
            initial: vec![Placement::new("a", "b"), Placement::new("b", "a")],
            goal: vec![],
        };
        assert!(matches!(BlocksWorld::new(&cyclic), Err(ConfigError::CyclicStack { .. })));

        let duplicate = BlocksConfig {
            initial: vec![Placement::new("a", "table"), Placement::new("a", "table")],
            goal: vec![],
        };
        assert!(matches!(BlocksWorld::new(&duplicate), Err(ConfigError::DuplicateBlock { .. })));

        let unknown_goal = BlocksConfig {
            initial: vec![Placement::new("a", "table")],
            goal: vec![Placement::new("z", "a")],
        };
        assert!(matches!(BlocksWorld::new(&unknown_goal), Err(ConfigError::UnknownBlock { .. })));

        let crowded = BlocksConfig {
            initial: vec![
                Placement::new("a", "table"),
                Placement::new("b", "a"),
                Placement::new("c", "a"),
            ],
            goal: vec![],
        };
        assert!(matches!(BlocksWorld::new(&crowded), Err(ConfigError::Inconsistent { .. })));
    }

    #[test]
    fn test_holding_block_offers_putdown_and_stacks() {
        let world = BlocksWorld::new(&BlocksConfig::default()).unwrap();
        let mut state = world.initial_state();
        state.on.remove(&'b');
        state.holding = Some('b');

        let actions: Vec<BlocksAction> = world.successors(&state).into_iter().map(|(a, _)| a).collect();
        assert_eq!(
            actions,
            vec![
                BlocksAction::PutDown { block: 'b' },
                BlocksAction::Stack { block: 'b', onto: 'c' },
            ]
        );
    }
}
