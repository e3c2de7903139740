//! Exhaustive minimax over a two-player, zero-sum, perfect-information game.
//!
//! The whole reachable tree is built eagerly with no depth cutoff. That is
//! only affordable for games as small as tic-tac-toe; larger games would
//! need a depth or node budget and move ordering, which this module does not
//! provide.

use std::fmt::Debug;

use serde::Serialize;
use tracing::debug;

use crate::arena::NodeId;
use crate::error::{Result, SearchError};

/// Which player moves at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Max,
    Min,
}

impl Turn {
    pub fn other(self) -> Turn {
        match self {
            Turn::Max => Turn::Min,
            Turn::Min => Turn::Max,
        }
    }

    /// Whether `candidate` is strictly better than `incumbent` for this player.
    pub fn prefers(self, candidate: i32, incumbent: i32) -> bool {
        match self {
            Turn::Max => candidate > incumbent,
            Turn::Min => candidate < incumbent,
        }
    }
}

/// Rules of a two-player game as seen by the tree builder.
pub trait TwoPlayerGame {
    type Board: Clone + Eq + Debug;
    type Move: Clone + Eq + Debug;

    /// Score of a finished game (positive favours `Turn::Max`), or `None`
    /// while play can continue.
    fn terminal_score(&self, board: &Self::Board) -> Option<i32>;

    /// Legal moves for `turn`, in a fixed order, with the boards they produce.
    fn moves(&self, board: &Self::Board, turn: Turn) -> Vec<(Self::Move, Self::Board)>;
}

/// A position in the game tree.
#[derive(Debug, Clone)]
pub struct GameNode<B, M> {
    pub board: B,
    /// Player to move on `board`.
    pub turn: Turn,
    /// Backed-up minimax score, `None` until the subtree has been built.
    pub score: Option<i32>,
    /// Move that produced this position (`None` for the root).
    pub mv: Option<M>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed minimax game tree.
pub struct GameTree<G: TwoPlayerGame> {
    game: G,
    nodes: Vec<GameNode<G::Board, G::Move>>,
    root: NodeId,
}

impl<G: TwoPlayerGame> GameTree<G> {
    /// Create a tree holding only an unexpanded root.
    pub fn seed(game: G, board: G::Board, turn: Turn) -> Self {
        let root = GameNode {
            board,
            turn,
            score: None,
            mv: None,
            parent: None,
            children: Vec::new(),
        };
        Self {
            game,
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Build the complete tree reachable from `board` with `turn` to move.
    pub fn build(game: G, board: G::Board, turn: Turn) -> Self {
        let mut tree = Self::seed(game, board, turn);
        let root = tree.root;
        let score = tree.expand(root);
        debug!(nodes = tree.len(), score, "game tree built");
        tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &GameNode<G::Board, G::Move> {
        &self.nodes[id.index()]
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Number of positions currently held.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Final score if the game is over at `id`.
    pub fn outcome(&self, id: NodeId) -> Option<i32> {
        self.game.terminal_score(&self.node(id).board)
    }

    /// Recompute the minimax value of `id` from its built subtree without
    /// modifying anything. `None` if some part of it was never built.
    pub fn evaluate(&self, id: NodeId) -> Option<i32> {
        let node = self.node(id);
        if let Some(score) = self.game.terminal_score(&node.board) {
            return Some(score);
        }
        // Only `expand` stores a score, and it builds every legal move first.
        let stored = node.score?;
        if node.children.is_empty() {
            return Some(stored);
        }

        let mut best: Option<i32> = None;
        for &child in &node.children {
            let score = self.evaluate(child)?;
            best = Some(match best {
                Some(current) if !node.turn.prefers(score, current) => current,
                _ => score,
            });
        }
        best
    }

    /// Build the subtree under `id` (if not built yet) and return its score.
    fn expand(&mut self, id: NodeId) -> i32 {
        if let Some(score) = self.node(id).score {
            return score;
        }

        let board = self.node(id).board.clone();
        let turn = self.node(id).turn;

        // A decided position is a leaf; its subtree is never built.
        if let Some(score) = self.game.terminal_score(&board) {
            self.nodes[id.index()].score = Some(score);
            return score;
        }

        let mut best: Option<i32> = None;
        for (mv, next) in self.game.moves(&board, turn) {
            let child = match self.find_child(id, &mv) {
                Some(existing) => existing,
                None => self.attach(id, mv, next),
            };
            let score = self.expand(child);
            best = Some(match best {
                Some(current) if !turn.prefers(score, current) => current,
                _ => score,
            });
        }

        // No legal moves without a decided result counts as a draw.
        let score = best.unwrap_or(0);
        self.nodes[id.index()].score = Some(score);
        score
    }

    fn find_child(&self, id: NodeId, mv: &G::Move) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).mv.as_ref() == Some(mv))
    }

    fn attach(&mut self, parent: NodeId, mv: G::Move, board: G::Board) -> NodeId {
        let turn = self.node(parent).turn.other();
        let id = NodeId(self.nodes.len());
        self.nodes.push(GameNode {
            board,
            turn,
            score: None,
            mv: Some(mv),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Pick the child most favourable to the player to move at `id`.
    ///
    /// Ties go to the earliest child in move enumeration order. Returns
    /// `None` when the game is over at `id`.
    pub fn choose_move(&mut self, id: NodeId) -> Option<NodeId> {
        self.expand(id);

        let node = self.node(id);
        let turn = node.turn;
        let mut best: Option<(NodeId, i32)> = None;
        for &child in &node.children {
            let Some(score) = self.node(child).score else {
                continue;
            };
            match best {
                Some((_, current)) if !turn.prefers(score, current) => {}
                _ => best = Some((child, score)),
            }
        }
        best.map(|(child, _)| child)
    }

    /// Follow `mv` from `id`, building that position lazily if the tree
    /// does not hold it yet.
    pub fn play(&mut self, id: NodeId, mv: &G::Move) -> Result<NodeId> {
        let node = self.node(id);
        if self.game.terminal_score(&node.board).is_some() {
            return Err(SearchError::invalid_transition(&node.board, mv));
        }
        if let Some(child) = self.find_child(id, mv) {
            return Ok(child);
        }

        let next = self
            .game
            .moves(&node.board, node.turn)
            .into_iter()
            .find(|(candidate, _)| candidate == mv)
            .map(|(_, board)| board)
            .ok_or_else(|| SearchError::invalid_transition(&node.board, mv))?;

        debug!(mv = ?mv, "building position missing from the game tree");
        let child = self.attach(id, mv.clone(), next);
        self.expand(child);
        Ok(child)
    }
}
