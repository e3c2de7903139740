//! Node arena with index-based parent links.
//!
//! Nodes are stored in a contiguous `Vec` and referenced by `NodeId`
//! indices. A child only records its parent's index, so the whole graph is
//! released at once when the arena is dropped.

use crate::plan::{Plan, Step};
use crate::problem::Cost;

/// Index of a node within a `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A search node: a state plus how it was reached.
#[derive(Debug, Clone)]
pub struct Node<S, A> {
    pub state: S,
    /// Action that produced this node (`None` for the root).
    pub action: Option<A>,
    pub parent: Option<NodeId>,
    /// Accumulated path cost from the root.
    pub g: Cost,
    /// Heuristic estimate to the goal (zero for uninformed search).
    pub h: Cost,
    /// Number of transitions from the root.
    pub depth: usize,
}

impl<S, A> Node<S, A> {
    #[inline]
    pub fn f(&self) -> Cost {
        self.g.saturating_add(self.h)
    }
}

/// Arena owning every node created during one search.
#[derive(Debug)]
pub struct NodeArena<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A> NodeArena<S, A> {
    /// Create an arena holding only the root node.
    pub fn with_root(state: S, h: Cost) -> (Self, NodeId) {
        let root = Node {
            state,
            action: None,
            parent: None,
            g: 0,
            h,
            depth: 0,
        };
        (Self { nodes: vec![root] }, NodeId(0))
    }

    /// Allocate a child of `parent` and return its id.
    pub fn push_child(&mut self, parent: NodeId, action: A, state: S, g: Cost, h: Cost) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            state,
            action: Some(action),
            parent: Some(parent),
            g,
            h,
            depth,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::with_capacity(self.get(id).depth + 1);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.get(current).parent;
        }
        chain.reverse();
        chain
    }

    /// Consume the arena and build the plan ending at `goal`.
    pub fn into_plan(self, goal: NodeId) -> Plan<S, A> {
        let lineage = self.lineage(goal);
        let mut slots: Vec<Option<Node<S, A>>> = self.nodes.into_iter().map(Some).collect();

        let mut taken = lineage.into_iter().filter_map(|id| slots[id.index()].take());
        let root = taken.next().expect("lineage always starts at the root");
        let steps = taken
            .filter_map(|node| {
                node.action.map(|action| Step {
                    action,
                    state: node.state,
                })
            })
            .collect();

        Plan {
            initial: root.state,
            steps,
        }
    }
}

impl<S: PartialEq, A> NodeArena<S, A> {
    /// Whether `state` occurs anywhere on the path from the root to `id`.
    pub fn on_path(&self, id: NodeId, state: &S) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current);
            if node.state == *state {
                return true;
            }
            cursor = node.parent;
        }
        false
    }
}
