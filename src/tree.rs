use crate::rules::{IllegalMove, Position};

pub type NodeId = u32;

/// A node of the search tree.
///
/// Owns a full copy of its position. `parent` is a plain arena index, never
/// an owning reference, so the parent->children ownership never cycles.
pub struct Node<P: Position> {
    pub position: P,
    /// Move applied to the parent's position to reach this node; None at the root.
    pub mv: Option<P::Move>,
    pub parent: Option<NodeId>,
    /// Child ids in insertion order.
    pub children: Vec<NodeId>,
    pub visits: u32,
    /// Accumulated reward, always from the machine's perspective.
    pub wins: f64,
}

impl<P: Position> Node<P> {
    fn new(position: P, mv: Option<P::Move>, parent: Option<NodeId>) -> Self {
        Node {
            position,
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }

    /// Observed win ratio; 0.0 before the first visit.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

/// Arena-backed tree built fresh for every decision and dropped whole.
///
/// All nodes live in one `Vec`; dropping the tree releases every node (and
/// the position copy inside it) exactly once. Node 0 is the root.
pub struct Tree<P: Position> {
    nodes: Vec<Node<P>>,
}

impl<P: Position> Tree<P> {
    pub fn new(root_position: P) -> Self {
        Tree {
            nodes: vec![Node::new(root_position, None, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id as usize]
    }

    /// Derive the child position by applying `mv` to `parent`'s position,
    /// append the new node to `parent`'s child list, and return its id.
    pub fn add_child(&mut self, parent: NodeId, mv: P::Move) -> Result<NodeId, IllegalMove> {
        let position = self.get(parent).position.apply(mv)?;
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(position, Some(mv), Some(parent)));
        self.get_mut(parent).children.push(id);
        Ok(id)
    }
}


// parent links as indices instead of references sidestep the usual Rc/Weak
// dance: the Vec owns every node, child-id lists are just bookkeeping, and
// teardown is a single Vec drop with no recursion and no chance of freeing
// a node twice
