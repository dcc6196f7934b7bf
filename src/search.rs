use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::rules::{IllegalMove, Position, Status};
use crate::time::{Clock, WallClock};
use crate::tree::{Node, NodeId, Tree};
use crate::types::{SearchResult, EXPLORATION};

/// Mutable search context threaded through decisions: rng, clock, budget,
/// and the cycle counter of the last decision.
pub struct SearchState<R = ChaCha8Rng, C = WallClock> {
    pub rng: R,
    pub clock: C,
    pub budget: Duration,
    pub iterations: u32,
}

impl SearchState {
    /// Entropy-seeded rng and a wall clock.
    pub fn new(budget: Duration) -> Self {
        Self::from_parts(ChaCha8Rng::from_entropy(), WallClock::new(), budget)
    }

    /// Fixed seed for reproducible decisions.
    pub fn with_seed(budget: Duration, seed: u64) -> Self {
        Self::from_parts(ChaCha8Rng::seed_from_u64(seed), WallClock::new(), budget)
    }
}

impl<R: Rng, C: Clock> SearchState<R, C> {
    pub fn from_parts(rng: R, clock: C, budget: Duration) -> Self {
        SearchState {
            rng,
            clock,
            budget,
            iterations: 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// The caller must test terminal status before asking for a move.
    #[error("search started from a terminal position")]
    TerminalRoot,
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
}

/// Decide the machine's move from `position` under the state's time budget.
///
/// Builds a private search tree (root pre-expanded with one child per legal
/// move), cycles selection -> expansion -> rollout -> backpropagation until
/// the budget elapses, and returns the root child with the best win ratio.
/// The budget check sits after each full cycle, so a zero budget still runs
/// exactly one cycle and the last cycle may overrun.
///
/// `position` itself is never mutated; the caller applies the returned move.
/// The whole tree is dropped before returning.
pub fn decide_move<P, R, C>(
    position: &P,
    machine: P::Player,
    state: &mut SearchState<R, C>,
) -> Result<SearchResult<P::Move>, SearchError>
where
    P: Position,
    R: Rng,
    C: Clock,
{
    let moves: Vec<P::Move> = position.legal_moves().into_iter().collect();
    if position.status().is_terminal() || moves.is_empty() {
        return Err(SearchError::TerminalRoot);
    }
    state.iterations = 0;
    state.clock.restart();

    let mut tree = Tree::new(position.clone());
    let root = tree.root();
    for &mv in &moves {
        tree.add_child(root, mv)?;
    }

    loop {
        run_cycle(&mut tree, machine, &mut state.rng)?;
        state.iterations += 1;
        if state.clock.elapsed() >= state.budget {
            break;
        }
    }

    // best observed win ratio among the root children; unvisited children
    // are skipped and ties go to the earliest child. The first cycle always
    // lands on the first child, so it has a real ratio to start from.
    let children = tree.get(root).children.clone();
    let mut best_move = moves[0];
    let mut best_ratio = tree.get(children[0]).mean();
    for (i, &child) in children.iter().enumerate().skip(1) {
        let node = tree.get(child);
        if node.visits > 0 && node.mean() > best_ratio {
            best_ratio = node.mean();
            best_move = moves[i];
        }
    }

    Ok(SearchResult {
        best_move,
        iterations: state.iterations,
        win_rate: best_ratio,
    })
}

/// One full search cycle on an existing tree.
fn run_cycle<P, R>(tree: &mut Tree<P>, machine: P::Player, rng: &mut R) -> Result<(), SearchError>
where
    P: Position,
    R: Rng,
{
    let leaf = select(tree, tree.root());
    expand(tree, leaf, machine, rng)?;
    let outcome = rollout(&tree.get(leaf).position)?;
    backpropagate(tree, leaf, reward_for(outcome, machine));
    Ok(())
}

/// UCB1 score of a child as seen from its parent.
fn ucb_score<P: Position>(parent_visits: u32, child: &Node<P>) -> f64 {
    if child.visits == 0 {
        // unvisited children outrank everything
        return f64::INFINITY;
    }
    let explore = (2.0 * (parent_visits as f64).ln() / child.visits as f64).sqrt();
    child.mean() + EXPLORATION * explore
}

/// Walk from `root` to a childless node, always taking the child with the
/// strictly greatest UCB1 score (first child wins ties).
fn select<P: Position>(tree: &Tree<P>, root: NodeId) -> NodeId {
    let mut node = root;
    loop {
        let n = tree.get(node);
        if n.children.is_empty() {
            return node;
        }
        let mut best = n.children[0];
        let mut best_score = ucb_score(n.visits, tree.get(best));
        for &child in &n.children[1..] {
            let score = ucb_score(n.visits, tree.get(child));
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        node = best;
    }
}

/// Add at most one child to `leaf`: nothing for a visited or terminal leaf;
/// otherwise the first immediately-winning move for the machine if one
/// exists, else a uniformly random legal move.
///
/// Exactly one candidate is ever tried per leaf. Once a node has a child,
/// later visits go straight back to UCB1 over the existing children, so the
/// tree below the root stays narrow on purpose.
fn expand<P, R>(
    tree: &mut Tree<P>,
    leaf: NodeId,
    machine: P::Player,
    rng: &mut R,
) -> Result<(), IllegalMove>
where
    P: Position,
    R: Rng,
{
    let node = tree.get(leaf);
    if node.visits > 0 || node.position.status().is_terminal() {
        return Ok(());
    }
    let moves: Vec<P::Move> = node.position.legal_moves().into_iter().collect();
    if moves.is_empty() {
        return Ok(());
    }
    let mv = match winning_move(&node.position, &moves, machine)? {
        Some(mv) => mv,
        None => moves[rng.gen_range(0..moves.len())],
    };
    tree.add_child(leaf, mv)?;
    Ok(())
}

/// First move (in adapter order) whose application immediately wins the game
/// for the machine, regardless of whose turn it is.
fn winning_move<P: Position>(
    position: &P,
    moves: &[P::Move],
    machine: P::Player,
) -> Result<Option<P::Move>, IllegalMove> {
    for &mv in moves {
        if matches!(position.apply(mv)?.status(), Status::Won(p) if p == machine) {
            return Ok(Some(mv));
        }
    }
    Ok(None)
}

/// Play a working copy of `start` to a terminal status.
///
/// Each round applies EVERY legal move of the round's starting position in
/// sequence (one stone per open column, turns alternating per apply), and
/// only then re-tests the status. Several plies advance per round, so the
/// playout can run past the first winning position; that is the intended
/// policy, not a shortcut.
fn rollout<P: Position>(start: &P) -> Result<Status<P::Player>, IllegalMove> {
    let mut sim = start.clone();
    loop {
        let status = sim.status();
        if status.is_terminal() {
            return Ok(status);
        }
        for mv in sim.legal_moves() {
            sim = sim.apply(mv)?;
        }
    }
}

/// Reward from the machine's fixed perspective: 1 for a machine win or a
/// draw, 0 for an opponent win.
fn reward_for<Pl: Copy + Eq>(status: Status<Pl>, machine: Pl) -> f64 {
    match status {
        Status::Won(winner) if winner != machine => 0.0,
        _ => 1.0,
    }
}

/// Fold the rollout reward into every node from `from` up to the root,
/// inclusive. The same machine-perspective reward lands at every depth; the
/// tree serves one objective and never flips sign per ply.
fn backpropagate<P: Position>(tree: &mut Tree<P>, from: NodeId, reward: f64) {
    let mut node = Some(from);
    while let Some(id) = node {
        let n = tree.get_mut(id);
        n.visits += 1;
        n.wins += reward;
        node = n.parent;
    }
}


// The four phases in one cycle:
//
// Selection: UCB1 walk from the root until a node w/ no children. Unvisited
// children score infinity, so every child gets sampled before any sibling is
// re-sampled.
//
// Expansion: one child max, only at an unvisited non-terminal leaf. Candidate
// is the forced machine win if the scan finds one, else a single random move.
// The root is the exception: the driver seeds it w/ all children up front so
// the final ratio comparison sees every first move.
//
// Rollout: whole rounds of "drop one stone in every open column", status
// re-checked between rounds only.
//
// Backpropagation: leaf-to-root += of the same machine-perspective reward
// (win or draw = 1, opponent win = 0) at every node on the path.
