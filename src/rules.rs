//! Rules seam consumed by the search engine.
//!
//! The engine never looks inside a position: it only enumerates legal moves,
//! derives successor positions, and asks for the terminal status. Any
//! gravity-drop grid game that can answer those three questions can be
//! searched.

use thiserror::Error;

/// Applying a move to an occupied cell.
///
/// The engine only plays adapter-enumerated moves, so hitting this inside a
/// search marks a caller bug (e.g. a stale position), not a recoverable
/// condition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal move: destination cell is already occupied")]
pub struct IllegalMove;

/// Terminal status of a position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status<P> {
    Ongoing,
    Draw,
    Won(P),
}

impl<P> Status<P> {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

/// An immutable game position.
///
/// Positions are values: `apply` returns a fresh position and leaves the
/// receiver untouched. `legal_moves` must enumerate in a deterministic order
/// so searches are reproducible under a fixed rng seed.
pub trait Position: Clone {
    type Move: Copy + Eq;
    type Player: Copy + Eq;
    type Moves: IntoIterator<Item = Self::Move>;

    /// Legal moves in a deterministic order. Empty iff the position is terminal.
    fn legal_moves(&self) -> Self::Moves;

    /// New position with `mv` played and the turn advanced.
    fn apply(&self, mv: Self::Move) -> Result<Self, IllegalMove>;

    fn status(&self) -> Status<Self::Player>;
}
