use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::rules::{IllegalMove, Position, Status};

use super::dropmove::DropMove;
use super::player::Player;
use super::{COLS, CONNECT, ROWS};

/// The board representation. Copy
///
/// `cells[0]` is the TOP row; a dropped disc lands on the largest empty row
/// index of its column. `side_to_move` flips on every applied drop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Option<Player>; COLS]; ROWS],
    side_to_move: Player,
}

/// Error building a board from a compact move string.
#[derive(Error, Debug)]
pub enum ParseMovesError {
    #[error("invalid column character {0:?} (expected '0'-'6')")]
    BadColumn(char),
    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}

impl Board {
    /// Empty grid with `first` to move.
    pub fn new(first: Player) -> Self {
        Board {
            cells: [[None; COLS]; ROWS],
            side_to_move: first,
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.cells[row][col]
    }

    /// Landing row for a drop into `col`, or None when the column is full.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_none())
    }

    /// One drop per open column, in column order (deterministic).
    pub fn legal_moves(&self) -> ArrayVec<DropMove, COLS> {
        let mut moves = ArrayVec::new();
        for col in 0..COLS {
            if let Some(row) = self.drop_row(col) {
                moves.push(DropMove::new(row, col));
            }
        }
        moves
    }

    /// Apply a drop and return the resulting board with the turn advanced.
    /// Fails if the target cell is already occupied.
    pub fn apply(&self, mv: DropMove) -> Result<Board, IllegalMove> {
        if self.cells[mv.row()][mv.col()].is_some() {
            return Err(IllegalMove);
        }
        let mut b = *self;
        b.cells[mv.row()][mv.col()] = Some(self.side_to_move);
        b.side_to_move = !self.side_to_move;
        Ok(b)
    }

    /// Terminal status: a four-in-a-row win, a full-grid draw, or ongoing.
    pub fn status(&self) -> Status<Player> {
        let mut filled = 0;
        for row in 0..ROWS {
            for col in 0..COLS {
                let Some(player) = self.cells[row][col] else {
                    continue;
                };
                filled += 1;
                // run directions anchored at the run's first cell:
                // right, down, down-right, up-right
                if col + CONNECT <= COLS && self.run(player, row, col, 0, 1) {
                    return Status::Won(player);
                }
                if row + CONNECT <= ROWS && self.run(player, row, col, 1, 0) {
                    return Status::Won(player);
                }
                if row + CONNECT <= ROWS && col + CONNECT <= COLS && self.run(player, row, col, 1, 1)
                {
                    return Status::Won(player);
                }
                if row >= CONNECT - 1 && col + CONNECT <= COLS && self.run(player, row, col, -1, 1) {
                    return Status::Won(player);
                }
            }
        }
        if filled == ROWS * COLS {
            Status::Draw
        } else {
            Status::Ongoing
        }
    }

    #[inline]
    fn run(&self, player: Player, row: usize, col: usize, dr: isize, dc: isize) -> bool {
        (1..CONNECT).all(|k| {
            let r = (row as isize + dr * k as isize) as usize;
            let c = (col as isize + dc * k as isize) as usize;
            self.cells[r][c] == Some(player)
        })
    }

    /// Build a board by dropping into the columns named by `cols` ('0'-'6'),
    /// starting from an empty grid with `first` to move.
    ///
    /// Fixture constructor for tests and benches, same role the move-sequence
    /// corpus format plays for Connect Four solvers.
    pub fn from_moves(cols: &str, first: Player) -> Result<Board, ParseMovesError> {
        let mut board = Board::new(first);
        for ch in cols.chars() {
            let col = ch
                .to_digit(10)
                .filter(|&d| (d as usize) < COLS)
                .ok_or(ParseMovesError::BadColumn(ch))? as usize;
            let row = board.drop_row(col).ok_or(IllegalMove)?;
            board = board.apply(DropMove::new(row, col))?;
        }
        Ok(board)
    }
}

impl Position for Board {
    type Move = DropMove;
    type Player = Player;
    type Moves = ArrayVec<DropMove, COLS>;

    fn legal_moves(&self) -> Self::Moves {
        Board::legal_moves(self)
    }

    fn apply(&self, mv: DropMove) -> Result<Board, IllegalMove> {
        Board::apply(self, mv)
    }

    fn status(&self) -> Status<Player> {
        Board::status(self)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..COLS {
            write!(f, "  {} ", col)?;
        }
        writeln!(f)?;
        for row in 0..ROWS {
            for col in 0..COLS {
                let c = match self.cells[row][col] {
                    Some(p) => p.disc(),
                    None => ' ',
                };
                write!(f, "| {} ", c)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
