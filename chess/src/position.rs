//! Editable chess position used by the retrograde analysis

use owlchess::board::{Board, FenParseError, RawBoard, ValidateError};
use owlchess::movegen::{legal, MoveList};
use owlchess::moves::{self, Move};
use owlchess::{CastlingRights, Cell, Color, Coord};
use thiserror::Error;

/// Error making a move on a [`Position`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Position is not a legal chess position
    #[error("invalid position: {0}")]
    Position(#[from] ValidateError),
    /// Move is not legal in the position
    #[error("bad move: {0}")]
    Move(#[from] moves::ValidateError),
}

/// Chess position which can be edited square by square and queried for legal moves
///
/// The retrograde engine only talks to this trait, so any rules engine may be plugged in.
/// The implementation shipped with this crate is owlchess's [`RawBoard`]: it stays unvalidated
/// while being edited and gets validated into [`Board`] for each rules query.
pub trait Position: Clone {
    fn get(&self, c: Coord) -> Cell;

    fn put(&mut self, c: Coord, cell: Cell);

    /// Clears the square `c` and returns its previous contents
    fn remove(&mut self, c: Coord) -> Cell {
        let cell = self.get(c);
        self.put(c, Cell::EMPTY);
        cell
    }

    fn side(&self) -> Color;

    fn set_side(&mut self, c: Color);

    fn castling(&self) -> CastlingRights;

    fn set_castling(&mut self, r: CastlingRights);

    /// Square with the pawn which can be captured by enpassant
    fn ep_source(&self) -> Option<Coord>;

    fn set_ep_source(&mut self, c: Option<Coord>);

    fn move_counter(&self) -> u16;

    fn set_move_counter(&mut self, v: u16);

    fn move_number(&self) -> u16;

    fn set_move_number(&mut self, v: u16);

    /// Returns the legal moves from `src` to `dst`
    ///
    /// Fails if the position is not a legal chess position.
    fn legal_moves(&self, src: Coord, dst: Coord) -> Result<MoveList, ValidateError>;

    /// Returns `true` if the side to move is in check
    fn is_check(&self) -> Result<bool, ValidateError>;

    fn from_fen(fen: &str) -> Result<Self, FenParseError>;

    fn as_fen(&self) -> String;

    /// Makes a legal move and returns the resulting position
    fn make_move(&self, mv: Move) -> Result<Self, MoveError>;
}

impl Position for RawBoard {
    #[inline]
    fn get(&self, c: Coord) -> Cell {
        RawBoard::get(self, c)
    }

    #[inline]
    fn put(&mut self, c: Coord, cell: Cell) {
        RawBoard::put(self, c, cell)
    }

    fn side(&self) -> Color {
        self.side
    }

    fn set_side(&mut self, c: Color) {
        self.side = c;
    }

    fn castling(&self) -> CastlingRights {
        self.castling
    }

    fn set_castling(&mut self, r: CastlingRights) {
        self.castling = r;
    }

    fn ep_source(&self) -> Option<Coord> {
        self.ep_source
    }

    fn set_ep_source(&mut self, c: Option<Coord>) {
        self.ep_source = c;
    }

    fn move_counter(&self) -> u16 {
        self.move_counter
    }

    fn set_move_counter(&mut self, v: u16) {
        self.move_counter = v;
    }

    fn move_number(&self) -> u16 {
        self.move_number
    }

    fn set_move_number(&mut self, v: u16) {
        self.move_number = v;
    }

    fn legal_moves(&self, src: Coord, dst: Coord) -> Result<MoveList, ValidateError> {
        let mut res = legal::gen_all(&Board::try_from(self)?);
        res.retain(|mv| mv.src() == src && mv.dst() == dst);
        Ok(res)
    }

    fn is_check(&self) -> Result<bool, ValidateError> {
        Ok(Board::try_from(self)?.is_check())
    }

    /// Parses and validates the position
    ///
    /// The castling rights and the enpassant square are normalized the same way as
    /// [`Board::try_from()`] does.
    fn from_fen(fen: &str) -> Result<RawBoard, FenParseError> {
        let raw = RawBoard::from_fen(fen)?;
        Ok(*Board::try_from(raw)?.raw())
    }

    fn as_fen(&self) -> String {
        RawBoard::as_fen(self)
    }

    fn make_move(&self, mv: Move) -> Result<RawBoard, MoveError> {
        Ok(*Board::try_from(self)?.make_move(mv)?.raw())
    }
}
