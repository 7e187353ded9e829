//! Retrograde chess analysis
//!
//! The crate decides whether a retraction (a move taken back) is legal, and computes the position
//! before the retracted move. The rules engine is accessed via the [`Position`] trait, which is
//! implemented for [`RawBoard`] from the [`owlchess`] crate.
//!
//! # Example
//!
//! ```
//! use retrochess::{retract, Position, RawBoard, Rejection, Retraction};
//!
//! let pos = <RawBoard as Position>::from_fen("8/8/3k4/8/8/3KR3/8/8 b - - 0 1").unwrap();
//!
//! let prev = retract(&pos, "d3d2".parse().unwrap()).unwrap();
//! assert_eq!(prev.as_fen(), "8/8/3k4/8/8/4R3/3K4/8 w - - 0 1");
//!
//! let e3 = "e3".parse().unwrap();
//! assert_eq!(
//!     retract(&pos, Retraction::new("d3".parse().unwrap(), e3)),
//!     Err(Rejection::DestinationOccupied(e3)),
//! );
//! ```

pub mod diagram;
pub mod position;
pub mod retro;

pub use owlchess::{
    board::{Board, RawBoard},
    movegen::MoveList,
    moves::{Move, MoveKind},
    CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank,
};
pub use position::{MoveError, Position};
pub use retro::{retract, Rejection, Retraction, Retro, RetroContext, Uncapture};
