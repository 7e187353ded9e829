//! Retrograde analysis: taking moves back
//!
//! A retraction moves a piece of the side which made the last move from the square it stands on
//! (`src`) back to the square it came from (`dst`). It may also put back a piece captured by that
//! move (an uncapture), or turn the piece back into a pawn (an unpromotion). A king retracting
//! from its castled square to its initial square undoes the castling as a whole.
//!
//! The retraction is legal only if the forward move from the resulting position is legal and
//! reproduces the current position.
//!
//! # Example
//!
//! ```
//! # use retrochess::{RawBoard, Retro};
//! #
//! let start = RawBoard::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
//! let mut retro = Retro::new(start);
//! let prev = retro.retract("e4e2".parse().unwrap()).unwrap();
//! assert_eq!(prev.as_fen(), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
//!
//! // White is to move now, so the last move was made by Black.
//! assert!(retro.retract("e1d1".parse().unwrap()).is_err());
//! assert!(retro.retract("e8d8".parse().unwrap()).is_ok());
//! ```

use crate::position::Position;

use owlchess::board::ValidateError;
use owlchess::types::CoordParseError;
use owlchess::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Move, Piece, Rank};

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

fn double_step_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

fn is_back_rank(r: Rank) -> bool {
    matches!(r, Rank::R1 | Rank::R8)
}

fn with_rank(c: Coord, r: Rank) -> Coord {
    Coord::from_parts(c.file(), r)
}

/// Returns the files of the castling rook before and after castling
fn rook_files(side: CastlingSide) -> (File, File) {
    match side {
        CastlingSide::King => (File::H, File::F),
        CastlingSide::Queen => (File::A, File::D),
    }
}

fn has_any_castling(r: CastlingRights, c: Color) -> bool {
    r.has(c, CastlingSide::Queen) || r.has(c, CastlingSide::King)
}

fn piece_from_char(c: char) -> Option<Piece> {
    Cell::from_char(c.to_ascii_uppercase())?.piece()
}

fn piece_char(p: Piece) -> char {
    Cell::from_parts(Color::White, p).as_char()
}

/// Piece put back on the board by a retraction
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Uncapture {
    /// Piece captured on the square the retracting piece leaves
    Piece(Piece),
    /// Pawn captured by enpassant
    EnPassant,
}

/// Request to take back one move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Retraction {
    /// Square where the piece stands now
    pub src: Coord,
    /// Square where the piece goes back to
    pub dst: Coord,
    pub uncapture: Option<Uncapture>,
    /// Turn the piece back into a pawn
    pub unpromote: bool,
}

impl Retraction {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Retraction {
        Retraction {
            src,
            dst,
            uncapture: None,
            unpromote: false,
        }
    }

    #[inline]
    pub const fn uncapture(self, u: Uncapture) -> Retraction {
        Retraction {
            uncapture: Some(u),
            ..self
        }
    }

    #[inline]
    pub const fn unpromote(self) -> Retraction {
        Retraction {
            unpromote: true,
            ..self
        }
    }
}

/// Error parsing [`Retraction`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RetractionParseError {
    #[error("bad source square: {0}")]
    Src(CoordParseError),
    #[error("bad destination square: {0}")]
    Dst(CoordParseError),
    #[error("bad uncapture {0:?}")]
    BadUncapture(String),
    #[error("unexpected trailing data {0:?}")]
    ExtraData(String),
}

impl FromStr for Retraction {
    type Err = RetractionParseError;

    /// Parses a retraction like `e4e2`, `d6e5xep` or `b8a7xR=`
    ///
    /// The first square is the current one, the second is the one to retract to. `xP` puts back
    /// the captured piece `P`, `xep` puts back the pawn captured by enpassant, and `=` demotes the
    /// piece to a pawn.
    fn from_str(s: &str) -> Result<Retraction, Self::Err> {
        type Error = RetractionParseError;

        let src = s.get(0..2).unwrap_or(s);
        let dst = s.get(2..4).unwrap_or("");
        let mut res = Retraction::new(
            Coord::from_str(src).map_err(Error::Src)?,
            Coord::from_str(dst).map_err(Error::Dst)?,
        );
        let mut rest = s.get(4..).unwrap_or("");
        if let Some(tail) = rest.strip_prefix('x') {
            if let Some(tail) = tail.strip_prefix("ep") {
                res.uncapture = Some(Uncapture::EnPassant);
                rest = tail;
            } else {
                let mut chars = tail.chars();
                let piece = chars
                    .next()
                    .and_then(piece_from_char)
                    .ok_or_else(|| Error::BadUncapture(tail.to_string()))?;
                res.uncapture = Some(Uncapture::Piece(piece));
                rest = chars.as_str();
            }
        }
        if let Some(tail) = rest.strip_prefix('=') {
            res.unpromote = true;
            rest = tail;
        }
        if !rest.is_empty() {
            return Err(Error::ExtraData(rest.to_string()));
        }
        Ok(res)
    }
}

impl fmt::Display for Retraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        match self.uncapture {
            Some(Uncapture::Piece(p)) => write!(f, "x{}", piece_char(p))?,
            Some(Uncapture::EnPassant) => write!(f, "xep")?,
            None => {}
        }
        if self.unpromote {
            write!(f, "=")?;
        }
        Ok(())
    }
}

/// Reason to reject a retraction
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum Rejection {
    #[error("destination square {0} is occupied")]
    DestinationOccupied(Coord),
    #[error("no piece on {0}")]
    NoPiece(Coord),
    #[error("piece on {0} belongs to the side to move")]
    WrongSide(Coord),
    #[error("only a pawn can uncapture enpassant")]
    EnpassantNotPawn,
    #[error("{0:?} cannot be unpromoted")]
    BadUnpromote(Piece),
    #[error("king cannot be uncaptured")]
    UncaptureKing,
    #[error("last move was a double pawn move, only the pawn on {0} can retract")]
    EnpassantContinuity(Coord),
    #[error("king of color {0:?} still has castling rights")]
    KingHasCastling(Color),
    #[error("rook on {0} still has castling rights")]
    RookHasCastling(Coord),
    #[error("pawn cannot retract to {0}")]
    PawnOnBackRank(Coord),
    #[error("pawn cannot be uncaptured on {0}")]
    UncapturePawnRank(Coord),
    #[error("too many pieces of color {0:?}")]
    TooManyUnits(Color),
    #[error("uncapture square {0} is occupied")]
    UncaptureOccupied(Coord),
    #[error("no rook on {0} to uncastle")]
    UncastleNoRook(Coord),
    #[error("uncastled rook square {0} is occupied")]
    UncastleBlocked(Coord),
    #[error("resulting position is invalid: {0}")]
    InvalidPosition(#[from] ValidateError),
    #[error("no legal forward move reproduces the retraction")]
    NoForwardMove,
    #[error("forward move does not reproduce the current position")]
    Mismatch,
}

/// Retraction in progress
///
/// Holds the current position, the request and the position derived so far. The context is
/// built by [`RetroContext::new()`], which performs all the checks on the request itself, then
/// [`RetroContext::try_uncapture()`] and [`RetroContext::try_uncastle()`] complete the derived
/// position, and [`RetroContext::check()`] verifies it against the rules of chess.
///
/// The current position is never modified.
#[derive(Debug, Clone)]
pub struct RetroContext<'a, P> {
    current: &'a P,
    request: Retraction,
    mover: Color,
    piece: Piece,
    derived: P,
}

impl<'a, P: Position> RetroContext<'a, P> {
    pub fn new(request: Retraction, current: &'a P) -> Result<Self, Rejection> {
        let Retraction {
            src,
            dst,
            uncapture,
            unpromote,
        } = request;

        if current.get(dst).is_occupied() {
            return Err(Rejection::DestinationOccupied(dst));
        }

        let mover = current.side().inv();
        let (color, piece) = match (current.get(src).color(), current.get(src).piece()) {
            (Some(c), Some(p)) => (c, p),
            _ => return Err(Rejection::NoPiece(src)),
        };
        if color != mover {
            return Err(Rejection::WrongSide(src));
        }
        match uncapture {
            Some(Uncapture::Piece(Piece::King)) => return Err(Rejection::UncaptureKing),
            Some(Uncapture::EnPassant) if piece != Piece::Pawn => {
                return Err(Rejection::EnpassantNotPawn)
            }
            _ => {}
        }
        if unpromote && matches!(piece, Piece::Pawn | Piece::King) {
            return Err(Rejection::BadUnpromote(piece));
        }

        if let Some(ep) = current.ep_source() {
            let double = with_rank(ep, double_step_src_rank(mover));
            if src != ep || dst != double || uncapture.is_some() || unpromote {
                return Err(Rejection::EnpassantContinuity(ep));
            }
        }

        let castling = current.castling();
        if piece == Piece::King && has_any_castling(castling, mover) {
            return Err(Rejection::KingHasCastling(mover));
        }
        if piece == Piece::Rook {
            let rank = home_rank(mover);
            for side in [CastlingSide::Queen, CastlingSide::King] {
                if src == Coord::from_parts(rook_files(side).0, rank) && castling.has(mover, side)
                {
                    return Err(Rejection::RookHasCastling(src));
                }
            }
        }

        let mut derived = current.clone();
        derived.set_side(mover);
        derived.set_ep_source(None);
        derived.remove(src);
        let moved = if unpromote { Piece::Pawn } else { piece };
        if moved == Piece::Pawn && is_back_rank(dst.rank()) {
            return Err(Rejection::PawnOnBackRank(dst));
        }
        derived.put(dst, Cell::from_parts(mover, moved));
        if mover == Color::Black {
            derived.set_move_number(current.move_number().saturating_sub(1).max(1));
        }
        if moved == Piece::Pawn {
            derived.set_move_counter(0);
        } else {
            derived.set_move_counter(current.move_counter().saturating_sub(1));
        }

        Ok(RetroContext {
            current,
            request,
            mover,
            piece,
            derived,
        })
    }

    /// Returns the side which made the move being retracted
    #[inline]
    pub fn mover(&self) -> Color {
        self.mover
    }

    #[inline]
    pub fn request(&self) -> &Retraction {
        &self.request
    }

    /// Returns the position derived so far
    #[inline]
    pub fn derived(&self) -> &P {
        &self.derived
    }

    #[inline]
    pub fn into_derived(self) -> P {
        self.derived
    }

    /// Puts back the captured piece, if the request has one
    pub fn try_uncapture(&mut self) -> Result<(), Rejection> {
        let Some(uncapture) = self.request.uncapture else {
            return Ok(());
        };
        let Retraction { src, dst, .. } = self.request;
        let (piece, target) = match uncapture {
            Uncapture::Piece(p) => (p, src),
            Uncapture::EnPassant => (Piece::Pawn, with_rank(src, dst.rank())),
        };
        if piece == Piece::Pawn && is_back_rank(target.rank()) {
            return Err(Rejection::UncapturePawnRank(target));
        }
        let victim = self.mover.inv();
        let units = Coord::iter()
            .filter(|&c| self.derived.get(c).color() == Some(victim))
            .count();
        if units >= 16 {
            return Err(Rejection::TooManyUnits(victim));
        }
        if self.derived.get(target).is_occupied() {
            return Err(Rejection::UncaptureOccupied(target));
        }
        self.derived.put(target, Cell::from_parts(victim, piece));
        if uncapture == Uncapture::EnPassant {
            self.derived.set_ep_source(Some(target));
        }
        self.derived.set_move_counter(0);
        Ok(())
    }

    /// Moves the rook back, if the king retracts from its castled square
    pub fn try_uncastle(&mut self) -> Result<(), Rejection> {
        let Retraction { src, dst, .. } = self.request;
        let rank = home_rank(self.mover);
        if self.piece != Piece::King
            || dst != Coord::from_parts(File::E, rank)
            || src.rank() != rank
        {
            return Ok(());
        }
        let side = match src.file() {
            File::G => CastlingSide::King,
            File::C => CastlingSide::Queen,
            _ => return Ok(()),
        };
        let (home, castled) = rook_files(side);
        let rook_src = Coord::from_parts(castled, rank);
        let rook_dst = Coord::from_parts(home, rank);
        if self.derived.get(rook_src) != Cell::from_parts(self.mover, Piece::Rook) {
            return Err(Rejection::UncastleNoRook(rook_src));
        }
        if self.derived.get(rook_dst).is_occupied() {
            return Err(Rejection::UncastleBlocked(rook_dst));
        }
        let rook = self.derived.remove(rook_src);
        self.derived.put(rook_dst, rook);
        let mut castling = self.derived.castling();
        castling.set(self.mover, side);
        self.derived.set_castling(castling);
        Ok(())
    }

    /// Verifies that the derived position is legal and that the forward move leads back to the
    /// current position
    ///
    /// Returns the forward move.
    pub fn check(&self) -> Result<Move, Rejection> {
        let Retraction {
            src,
            dst,
            unpromote,
            ..
        } = self.request;
        let expected = if unpromote { Some(self.piece) } else { None };
        let candidates = self.derived.legal_moves(dst, src)?;
        let mv = candidates
            .iter()
            .copied()
            .find(|mv| mv.kind().promote() == expected)
            .ok_or(Rejection::NoForwardMove)?;
        let replayed = self
            .derived
            .make_move(mv)
            .map_err(|_| Rejection::NoForwardMove)?;
        if Coord::iter().any(|c| replayed.get(c) != self.current.get(c)) {
            return Err(Rejection::Mismatch);
        }
        Ok(mv)
    }
}

/// Runs the whole retraction pipeline and returns the previous position
pub fn retract<P: Position>(position: &P, request: Retraction) -> Result<P, Rejection> {
    let mut ctx = RetroContext::new(request, position)?;
    ctx.try_uncapture()?;
    ctx.try_uncastle()?;
    ctx.check()?;
    Ok(ctx.into_derived())
}

/// Position which can be stepped backwards
///
/// A rejected retraction doesn't change the position.
#[derive(Debug, Clone)]
pub struct Retro<P> {
    position: P,
}

impl<P: Position> Retro<P> {
    pub fn new(position: P) -> Self {
        Retro { position }
    }

    #[inline]
    pub fn position(&self) -> &P {
        &self.position
    }

    #[inline]
    pub fn into_inner(self) -> P {
        self.position
    }

    pub fn retract(&mut self, request: Retraction) -> Result<&P, Rejection> {
        match retract(&self.position, request) {
            Ok(prev) => {
                debug!("retracted {}: {}", request, prev.as_fen());
                self.position = prev;
                Ok(&self.position)
            }
            Err(e) => {
                debug!("rejected {}: {}", request, e);
                Err(e)
            }
        }
    }
}
