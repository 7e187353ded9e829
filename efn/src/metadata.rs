//! Metadata suffix of EFN: move side, castling rights, enpassant and move counters

use crate::error::MetadataError;

use std::fmt;
use std::str::FromStr;

/// Side to move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn as_char(&self) -> char {
        match *self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn inv(&self) -> Side {
        match *self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Side, Self::Err> {
        match s {
            "w" => Ok(Side::White),
            "b" => Ok(Side::Black),
            _ => Err(MetadataError::BadSide(s.to_string())),
        }
    }
}

/// Castling flags as they are written in the notation
///
/// Only the orthodox flags `K`, `Q`, `k` and `q` are accepted, each at most once. The flags are
/// kept in the canonical `KQkq` order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingFlags(u8);

impl CastlingFlags {
    const ORDER: [char; 4] = ['K', 'Q', 'k', 'q'];

    pub const EMPTY: CastlingFlags = CastlingFlags(0);
    pub const FULL: CastlingFlags = CastlingFlags(15);

    fn bit(flag: char) -> Option<u8> {
        let idx = Self::ORDER.iter().position(|&c| c == flag)?;
        Some(1 << idx)
    }

    /// Returns `true` if flag `flag` (one of `KQkq`) is set
    pub fn has(&self, flag: char) -> bool {
        Self::bit(flag).map_or(false, |b| self.0 & b != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CastlingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.is_empty() {
            return write!(f, "-");
        }
        for c in Self::ORDER {
            if self.has(c) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingFlags {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<CastlingFlags, Self::Err> {
        if s == "-" {
            return Ok(CastlingFlags::EMPTY);
        }
        let mut res = 0_u8;
        for c in s.chars() {
            let bit = Self::bit(c).ok_or(MetadataError::BadCastling(c))?;
            if res & bit != 0 {
                return Err(MetadataError::DuplicateCastling(c));
            }
            res |= bit;
        }
        if res == 0 {
            return Err(MetadataError::NoCastling);
        }
        Ok(CastlingFlags(res))
    }
}

/// Fields following the board in EFN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metadata {
    /// Side to move
    pub side: Side,
    /// Castling rights
    pub castling: CastlingFlags,
    /// Enpassant target square, like `e3`
    pub enpassant: Option<String>,
    /// Number of half-moves without pawn moves or captures
    pub move_counter: u16,
    /// Move number
    pub move_number: u16,
}

impl Default for Metadata {
    fn default() -> Metadata {
        Metadata {
            side: Side::White,
            castling: CastlingFlags::EMPTY,
            enpassant: None,
            move_counter: 0,
            move_number: 1,
        }
    }
}

fn parse_enpassant(s: &str) -> Result<Option<String>, MetadataError> {
    if s == "-" {
        return Ok(None);
    }
    let mut chars = s.chars();
    let valid = chars.next().map_or(false, |c| c.is_ascii_lowercase())
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit());
    if !valid {
        return Err(MetadataError::BadEnpassant(s.to_string()));
    }
    Ok(Some(s.to_string()))
}

impl FromStr for Metadata {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Metadata, Self::Err> {
        type Error = MetadataError;

        let mut iter = s.split_whitespace().fuse();
        let side = Side::from_str(iter.next().unwrap_or(""))?;
        let castling = CastlingFlags::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let enpassant = parse_enpassant(iter.next().ok_or(Error::NoEnpassant)?)?;
        let move_counter = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::MoveCounter)?,
            None => 0,
        };
        let move_number = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::MoveNumber)?,
            None => 1,
        };

        let extra: Vec<&str> = iter.collect();
        if !extra.is_empty() {
            return Err(Error::ExtraData(extra.join(" ")));
        }

        Ok(Metadata {
            side,
            castling,
            enpassant,
            move_counter,
            move_number,
        })
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.side, self.castling)?;
        match &self.enpassant {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.move_counter, self.move_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full() {
        let meta = Metadata::from_str("b KQq e3 4 17").unwrap();
        assert_eq!(meta.side, Side::Black);
        assert!(meta.castling.has('K'));
        assert!(meta.castling.has('Q'));
        assert!(!meta.castling.has('k'));
        assert!(meta.castling.has('q'));
        assert_eq!(meta.enpassant.as_deref(), Some("e3"));
        assert_eq!(meta.move_counter, 4);
        assert_eq!(meta.move_number, 17);
        assert_eq!(meta.to_string(), "b KQq e3 4 17");
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            Metadata::from_str("w"),
            Err(MetadataError::NoCastling)
        );
        assert_eq!(
            Metadata::from_str("w KQkq"),
            Err(MetadataError::NoEnpassant)
        );
        let meta = Metadata::from_str("w - -").unwrap();
        assert_eq!(meta, Metadata::default());
        assert_eq!(meta.to_string(), "w - - 0 1");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Metadata::from_str("x - -"),
            Err(MetadataError::BadSide("x".to_string()))
        );
        assert_eq!(
            Metadata::from_str("w KK -"),
            Err(MetadataError::DuplicateCastling('K'))
        );
        assert_eq!(
            Metadata::from_str("w KX -"),
            Err(MetadataError::BadCastling('X'))
        );
        assert_eq!(
            Metadata::from_str("w - e"),
            Err(MetadataError::BadEnpassant("e".to_string()))
        );
        assert!(matches!(
            Metadata::from_str("w - - x"),
            Err(MetadataError::MoveCounter(_))
        ));
        assert_eq!(
            Metadata::from_str("w - - 0 1 extra"),
            Err(MetadataError::ExtraData("extra".to_string()))
        );
    }

    #[test]
    fn test_castling_order() {
        let flags = CastlingFlags::from_str("qkQK").unwrap();
        assert_eq!(flags, CastlingFlags::FULL);
        assert_eq!(flags.to_string(), "KQkq");
        assert_eq!(CastlingFlags::EMPTY.to_string(), "-");
    }
}
