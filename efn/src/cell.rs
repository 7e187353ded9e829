//! Grammar of a single square
//!
//! A cell token is one of the following:
//!
//! - nothing, for an empty square (empty squares are counted by run lengths in the board notation)
//! - a piece letter, optionally prefixed with the neutral marker `-` and then with the
//!   rotation marker `*N`, where `N` is a single digit: `k`, `-k`, `*1k`, `-*3N`
//! - free text: `''text` is literal text which lasts until the end of its rank, and `'x` is a
//!   code consisting of exactly one grapheme cluster, which is resolved via a [`GlyphTable`]

use crate::error::NotationError;
use crate::glyph::GlyphTable;

use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

/// Marker for pieces which belong to neither side
pub const NEUTRAL_MARKER: char = '-';
/// Marker for rotated pieces, followed by the orientation digit
pub const ROTATION_MARKER: char = '*';
/// Marker for free text
pub const TEXT_MARKER: char = '\'';

/// Returns `true` if `c` cannot be used as a piece letter
#[inline]
pub fn is_reserved(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_whitespace()
        || matches!(c, '/' | NEUTRAL_MARKER | ROTATION_MARKER | TEXT_MARKER)
}

/// Piece standing on a square
///
/// The case of the letter encodes the side: uppercase letters belong to the first side,
/// lowercase ones to the second side. Neutral pieces belong to neither side, but still keep
/// the letter case they were written with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceToken {
    letter: char,
    neutral: bool,
    rotation: Option<u8>,
}

impl PieceToken {
    /// Creates a plain piece with letter `letter`
    pub fn new(letter: char) -> Result<PieceToken, NotationError> {
        if is_reserved(letter) {
            return Err(NotationError::UnexpectedChar {
                ch: letter,
                token: letter.to_string(),
            });
        }
        Ok(PieceToken {
            letter,
            neutral: false,
            rotation: None,
        })
    }

    /// Returns the same piece marked as neutral
    #[inline]
    pub fn neutral(self) -> PieceToken {
        PieceToken {
            neutral: true,
            ..self
        }
    }

    /// Returns the same piece rotated into orientation `digit`
    pub fn rotated(self, digit: u8) -> Result<PieceToken, NotationError> {
        if digit > 9 {
            return Err(NotationError::BadRotation(format!(
                "{}{}{}",
                ROTATION_MARKER, digit, self.letter
            )));
        }
        Ok(PieceToken {
            rotation: Some(digit),
            ..self
        })
    }

    /// Returns the same piece with a different letter
    pub(crate) fn with_letter(self, letter: char) -> PieceToken {
        PieceToken { letter, ..self }
    }

    #[inline]
    pub fn letter(&self) -> char {
        self.letter
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.neutral
    }

    #[inline]
    pub fn rotation(&self) -> Option<u8> {
        self.rotation
    }
}

impl fmt::Display for PieceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.neutral {
            write!(f, "{}", NEUTRAL_MARKER)?;
        }
        if let Some(d) = self.rotation {
            write!(f, "{}{}", ROTATION_MARKER, d)?;
        }
        write!(f, "{}", self.letter)
    }
}

/// Kind of free text
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextKind {
    /// Text taken verbatim (`''text`)
    Literal,
    /// Single grapheme resolved through a glyph table (`'x`)
    Code,
}

/// Free text annotation on a square
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FreeText {
    kind: TextKind,
    text: String,
}

impl FreeText {
    /// Creates literal text
    ///
    /// The text must be non-empty and must not contain separators or whitespace.
    pub fn literal(text: &str) -> Result<FreeText, NotationError> {
        if text.is_empty() {
            return Err(NotationError::EmptyText(format!("{0}{0}", TEXT_MARKER)));
        }
        if let Some(ch) = text.chars().find(|&c| c == '/' || c.is_whitespace()) {
            return Err(NotationError::UnexpectedChar {
                ch,
                token: text.to_string(),
            });
        }
        Ok(FreeText {
            kind: TextKind::Literal,
            text: text.to_string(),
        })
    }

    /// Creates a code from exactly one grapheme cluster
    pub fn code(code: &str) -> Result<FreeText, NotationError> {
        let mut graphemes = code.graphemes(true);
        let first = graphemes
            .next()
            .ok_or_else(|| NotationError::EmptyText(TEXT_MARKER.to_string()))?;
        if let Some(ch) = first
            .chars()
            .next()
            .filter(|&c| c == '/' || c == TEXT_MARKER || c.is_whitespace())
        {
            return Err(NotationError::UnexpectedChar {
                ch,
                token: code.to_string(),
            });
        }
        if graphemes.next().is_some() {
            return Err(NotationError::TrailingData {
                token: format!("{}{}", TEXT_MARKER, first),
                rest: code[first.len()..].to_string(),
            });
        }
        Ok(FreeText {
            kind: TextKind::Code,
            text: code.to_string(),
        })
    }

    #[inline]
    pub fn kind(&self) -> TextKind {
        self.kind
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the text to display on the square
    ///
    /// Literal text is returned as is. Codes are looked up in `table`, and the table's
    /// placeholder is used if the code is unknown.
    pub fn resolve<T: GlyphTable + ?Sized>(&self, table: &T) -> String {
        match self.kind {
            TextKind::Literal => self.text.clone(),
            TextKind::Code => table
                .lookup(&self.text)
                .unwrap_or_else(|| table.unknown())
                .to_string(),
        }
    }
}

impl fmt::Display for FreeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.kind {
            TextKind::Literal => write!(f, "{0}{0}{1}", TEXT_MARKER, self.text),
            TextKind::Code => write!(f, "{}{}", TEXT_MARKER, self.text),
        }
    }
}

/// Contents of a single square
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Piece(PieceToken),
    Text(FreeText),
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Creates a plain piece cell
    pub fn piece(letter: char) -> Result<Cell, NotationError> {
        Ok(Cell::Piece(PieceToken::new(letter)?))
    }
}

impl From<PieceToken> for Cell {
    fn from(p: PieceToken) -> Cell {
        Cell::Piece(p)
    }
}

impl From<FreeText> for Cell {
    fn from(t: FreeText) -> Cell {
        Cell::Text(t)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Cell::Empty => Ok(()),
            Cell::Piece(p) => p.fmt(f),
            Cell::Text(t) => t.fmt(f),
        }
    }
}

fn scan_text(s: &str) -> Result<(Cell, usize), NotationError> {
    let body = &s[TEXT_MARKER.len_utf8()..];
    if let Some(text) = body.strip_prefix(TEXT_MARKER) {
        if text.is_empty() {
            return Err(NotationError::EmptyText(s.to_string()));
        }
        return Ok((Cell::Text(FreeText::literal(text)?), s.len()));
    }
    let code = body
        .graphemes(true)
        .next()
        .ok_or_else(|| NotationError::EmptyText(s.to_string()))?;
    let len = TEXT_MARKER.len_utf8() + code.len();
    Ok((Cell::Text(FreeText::code(code)?), len))
}

/// Scans one non-empty cell token from the beginning of `s`
///
/// Returns the cell and the length of its token in bytes. Literal text consumes the whole
/// remainder of `s`, so `s` must not extend past the end of the rank.
pub(crate) fn scan(s: &str) -> Result<(Cell, usize), NotationError> {
    if s.starts_with(TEXT_MARKER) {
        return scan_text(s);
    }

    let mut rest = s;
    let neutral = match rest.strip_prefix(NEUTRAL_MARKER) {
        Some(r) => {
            rest = r;
            true
        }
        None => false,
    };
    let rotation = match rest.strip_prefix(ROTATION_MARKER) {
        Some(r) => {
            let digit = r
                .chars()
                .next()
                .and_then(|c| c.to_digit(10))
                .ok_or_else(|| NotationError::BadRotation(s.to_string()))?;
            rest = &r[1..];
            Some(digit as u8)
        }
        None => None,
    };

    let letter = match rest.chars().next() {
        Some(c) if !is_reserved(c) => c,
        Some(c) if neutral || rotation.is_some() => {
            return Err(NotationError::MissingPiece(format!(
                "{}{}",
                &s[..s.len() - rest.len()],
                c
            )))
        }
        Some(c) => {
            return Err(NotationError::UnexpectedChar {
                ch: c,
                token: s.to_string(),
            })
        }
        None => return Err(NotationError::MissingPiece(s.to_string())),
    };

    let len = s.len() - rest.len() + letter.len_utf8();
    Ok((
        Cell::Piece(PieceToken {
            letter,
            neutral,
            rotation,
        }),
        len,
    ))
}

/// Decodes a single cell token
///
/// An empty string decodes into [`Cell::Empty`]. Any data after a complete token is an error.
pub fn decode_cell(token: &str) -> Result<Cell, NotationError> {
    if token.is_empty() {
        return Ok(Cell::Empty);
    }
    let (cell, len) = scan(token)?;
    if len != token.len() {
        return Err(NotationError::TrailingData {
            token: token[..len].to_string(),
            rest: token[len..].to_string(),
        });
    }
    Ok(cell)
}

/// Encodes a single cell into its token
///
/// Does the same as `cell.to_string()`.
#[inline]
pub fn encode_cell(cell: &Cell) -> String {
    cell.to_string()
}

impl FromStr for Cell {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Cell, Self::Err> {
        decode_cell(s)
    }
}
