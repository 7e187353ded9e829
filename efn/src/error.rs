use std::num::ParseIntError;

use thiserror::Error;

/// Error parsing the metadata suffix of EFN (the fields after the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MetadataError {
    /// Move side is neither `w` nor `b`
    #[error("bad move side {0:?}")]
    BadSide(String),
    /// Castling rights field is missing
    #[error("no castling rights")]
    NoCastling,
    /// Unexpected char in castling rights
    #[error("unexpected castling char {0:?}")]
    BadCastling(char),
    /// Castling flag is specified twice
    #[error("duplicate castling char {0:?}")]
    DuplicateCastling(char),
    /// Enpassant field is missing
    #[error("no enpassant")]
    NoEnpassant,
    /// Enpassant field is neither `-` nor a square
    #[error("bad enpassant square {0:?}")]
    BadEnpassant(String),
    /// Error parsing move counter
    #[error("bad move counter: {0}")]
    MoveCounter(ParseIntError),
    /// Error parsing move number
    #[error("bad move number: {0}")]
    MoveNumber(ParseIntError),
    /// Metadata contains extra fields
    #[error("extra data {0:?}")]
    ExtraData(String),
}

/// Error decoding or encoding Extended Forsyth Notation
///
/// Each variant carries the offending piece of notation, so the caller can point the user
/// at it. The codec never tries to repair the input.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum NotationError {
    /// Character which cannot start a cell token
    #[error("unexpected char {ch:?} in {token:?}")]
    UnexpectedChar { ch: char, token: String },
    /// Rotation marker `*` is not followed by a digit
    #[error("rotation marker without digit in {0:?}")]
    BadRotation(String),
    /// Neutral or rotation prefix is not followed by a piece letter
    #[error("prefix without piece in {0:?}")]
    MissingPiece(String),
    /// Nothing follows a free text quote
    #[error("empty free text in {0:?}")]
    EmptyText(String),
    /// A single cell token was expected, but more data follows
    #[error("trailing data {rest:?} after cell token {token:?}")]
    TrailingData { token: String, rest: String },
    /// Literal text swallows the rest of its row, so nothing may follow it
    #[error("literal text {text:?} is not the last item in row {row}")]
    TextNotLast { text: String, row: usize },
    /// Too many items in a row
    #[error("too many items in row {row}: {content:?} is wider than {width}")]
    RowOverflow {
        row: usize,
        width: usize,
        content: String,
    },
    /// More rows than the height allows
    #[error("too many rows: {rows} rows exceed height {height}")]
    TooManyRows { rows: usize, height: usize },
    /// Notation without row separators holds more cells than the board
    #[error("too many cells: {cells} cells exceed {width}x{height}")]
    TooManyCells {
        cells: usize,
        width: usize,
        height: usize,
    },
    /// Number of cells doesn't match the dimensions
    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },
    /// Zero width or height
    #[error("bad dimensions {width}x{height}")]
    BadDimensions { width: usize, height: usize },
    /// Dimensions are not given and cannot be inferred
    #[error("cannot infer dimensions of {0:?}")]
    NoDimensions(String),
    /// Error in the metadata suffix
    #[error("bad metadata: {0}")]
    Metadata(#[from] MetadataError),
}
