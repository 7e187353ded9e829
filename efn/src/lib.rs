//! Extended Forsyth Notation (EFN)
//!
//! EFN is a superset of the board part of FEN, which is used to describe chess diagrams,
//! including fairy ones. In addition to the orthodox pieces, it supports:
//!
//! - arbitrary piece letters
//! - neutral pieces, marked with `-`
//! - rotated pieces, marked with `*N`, where `N` is the orientation digit
//! - free text on squares, either literal (`''text`) or a one-grapheme code (`'x`)
//! - boards of arbitrary dimensions, which can be inferred from the notation
//!
//! # Example
//!
//! ```
//! use retrochess_efn::{parse, Cell, Dimensions};
//!
//! let d = parse("rnbqkbnrpppppppp32PPPPPPPPRNBQKBNR").unwrap();
//! assert_eq!(d.dims(), Dimensions::ORTHODOX);
//! assert_eq!(d.get(0, 4), Some(&Cell::piece('k').unwrap()));
//! assert_eq!(d.to_efn().unwrap(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
//! ```

pub mod cell;
pub mod codec;
pub mod error;
pub mod glyph;
pub mod metadata;
pub mod pretty;
pub mod transform;
pub mod yacpdb;

pub use cell::{decode_cell, encode_cell, Cell, FreeText, PieceToken, TextKind};
pub use codec::{
    infer_dimensions, make_forsyth, normalize_spacing, parse, parse_efn, parse_efn_with,
    parse_with, Diagram, Dimensions, Efn, Spacing,
};
pub use error::{MetadataError, NotationError};
pub use glyph::{DefaultGlyphs, GlyphTable};
pub use metadata::{CastlingFlags, Metadata, Side};
pub use yacpdb::to_yacpdb;
