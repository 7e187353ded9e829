//! Conversion between chess positions and EFN diagrams

use crate::position::Position;

use owlchess::board::{FenParseError, RawBoard};
use owlchess::{Coord, File, Rank};

use retrochess_efn::{self as efn, Dimensions, Efn, NotationError};
use thiserror::Error;

/// Error converting an EFN diagram into a chess position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum DiagramError {
    /// Diagram is not an 8x8 board
    #[error("expected 8x8 board, found {width}x{height}")]
    Dimensions { width: usize, height: usize },
    /// Square contains something other than an orthodox piece
    #[error("unsupported content {content:?} on {coord}")]
    UnsupportedCell { coord: Coord, content: String },
    /// Diagram cannot be encoded
    #[error("bad notation: {0}")]
    Notation(#[from] NotationError),
    /// Resulting position is not a legal one
    #[error("bad position: {0}")]
    Position(#[from] FenParseError),
}

/// Returns the diagram of the position, with the metadata taken from the position
pub fn position_efn<P: Position>(position: &P) -> Result<Efn, NotationError> {
    efn::parse_efn_with(&position.as_fen(), Dimensions::ORTHODOX)
}

/// Builds a chess position from the EFN diagram
///
/// Only the orthodox piece letters are allowed. If the diagram has no metadata, White is to move,
/// and no castling or enpassant is possible.
pub fn from_efn<P: Position>(diagram: &Efn) -> Result<P, DiagramError> {
    let d = &diagram.diagram;
    if d.dims() != Dimensions::ORTHODOX {
        return Err(DiagramError::Dimensions {
            width: d.width(),
            height: d.height(),
        });
    }
    for (rank, row) in Rank::iter().zip(d.rows()) {
        for (file, cell) in File::iter().zip(row) {
            let plain = match cell {
                efn::Cell::Empty => true,
                efn::Cell::Piece(p) => {
                    !p.is_neutral()
                        && p.rotation().is_none()
                        && owlchess::Cell::from_char(p.letter())
                            .map_or(false, |c| c.is_occupied())
                }
                efn::Cell::Text(_) => false,
            };
            if !plain {
                return Err(DiagramError::UnsupportedCell {
                    coord: Coord::from_parts(file, rank),
                    content: cell.to_string(),
                });
            }
        }
    }
    let meta = diagram.metadata.clone().unwrap_or_default();
    let fen = format!("{} {}", d.to_efn()?, meta);
    Ok(P::from_fen(&fen)?)
}

/// Same as [`from_efn()`], but for the shipped position type
pub fn raw_board_from_efn(diagram: &Efn) -> Result<RawBoard, DiagramError> {
    from_efn(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owlchess::board::ValidateError;
    use owlchess::Color;

    #[test]
    fn test_round_trip() {
        let raw = RawBoard::initial();
        let diagram = position_efn(&raw).unwrap();
        assert_eq!(diagram.diagram.dims(), Dimensions::ORTHODOX);
        assert_eq!(
            diagram.metadata.as_ref().map(|m| m.to_string()),
            Some("w KQkq - 0 1".to_string())
        );
        assert_eq!(raw_board_from_efn(&diagram), Ok(raw));
    }

    #[test]
    fn test_no_metadata() {
        let diagram = efn::parse_efn("rnbqkbnrpppppppp32PPPPPPPPRNBQKBNR").unwrap();
        let raw = raw_board_from_efn(&diagram).unwrap();
        assert_eq!(raw.side, Color::White);
        assert_eq!(
            raw.as_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
    }

    #[test]
    fn test_errors() {
        let diagram = efn::parse_efn("k6K/8/8/8/8/8/8/-*1N7").unwrap();
        assert_eq!(
            raw_board_from_efn(&diagram),
            Err(DiagramError::UnsupportedCell {
                coord: Coord::from_parts(File::A, Rank::R1),
                content: "-*1N".to_string(),
            })
        );

        let diagram = efn::parse_efn("k6K/8/8/8/8/8/8/Z7").unwrap();
        assert!(matches!(
            raw_board_from_efn(&diagram),
            Err(DiagramError::UnsupportedCell { .. })
        ));

        let diagram = efn::parse_efn("k6K/8/8/8/8/8/8/R7 w - - 0 1").unwrap();
        assert_eq!(
            raw_board_from_efn(&diagram),
            Err(DiagramError::Position(FenParseError::Valid(
                ValidateError::OpponentKingAttacked
            )))
        );

        let diagram = efn::parse_efn("k2/3/2K").unwrap();
        assert_eq!(
            raw_board_from_efn(&diagram),
            Err(DiagramError::Dimensions {
                width: 3,
                height: 3
            })
        );
    }
}
