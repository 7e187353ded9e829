//! Export into the notation of [YACPDB](https://www.yacpdb.org/), the chess problem database
//!
//! The export is one-way: free text has no counterpart in YACPDB and is dropped.

use crate::cell::{Cell, PieceToken};
use crate::codec::{self, Diagram};

fn letter(c: char) -> char {
    match c {
        'N' => 'S',
        'n' => 's',
        _ => c,
    }
}

fn piece(p: &PieceToken) -> String {
    let l = letter(p.letter());
    match (p.is_neutral(), p.rotation()) {
        (false, None) => l.to_string(),
        (true, None) => format!("(!{})", l),
        (false, Some(d)) => format!("({}{})", l, d),
        (true, Some(d)) => format!("(!{}{})", l, d),
    }
}

/// Converts one cell into YACPDB
///
/// Knights are written as `S`, the other orthodox letters are kept, as well as fairy letters.
/// Returns an empty string for empty cells and free text.
pub fn to_yacpdb(cell: &Cell) -> String {
    match cell {
        Cell::Piece(p) => piece(p),
        Cell::Empty | Cell::Text(_) => String::new(),
    }
}

impl Diagram {
    /// Converts the whole board into YACPDB
    ///
    /// Rows and runs of empty squares are written as in EFN. Squares with free text are counted
    /// as empty.
    pub fn to_yacpdb(&self) -> String {
        let mut res = String::new();
        for (index, row) in self.rows().enumerate() {
            if index != 0 {
                res.push('/');
            }
            codec::write_runs(&mut res, row, true, |cell| {
                Some(to_yacpdb(cell)).filter(|t| !t.is_empty())
            });
        }
        res
    }
}
