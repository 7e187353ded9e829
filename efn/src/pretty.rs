//! Plain text rendering of diagrams for terminals

use crate::cell::Cell;
use crate::codec::Diagram;
use crate::glyph::GlyphTable;

use std::fmt::{self, Display};

/// Wrapper to pretty-print the diagram
///
/// See docs for [`Diagram::pretty()`] for more details.
pub struct Pretty<'a, T: ?Sized> {
    diagram: &'a Diagram,
    table: &'a T,
}

impl Diagram {
    /// Wraps the diagram to allow pretty-printing, resolving free text codes via `table`
    ///
    /// Rows are labelled by numbers from the bottom, and columns are labelled by letters.
    /// Empty squares are shown as `.`, pieces as their letters without markers, literal text
    /// as is.
    ///
    /// # Example
    ///
    /// ```
    /// # use retrochess_efn::{parse, DefaultGlyphs};
    /// let d = parse("k'a/1K").unwrap();
    /// let res = r#"
    /// 2|kａ
    /// 1|.K
    /// -+--
    ///  |ab
    /// "#;
    /// assert_eq!(d.pretty(&DefaultGlyphs).to_string().trim(), res.trim());
    /// ```
    pub fn pretty<'a, T: GlyphTable + ?Sized>(&'a self, table: &'a T) -> Pretty<'a, T> {
        Pretty {
            diagram: self,
            table,
        }
    }
}

fn column_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|&i| i < 26)
        .map_or('?', |i| char::from(b'a' + i))
}

impl<'a, T: GlyphTable + ?Sized> Display for Pretty<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let height = self.diagram.height();
        let label_width = height.to_string().len();
        for (index, row) in self.diagram.rows().enumerate() {
            write!(f, "{:>w$}|", height - index, w = label_width)?;
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, ".")?,
                    Cell::Piece(p) => write!(f, "{}", p.letter())?,
                    Cell::Text(t) => write!(f, "{}", t.resolve(self.table))?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "{}+", "-".repeat(label_width))?;
        for _ in 0..self.diagram.width() {
            write!(f, "-")?;
        }
        writeln!(f)?;
        write!(f, "{}|", " ".repeat(label_width))?;
        for col in 0..self.diagram.width() {
            write!(f, "{}", column_label(col))?;
        }
        writeln!(f)?;
        Ok(())
    }
}
