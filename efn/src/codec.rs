//! Encoding and decoding of the board part of EFN
//!
//! Board part consists of rows separated by `/`, from top to bottom. Consecutive empty squares
//! are written as their decimal count, and all the other cells are written as their tokens
//! (see [`cell`](crate::cell)).
//!
//! The notation may omit the separators altogether. In this case, the rows are reconstructed
//! from the width of the board, and a run of empty squares may span several rows. Rows which
//! are shorter than the width are padded with empty squares on the right, and missing rows at
//! the bottom are padded with empty rows.
//!
//! A row which ends with literal free text (`''text`) never has a trailing run, as the text
//! would swallow it. Such a row may be shorter than the board.

use crate::cell::{self, Cell, TextKind};
use crate::error::NotationError;
use crate::metadata::Metadata;

use std::str::FromStr;

use log::trace;

/// Size of the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    /// Dimensions of the orthodox chess board
    pub const ORTHODOX: Dimensions = Dimensions {
        width: 8,
        height: 8,
    };

    /// Creates dimensions, rejecting zero width or height
    pub fn new(width: usize, height: usize) -> Result<Dimensions, NotationError> {
        if width == 0 || height == 0 {
            return Err(NotationError::BadDimensions { width, height });
        }
        Ok(Dimensions { width, height })
    }

    /// Returns the number of cells on the board
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Interpretation of digit runs
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Spacing {
    /// The whole run is one decimal number (`12` means twelve empty squares)
    Decimal,
    /// Each digit is a separate count (`12` means three empty squares)
    PerDigit,
}

impl Spacing {
    fn run_len(self, digits: &str) -> Option<usize> {
        match self {
            Spacing::Decimal => usize::from_str(digits).ok(),
            Spacing::PerDigit => digits
                .bytes()
                .try_fold(0_usize, |acc, b| acc.checked_add(usize::from(b - b'0'))),
        }
    }
}

enum Token<'a> {
    Run(&'a str),
    Cell(Cell),
}

struct Row<'a> {
    raw: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Row<'a> {
    fn width(&self, spacing: Spacing) -> Option<usize> {
        self.tokens.iter().try_fold(0_usize, |acc, tok| match tok {
            Token::Run(digits) => acc.checked_add(spacing.run_len(digits)?),
            Token::Cell(_) => acc.checked_add(1),
        })
    }

    fn ends_with_literal(&self) -> bool {
        matches!(
            self.tokens.last(),
            Some(Token::Cell(Cell::Text(t))) if t.kind() == TextKind::Literal
        )
    }
}

fn lex_row(raw: &str) -> Result<Row<'_>, NotationError> {
    let mut tokens = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let len = if digits != 0 {
            tokens.push(Token::Run(&rest[..digits]));
            digits
        } else {
            let (cell, len) = cell::scan(rest)?;
            tokens.push(Token::Cell(cell));
            len
        };
        rest = &rest[len..];
    }
    Ok(Row { raw, tokens })
}

fn lex(board: &str) -> Result<Vec<Row<'_>>, NotationError> {
    board.split('/').map(lex_row).collect()
}

fn isqrt(n: usize) -> usize {
    // Invariant: lo * lo <= n, and the root is in lo..=hi
    let (mut lo, mut hi) = (0_usize, n);
    while lo < hi {
        let mid = hi - (hi - lo) / 2;
        if mid.checked_mul(mid).map_or(false, |sq| sq <= n) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Infers the dimensions from the widths of `rows`
///
/// If `incomplete` is `false`, all the rows must have the same width, except the rows ending
/// with literal text, which may be shorter. Otherwise, the widest row gives the width, and a
/// board with fewer rows than its width is considered square.
fn infer(rows: &[Row<'_>], spacing: Spacing, incomplete: bool) -> Option<Dimensions> {
    if let [row] = rows {
        let total = row.width(spacing)?;
        if total == 0 {
            return None;
        }
        let side = isqrt(total);
        if side * side == total {
            return Some(Dimensions {
                width: side,
                height: side,
            });
        }
        return Some(Dimensions {
            width: total,
            height: 1,
        });
    }

    let mut width = 0_usize;
    let mut exact = None;
    for row in rows {
        let w = row.width(spacing)?;
        width = width.max(w);
        if incomplete || row.ends_with_literal() {
            continue;
        }
        match exact {
            Some(e) if e != w => return None,
            _ => exact = Some(w),
        }
    }
    if width == 0 {
        return None;
    }
    if incomplete {
        let height = rows.len().max(width);
        width.checked_mul(height)?;
        return Some(Dimensions { width, height });
    }
    (exact == Some(width)).then_some(Dimensions {
        width,
        height: rows.len(),
    })
}

/// Chooses the spacing system and the dimensions to decode `rows` with
///
/// Decimal spacing is preferred. Without `dims`, the rows of the same width are preferred over
/// the incomplete ones, regardless of the spacing.
fn detect(rows: &[Row<'_>], dims: Option<Dimensions>) -> Option<(Spacing, Dimensions)> {
    const ALL: [Spacing; 2] = [Spacing::Decimal, Spacing::PerDigit];
    match dims {
        Some(d) => ALL
            .into_iter()
            .find(|&spacing| fits(rows, spacing, d))
            .map(|spacing| (spacing, d)),
        None => ALL
            .into_iter()
            .find_map(|spacing| Some((spacing, infer(rows, spacing, false)?)))
            .or_else(|| Some((Spacing::Decimal, infer(rows, Spacing::Decimal, true)?))),
    }
}

fn fits(rows: &[Row<'_>], spacing: Spacing, dims: Dimensions) -> bool {
    if let [row] = rows {
        return row.width(spacing).map_or(false, |w| w <= dims.area());
    }
    rows.len() <= dims.height
        && rows
            .iter()
            .all(|row| row.width(spacing).map_or(false, |w| w <= dims.width))
}

fn expand(rows: Vec<Row<'_>>, spacing: Spacing, dims: Dimensions) -> Result<Vec<Cell>, NotationError> {
    let Dimensions { width, height } = dims;
    let area = dims.area();
    let mut cells = Vec::with_capacity(area);

    if rows.len() == 1 {
        for row in rows {
            for tok in row.tokens {
                let add = match &tok {
                    Token::Run(digits) => spacing.run_len(digits),
                    Token::Cell(_) => Some(1),
                };
                let total = add.and_then(|a| a.checked_add(cells.len())).unwrap_or(usize::MAX);
                if total > area {
                    return Err(NotationError::TooManyCells {
                        cells: total,
                        width,
                        height,
                    });
                }
                match tok {
                    Token::Run(_) => cells.resize(total, Cell::Empty),
                    Token::Cell(c) => cells.push(c),
                }
            }
        }
        cells.resize(area, Cell::Empty);
        return Ok(cells);
    }

    if rows.len() > height {
        return Err(NotationError::TooManyRows {
            rows: rows.len(),
            height,
        });
    }
    for (index, row) in rows.into_iter().enumerate() {
        let start = cells.len();
        let overflow = || NotationError::RowOverflow {
            row: index,
            width,
            content: row.raw.to_string(),
        };
        for tok in row.tokens {
            let filled = cells.len() - start;
            match tok {
                Token::Run(digits) => {
                    let total = spacing
                        .run_len(digits)
                        .and_then(|n| n.checked_add(filled))
                        .filter(|&t| t <= width)
                        .ok_or_else(overflow)?;
                    cells.resize(start + total, Cell::Empty);
                }
                Token::Cell(c) => {
                    if filled >= width {
                        return Err(overflow());
                    }
                    cells.push(c);
                }
            }
        }
        cells.resize(start + width, Cell::Empty);
    }
    cells.resize(area, Cell::Empty);
    Ok(cells)
}

fn split_notation(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((board, meta)) => (board, Some(meta.trim_start())),
        None => (text, None),
    }
}

/// Writes `row`, replacing each run of squares without a token by its length
///
/// `token` returns the text for a square, or `None` if the square counts as empty. The run at
/// the end of the row is written only if `trailing` is `true`.
pub(crate) fn write_runs<F>(out: &mut String, row: &[Cell], trailing: bool, mut token: F)
where
    F: FnMut(&Cell) -> Option<String>,
{
    let mut empty = 0_usize;
    for cell in row {
        let Some(text) = token(cell) else {
            empty += 1;
            continue;
        };
        if empty != 0 {
            out.push_str(&empty.to_string());
            empty = 0;
        }
        out.push_str(&text);
    }
    if empty != 0 && trailing {
        out.push_str(&empty.to_string());
    }
}

fn write_row(out: &mut String, row: &[Cell], index: usize) -> Result<(), NotationError> {
    let last = row.iter().rposition(|c| !c.is_empty());
    for (i, cell) in row.iter().enumerate() {
        if let Cell::Text(t) = cell {
            if t.kind() == TextKind::Literal && Some(i) != last {
                return Err(NotationError::TextNotLast {
                    text: t.as_str().to_string(),
                    row: index,
                });
            }
        }
    }
    let ends_with_literal = matches!(
        last.map(|i| &row[i]),
        Some(Cell::Text(t)) if t.kind() == TextKind::Literal
    );
    write_runs(out, row, !ends_with_literal, |c| {
        (!c.is_empty()).then(|| c.to_string())
    });
    Ok(())
}

/// Encodes `cells` of a board with dimensions `dims` into the board part of EFN
///
/// The output always uses row separators and decimal run lengths.
pub fn make_forsyth(cells: &[Cell], dims: Dimensions) -> Result<String, NotationError> {
    if cells.len() != dims.area() || dims.width == 0 {
        return Err(NotationError::CellCount {
            expected: dims.area(),
            found: cells.len(),
        });
    }
    let mut res = String::new();
    for (index, row) in cells.chunks(dims.width).enumerate() {
        if index != 0 {
            res.push('/');
        }
        write_row(&mut res, row, index)?;
    }
    Ok(res)
}

/// Board with arbitrary dimensions, where each square contains a [`Cell`]
///
/// Cells are stored row by row, starting from the top row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagram {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Diagram {
    /// Creates an empty diagram
    pub fn empty(dims: Dimensions) -> Diagram {
        Diagram {
            dims,
            cells: vec![Cell::Empty; dims.area()],
        }
    }

    /// Creates a diagram from its cells
    pub fn from_cells(dims: Dimensions, cells: Vec<Cell>) -> Result<Diagram, NotationError> {
        let dims = Dimensions::new(dims.width, dims.height)?;
        if cells.len() != dims.area() {
            return Err(NotationError::CellCount {
                expected: dims.area(),
                found: cells.len(),
            });
        }
        Ok(Diagram { dims, cells })
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Returns the cell in row `row` (counting from the top) and column `col`
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.dims.height || col >= self.dims.width {
            return None;
        }
        self.cells.get(row * self.dims.width + col)
    }

    /// Puts `cell` into row `row` and column `col`, returning the previous contents
    ///
    /// Returns `None` and does nothing if the square is outside of the board.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Option<Cell> {
        if row >= self.dims.height || col >= self.dims.width {
            return None;
        }
        let slot = &mut self.cells[row * self.dims.width + col];
        Some(std::mem::replace(slot, cell))
    }

    /// Iterates over the rows, from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.dims.width)
    }

    /// Encodes the diagram into the board part of EFN
    ///
    /// Fails only if literal text is followed by other pieces, as such a row cannot be
    /// represented.
    pub fn to_efn(&self) -> Result<String, NotationError> {
        make_forsyth(&self.cells, self.dims)
    }
}

/// Decoded EFN: the board and the optional metadata suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Efn {
    pub diagram: Diagram,
    pub metadata: Option<Metadata>,
}

impl Efn {
    /// Encodes back into EFN, with the metadata suffix if present
    pub fn to_efn(&self) -> Result<String, NotationError> {
        let mut res = self.diagram.to_efn()?;
        if let Some(meta) = &self.metadata {
            res.push(' ');
            res.push_str(&meta.to_string());
        }
        Ok(res)
    }
}

fn parse_meta(meta: Option<&str>) -> Result<Option<Metadata>, NotationError> {
    match meta {
        Some(m) => Ok(Some(Metadata::from_str(m)?)),
        None => Ok(None),
    }
}

/// Infers the dimensions of the board written in `text`
///
/// If `text` contains row separators, the height is the number of rows, and the rows must have
/// the same non-zero width. Rows ending with literal text may be shorter. If the rows are
/// incomplete (i.e. some of them are shorter than the others), the widest row gives the width,
/// and the missing rows are added at the bottom if there are fewer rows than columns. So,
/// `rnbqk/pppppppp/////PPPPPPPP` is an 8x8 board.
///
/// Without separators, the number of cells must be either a perfect square (the board is then
/// square) or the notation is considered to be a single row.
///
/// Returns `None` if the notation is malformed or has no squares at all.
pub fn infer_dimensions(text: &str) -> Option<Dimensions> {
    let (board, _) = split_notation(text);
    let rows = lex(board).ok()?;
    infer(&rows, Spacing::Decimal, false).or_else(|| infer(&rows, Spacing::Decimal, true))
}

/// Decodes EFN with dimensions `dims`, together with the metadata
pub fn parse_efn_with(text: &str, dims: Dimensions) -> Result<Efn, NotationError> {
    let dims = Dimensions::new(dims.width, dims.height)?;
    let (board, meta) = split_notation(text);
    let cells = expand(lex(board)?, Spacing::Decimal, dims)?;
    Ok(Efn {
        diagram: Diagram { dims, cells },
        metadata: parse_meta(meta)?,
    })
}

/// Decodes EFN with inferred dimensions, together with the metadata
///
/// The spacing system is detected the same way as [`normalize_spacing()`] does, so per-digit
/// run lengths are accepted when only they make the rows equally wide.
pub fn parse_efn(text: &str) -> Result<Efn, NotationError> {
    let (board, meta) = split_notation(text);
    let rows = lex(board)?;
    let (spacing, dims) =
        detect(&rows, None).ok_or_else(|| NotationError::NoDimensions(board.to_string()))?;
    let cells = expand(rows, spacing, dims)?;
    Ok(Efn {
        diagram: Diagram { dims, cells },
        metadata: parse_meta(meta)?,
    })
}

/// Decodes the board from EFN with dimensions `dims`
///
/// The metadata suffix, if present, is validated and dropped.
pub fn parse_with(text: &str, dims: Dimensions) -> Result<Diagram, NotationError> {
    Ok(parse_efn_with(text, dims)?.diagram)
}

/// Decodes the board from EFN, inferring its dimensions
///
/// The metadata suffix, if present, is validated and dropped.
pub fn parse(text: &str) -> Result<Diagram, NotationError> {
    Ok(parse_efn(text)?.diagram)
}

/// Detects the spacing system used in `text` and rewrites it into the canonical form
///
/// Some sources write runs of empty squares digit by digit, so `35` on an eight-wide board means
/// three empty squares followed by five. Decimal interpretation is preferred; per-digit one is
/// chosen only if the decimal one doesn't fit into `dims`. If `dims` is `None`, per-digit one is
/// chosen only if it makes the rows equally wide and the decimal one doesn't.
///
/// The board part of the result is canonical: rows are separated, incomplete rows are padded,
/// and run lengths are decimal. The metadata suffix is kept as is. For any board-only `s` which
/// can be parsed, `parse(s)?.to_efn()? == normalize_spacing(s, None)?`.
pub fn normalize_spacing(text: &str, dims: Option<Dimensions>) -> Result<String, NotationError> {
    let (board, meta) = split_notation(text);
    let rows = lex(board)?;

    let (spacing, dims) =
        detect(&rows, dims).ok_or_else(|| NotationError::NoDimensions(board.to_string()))?;
    trace!(
        "normalize_spacing: {:?} detected as {:?} on {}x{}",
        board,
        spacing,
        dims.width,
        dims.height
    );

    let dims = Dimensions::new(dims.width, dims.height)?;
    let cells = expand(rows, spacing, dims)?;
    let mut res = make_forsyth(&cells, dims)?;
    if let Some(m) = meta {
        res.push(' ');
        res.push_str(m);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{decode_cell, FreeText};
    use crate::metadata::Side;

    const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn initial_cells() -> Vec<Cell> {
        let mut res = Vec::new();
        for c in "rnbqkbnr".chars() {
            res.push(Cell::piece(c).unwrap());
        }
        res.extend((0..8).map(|_| Cell::piece('p').unwrap()));
        res.extend((0..32).map(|_| Cell::Empty));
        res.extend((0..8).map(|_| Cell::piece('P').unwrap()));
        for c in "RNBQKBNR".chars() {
            res.push(Cell::piece(c).unwrap());
        }
        res
    }

    #[test]
    fn test_initial() {
        let d = parse(INITIAL).unwrap();
        assert_eq!(d.dims(), Dimensions::ORTHODOX);
        assert_eq!(d.cells(), &initial_cells()[..]);
        assert_eq!(d.to_efn().unwrap(), INITIAL);

        let d = parse_with(INITIAL, Dimensions::ORTHODOX).unwrap();
        assert_eq!(d.cells(), &initial_cells()[..]);
    }

    #[test]
    fn test_no_slashes() {
        const TEXT: &str = "rnbqkbnrpppppppp32PPPPPPPPRNBQKBNR";
        assert_eq!(infer_dimensions(TEXT), Some(Dimensions::ORTHODOX));
        let d = parse(TEXT).unwrap();
        assert_eq!(d.cells(), &initial_cells()[..]);
        let d = parse_with(TEXT, Dimensions::ORTHODOX).unwrap();
        assert_eq!(d.cells(), &initial_cells()[..]);
        assert_eq!(d.to_efn().unwrap(), INITIAL);
    }

    #[test]
    fn test_incomplete_rows() {
        const TEXT: &str = "rnbqk/pppppppp/////PPPPPPPP";
        let mut row = Vec::new();
        for c in "rnbqk".chars() {
            row.push(Cell::piece(c).unwrap());
        }
        row.extend((0..3).map(|_| Cell::Empty));

        let d = parse_with(TEXT, Dimensions::ORTHODOX).unwrap();
        assert_eq!(d.rows().next().unwrap(), &row[..]);
        assert_eq!(d.cells().len(), 64);
        assert_eq!(d.get(6, 0), Some(&Cell::piece('P').unwrap()));
        assert!(d.rows().nth(7).unwrap().iter().all(Cell::is_empty));
        assert_eq!(d.to_efn().unwrap(), "rnbqk3/pppppppp/8/8/8/8/PPPPPPPP/8");

        assert_eq!(infer_dimensions(TEXT), Some(Dimensions::ORTHODOX));
        assert_eq!(parse(TEXT), Ok(d));
        assert_eq!(
            normalize_spacing(TEXT, None).unwrap(),
            "rnbqk3/pppppppp/8/8/8/8/PPPPPPPP/8"
        );

        let d = parse("k/8/8").unwrap();
        assert_eq!(d.dims(), Dimensions::ORTHODOX);
        assert_eq!(d.to_efn().unwrap(), "k7/8/8/8/8/8/8/8");
        let d = parse("1/1/1/k2").unwrap();
        assert_eq!(d.dims(), Dimensions::new(3, 4).unwrap());
    }

    #[test]
    fn test_free_text() {
        let text = "rnbqkbnr/pp2'👩🏽‍⚖️ppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
        let d = parse(text).unwrap();
        assert_eq!(d.dims(), Dimensions::ORTHODOX);
        assert_eq!(
            d.get(1, 4),
            Some(&Cell::Text(FreeText::code("👩🏽‍⚖️").unwrap()))
        );
        assert_eq!(d.get(1, 5), Some(&Cell::piece('p').unwrap()));
        assert_eq!(d.to_efn().unwrap(), text);

        let d = parse_with("7''12/8", Dimensions::new(8, 2).unwrap()).unwrap();
        assert_eq!(d.get(0, 7), Some(&decode_cell("''12").unwrap()));
        assert!(d.rows().nth(1).unwrap().iter().all(Cell::is_empty));
        assert_eq!(d.to_efn().unwrap(), "7''12/8");

        let d = parse_with("''long/8", Dimensions::new(8, 2).unwrap()).unwrap();
        assert_eq!(d.get(0, 0), Some(&decode_cell("''long").unwrap()));
        assert_eq!(d.to_efn().unwrap(), "''long/8");
    }

    #[test]
    fn test_literal_row_end() {
        // The text swallows the trailing run, so the row is shorter than the board
        let mut d = Diagram::empty(Dimensions::new(8, 3).unwrap());
        d.set(0, 0, decode_cell("''long").unwrap());
        d.set(1, 2, decode_cell("''note").unwrap());
        d.set(2, 7, Cell::piece('K').unwrap());
        let text = d.to_efn().unwrap();
        assert_eq!(text, "''long/2''note/7K");
        assert_eq!(infer_dimensions(&text), Some(d.dims()));
        assert_eq!(parse(&text).as_ref(), Ok(&d));
        assert_eq!(normalize_spacing(&text, None).unwrap(), text);

        let d = parse("''long/8").unwrap();
        assert_eq!(d.dims(), Dimensions::new(8, 2).unwrap());
        assert_eq!(parse(&d.to_efn().unwrap()), Ok(d));

        assert_eq!(
            infer_dimensions("4''abc/5"),
            Some(Dimensions {
                width: 5,
                height: 2
            })
        );
    }

    #[test]
    fn test_markers() {
        let d = parse("-k*1Q-*2n1/4").unwrap();
        assert_eq!(d.dims(), Dimensions::new(4, 2).unwrap());
        assert_eq!(d.get(0, 0), Some(&decode_cell("-k").unwrap()));
        assert_eq!(d.get(0, 1), Some(&decode_cell("*1Q").unwrap()));
        assert_eq!(d.get(0, 2), Some(&decode_cell("-*2n").unwrap()));
        assert_eq!(d.get(0, 3), Some(&Cell::Empty));
        assert_eq!(d.to_efn().unwrap(), "-k*1Q-*2n1/4");
    }

    #[test]
    fn test_infer() {
        assert_eq!(
            infer_dimensions("4/4/4/4/4"),
            Some(Dimensions {
                width: 4,
                height: 5
            })
        );
        assert_eq!(
            infer_dimensions("12/ab10"),
            Some(Dimensions {
                width: 12,
                height: 2
            })
        );
        assert_eq!(
            infer_dimensions("k9"),
            Some(Dimensions {
                width: 10,
                height: 1
            })
        );
        assert_eq!(
            infer_dimensions("4/3"),
            Some(Dimensions {
                width: 4,
                height: 4
            })
        );
        assert_eq!(
            infer_dimensions("12/12/k11/"),
            Some(Dimensions {
                width: 12,
                height: 12
            })
        );
        assert_eq!(infer_dimensions("/"), None);
        assert_eq!(infer_dimensions("0/0"), None);
        assert_eq!(infer_dimensions(""), None);
        assert_eq!(infer_dimensions("*/4"), None);
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(63), 7);
        assert_eq!(isqrt(64), 8);
        assert_eq!(isqrt(65), 8);
        assert_eq!(isqrt(usize::MAX), (1 << (usize::BITS / 2)) - 1);
    }

    #[test]
    fn test_large() {
        let d = parse("12/12/k11").unwrap();
        assert_eq!(d.dims(), Dimensions::new(12, 3).unwrap());
        assert_eq!(d.get(2, 0), Some(&Cell::piece('k').unwrap()));
        assert_eq!(d.to_efn().unwrap(), "12/12/k11");
    }

    #[test]
    fn test_errors() {
        let dims = Dimensions::ORTHODOX;
        assert_eq!(
            parse_with("9/8", dims),
            Err(NotationError::RowOverflow {
                row: 0,
                width: 8,
                content: "9".to_string()
            })
        );
        assert_eq!(
            parse_with("8/pppppppppp", dims),
            Err(NotationError::RowOverflow {
                row: 1,
                width: 8,
                content: "pppppppppp".to_string()
            })
        );
        assert_eq!(
            parse_with("8/8/8/8/8/8/8/8/8", dims),
            Err(NotationError::TooManyRows { rows: 9, height: 8 })
        );
        assert_eq!(
            parse_with("65", dims),
            Err(NotationError::TooManyCells {
                cells: 65,
                width: 8,
                height: 8
            })
        );
        assert_eq!(
            parse("0//0"),
            Err(NotationError::NoDimensions("0//0".to_string()))
        );
        assert_eq!(
            parse_with("8", Dimensions { width: 0, height: 8 }),
            Err(NotationError::BadDimensions {
                width: 0,
                height: 8
            })
        );
        assert_eq!(
            parse("k*/8"),
            Err(NotationError::BadRotation("*".to_string()))
        );
    }

    #[test]
    fn test_text_not_last() {
        let mut d = Diagram::empty(Dimensions::new(3, 1).unwrap());
        d.set(0, 0, decode_cell("''ab").unwrap());
        assert_eq!(d.to_efn().unwrap(), "''ab");
        d.set(0, 2, Cell::piece('k').unwrap());
        assert_eq!(
            d.to_efn(),
            Err(NotationError::TextNotLast {
                text: "ab".to_string(),
                row: 0
            })
        );
    }

    #[test]
    fn test_metadata() {
        let efn = parse_efn("8/8/3k4/8/8/3KR3/8/8 b - - 0 1").unwrap();
        let meta = efn.metadata.clone().unwrap();
        assert_eq!(meta.side, Side::Black);
        assert_eq!(meta.move_number, 1);
        assert_eq!(efn.to_efn().unwrap(), "8/8/3k4/8/8/3KR3/8/8 b - - 0 1");

        let efn = parse_efn(INITIAL).unwrap();
        assert_eq!(efn.metadata, None);

        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 x - -"),
            Err(NotationError::Metadata(_))
        ));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_spacing(INITIAL, None).unwrap(), INITIAL);
        assert_eq!(
            normalize_spacing("rnbqkbnr/pppppppp/44/35/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", None)
                .unwrap(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        assert_eq!(
            normalize_spacing("k111111/7", Some(Dimensions::new(7, 2).unwrap())).unwrap(),
            "k6/7"
        );
        assert_eq!(
            normalize_spacing("rnbqk/pppppppp/////PPPPPPPP", Some(Dimensions::ORTHODOX)).unwrap(),
            "rnbqk3/pppppppp/8/8/8/8/PPPPPPPP/8"
        );
        assert_eq!(
            normalize_spacing("7''12/8", None).unwrap(),
            "7''12/8"
        );
        assert_eq!(
            normalize_spacing("12/12", None).unwrap(),
            "12/12"
        );
        assert_eq!(normalize_spacing("4/3", None).unwrap(), "4/4/4/4");
        assert_eq!(
            normalize_spacing("0/0", None),
            Err(NotationError::NoDimensions("0/0".to_string()))
        );
    }

    #[test]
    fn test_round_trip_law() {
        for s in [
            INITIAL,
            "rnbqkbnrpppppppp32PPPPPPPPRNBQKBNR",
            "4/4/4/4/4",
            "-k*1Q-*2n1/4",
            "rnbqkbnr/pp2'👩🏽‍⚖️ppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "7''12/8",
            "ab10/12",
            "rnbqk/pppppppp/////PPPPPPPP",
            "rnbqkbnr/pppppppp/44/35/8/8/PPPPPPPP/RNBQKBNR",
            "''long/8",
            "4/3",
        ] {
            assert_eq!(
                parse(s).unwrap().to_efn().unwrap(),
                normalize_spacing(s, None).unwrap(),
                "law broken for {:?}",
                s
            );
        }
    }
}
