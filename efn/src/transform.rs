//! Geometric and color transforms of diagrams

use crate::cell::Cell;
use crate::codec::{Diagram, Dimensions};

fn invert_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Piece(p) if !p.is_neutral() => {
            let l = p.letter();
            let inv = if l.is_uppercase() {
                l.to_lowercase().next()
            } else {
                l.to_uppercase().next()
            };
            match inv {
                Some(c) if c.to_string().len() == l.len_utf8() => Cell::Piece(p.with_letter(c)),
                _ => cell.clone(),
            }
        }
        _ => cell.clone(),
    }
}

impl Diagram {
    fn remap(&self, dims: Dimensions, src: impl Fn(usize, usize) -> (usize, usize)) -> Diagram {
        let mut res = Diagram::empty(dims);
        for row in 0..dims.height {
            for col in 0..dims.width {
                let (r, c) = src(row, col);
                if let Some(cell) = self.get(r, c) {
                    res.set(row, col, cell.clone());
                }
            }
        }
        res
    }

    /// Mirrors the diagram left to right
    pub fn flip_horizontal(&self) -> Diagram {
        let w = self.width();
        self.remap(self.dims(), |r, c| (r, w - 1 - c))
    }

    /// Mirrors the diagram top to bottom
    pub fn flip_vertical(&self) -> Diagram {
        let h = self.height();
        self.remap(self.dims(), |r, c| (h - 1 - r, c))
    }

    /// Rotates the diagram by 90 degrees clockwise
    ///
    /// Width and height are swapped.
    pub fn rotate_clockwise(&self) -> Diagram {
        let h = self.height();
        let dims = Dimensions {
            width: self.height(),
            height: self.width(),
        };
        self.remap(dims, |r, c| (h - 1 - c, r))
    }

    /// Swaps the sides of all the pieces by changing the case of their letters
    ///
    /// Neutral pieces and free text are kept intact, as well as letters without case.
    pub fn invert_colors(&self) -> Diagram {
        let mut res = self.clone();
        for row in 0..self.height() {
            for col in 0..self.width() {
                if let Some(cell) = self.get(row, col) {
                    res.set(row, col, invert_cell(cell));
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::parse;

    fn efn(s: &str) -> String {
        parse(s).unwrap().to_efn().unwrap()
    }

    #[test]
    fn test_flips() {
        let d = parse("kq2/4/4/3P").unwrap();
        assert_eq!(d.flip_horizontal().to_efn().unwrap(), efn("2qk/4/4/P3"));
        assert_eq!(d.flip_vertical().to_efn().unwrap(), efn("3P/4/4/kq2"));
        assert_eq!(d.flip_horizontal().flip_horizontal(), d);
    }

    #[test]
    fn test_rotate() {
        let d = parse("abc/def").unwrap();
        let r = d.rotate_clockwise();
        assert_eq!(r.width(), 2);
        assert_eq!(r.height(), 3);
        assert_eq!(r.to_efn().unwrap(), "da/eb/fc");
        let full = d
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise()
            .rotate_clockwise();
        assert_eq!(full, d);
    }

    #[test]
    fn test_invert() {
        let d = parse("k-q'x1/3''ab/Z*2b2/4").unwrap();
        assert_eq!(
            d.invert_colors().to_efn().unwrap(),
            "K-q'x1/3''ab/z*2B2/4"
        );
    }
}
