//! Lookup tables for free text codes

/// Table which resolves free text codes (`'x`) into display characters
pub trait GlyphTable {
    /// Returns the character for `code`, or `None` if the code is unknown
    fn lookup(&self, code: &str) -> Option<char>;

    /// Placeholder for unknown codes
    fn unknown(&self) -> char {
        '〓'
    }
}

/// Default table, which maps printable ASCII characters to their full-width forms
///
/// Full-width forms occupy exactly one square in monospace diagrams, which makes them
/// suitable for text annotations in terminal output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DefaultGlyphs;

impl GlyphTable for DefaultGlyphs {
    fn lookup(&self, code: &str) -> Option<char> {
        let mut chars = code.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c {
            ' ' => Some('\u{3000}'),
            '!'..='~' => char::from_u32(u32::from(c) - 0x21 + 0xff01),
            _ => None,
        }
    }
}

impl<F: Fn(&str) -> Option<char>> GlyphTable for F {
    fn lookup(&self, code: &str) -> Option<char> {
        self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(DefaultGlyphs.lookup("a"), Some('ａ'));
        assert_eq!(DefaultGlyphs.lookup("~"), Some('～'));
        assert_eq!(DefaultGlyphs.lookup("1"), Some('１'));
        assert_eq!(DefaultGlyphs.lookup("ab"), None);
        assert_eq!(DefaultGlyphs.lookup("é"), None);
        assert_eq!(DefaultGlyphs.unknown(), '〓');
    }

    #[test]
    fn test_closure() {
        let table = |code: &str| if code == "x" { Some('✕') } else { None };
        assert_eq!(table.lookup("x"), Some('✕'));
        assert_eq!(table.lookup("y"), None);
        assert_eq!(table.unknown(), '〓');
    }
}
