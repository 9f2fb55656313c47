//! Byte-offset to line/column conversion.
//!
//! The lexer reports byte spans; the wire format and the grammar convention
//! use 1-based lines and 0-based columns. Handles UTF-8 by walking character
//! boundaries.

/// A 1-based line and 0-based column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

/// Convert a byte offset to a line/column position.
///
/// Offsets past the end of the text resolve to the position after the last
/// character.
pub fn line_column_at(text: &str, byte_offset: usize) -> LineColumn {
    let mut line = 1u32;
    let mut column = 0u32;
    let mut current = 0usize;

    for c in text.chars() {
        if current >= byte_offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
        current += c.len_utf8();
    }

    LineColumn { line, column }
}
