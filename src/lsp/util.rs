//! Position arithmetic between byte offsets and LSP line/UTF-16 positions.

use crate::model::ast::Span;
use tower_lsp::lsp_types::{Position, Range};

pub fn position_to_offset(text: &str, position: Position) -> usize {
    let mut line = 0;
    let mut offset = 0;
    let mut chars = text.chars().peekable();

    while line < position.line as usize {
        if let Some(c) = chars.next() {
            offset += c.len_utf8();
            if c == '\n' {
                line += 1;
            } else if c == '\r' {
                if chars.peek() == Some(&'\n') {
                    offset += chars.next().map(|c| c.len_utf8()).unwrap_or(0);
                }
                line += 1;
            }
        } else {
            return offset;
        }
    }

    let mut utf16_count = 0;
    while utf16_count < position.character as usize {
        if let Some(c) = chars.next() {
            if c == '\n' || c == '\r' {
                break;
            }
            utf16_count += c.len_utf16();
            offset += c.len_utf8();
        } else {
            break;
        }
    }
    offset
}

pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;
    for (i, c) in text.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += c.len_utf16() as u32;
        }
    }
    Position::new(line, character)
}

pub fn span_to_range(text: &str, span: Span) -> Range {
    Range {
        start: offset_to_position(text, span.start),
        end: offset_to_position(text, span.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_ascii() {
        let text = "line one\nline two\n";
        let pos = Position::new(1, 5);
        let offset = position_to_offset(text, pos);
        assert_eq!(offset, 14);
        assert_eq!(offset_to_position(text, offset), pos);
    }

    #[test]
    fn handles_multibyte_columns() {
        let text = "$x = \"héllo\";\n$y = 1;\n";
        let offset = position_to_offset(text, Position::new(1, 0));
        assert_eq!(&text[offset..offset + 2], "$y");
    }
}
