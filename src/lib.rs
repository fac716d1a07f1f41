#![allow(clippy::module_inception)]

use std::{fmt::Display, fmt::Write, rc::Rc, sync::Once};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod stack;

extern crate regex;

/// A location in a source file. Lines and columns are 1-based, the offset is
/// a byte offset into the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32, file: Rc<String>) -> Self {
        Position {
            offset,
            line,
            column,
            file,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span covering `self` up to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Nothing is installed unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=minijs=debug` or `RUST_LOG=minijs::evaluator=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

/// Finds the line containing a byte offset.
///
/// Returns the 1-based line number, the line's text and the offset of the
/// position within that line, or `None` if the offset is past the end.
pub fn get_line_at_position(source: &str, offset: usize) -> Option<(usize, String, usize)> {
    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&offset) {
            return Some((line_number, line.to_string(), offset - start));
        }

        start = end;
        line_number += 1;
    }

    // An error at EOF points just past the last character.
    if offset == source.len() {
        let last = source.split_inclusive('\n').last().unwrap_or("");
        if !last.ends_with('\n') {
            return Some((line_number.max(2) - 1, last.to_string(), last.len()));
        }
        return Some((line_number, String::new(), 0));
    }

    None
}

/// Renders an error as a caret diagram against its source text.
///
/// ```text
/// Error: UnrecognisedToken
/// -> final.js
///    |
/// 20 | let a = #;
///    | --------^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let mut out = String::new();
    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}", position);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    // The offset is in bytes, the caret needs a column in characters.
    let column = line_text
        .get(..line_pos)
        .map_or(line_pos, |prefix| prefix.chars().count());
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nfoo\nbar\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, 500).is_none());
    }

    #[test]
    fn test_get_line_at_eof_without_newline() {
        let (line_number, line, line_pos) = super::get_line_at_position("let x = (", 9).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "let x = (");
        assert_eq!(line_pos, 9);
    }

    #[test]
    fn test_format_error() {
        let source = "let a = 1;\n    let b = #;\n";
        let error = Error::new(
            ErrorImpl::UnrecognisedToken {
                token: "#".to_string(),
            },
            Position::new(23, 2, 13, Rc::new("main.js".to_string())),
        );

        let rendered = super::format_error(&error, source);
        let expected = "Error: UnrecognisedToken\n\
                        -> main.js:2:13\n  \
                        |\n\
                        2 | let b = #;\n  \
                        | --------^\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_format_error_counts_characters() {
        let source = "let s = 'héllo'; x;";
        let error = Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: "x".to_string(),
            },
            Position::new(18, 1, 18, Rc::new("main.js".to_string())),
        );

        let rendered = super::format_error(&error, source);
        let expected = "Error: VariableNotDeclared (Variable `x` not declared)\n\
                        -> main.js:1:18\n  \
                        |\n\
                        1 | let s = 'héllo'; x;\n  \
                        | -----------------^\n";
        assert_eq!(rendered, expected);
    }
}
