use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Handles a pattern match. Returns `Ok(None)` for input that produces no
/// token (whitespace, comments).
pub type RegexHandler = fn(&mut Lexer, &str) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(&format!("^(?:{})", source)).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    /// Tried in order at the current offset, first match wins. Longer
    /// operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"\s+", skip_handler),
        pattern(r"//[^\n]*", skip_handler),
        pattern(r"(?s)/\*.*?\*/", skip_handler),
        pattern(r"/\*", unterminated_comment_handler),
        pattern(r"[a-zA-Z_$][a-zA-Z0-9_$]*", symbol_handler),
        pattern(r"[0-9]+(\.[0-9]+)?", number_handler),
        pattern(r#"(?s)"(?:[^"\\]|\\.)*""#, string_handler),
        pattern(r"(?s)'(?:[^'\\]|\\.)*'", string_handler),
        pattern(r#"["']"#, unterminated_string_handler),
        pattern(r"===", MK_DEFAULT_HANDLER!(TokenKind::StrictEquals, "===")),
        pattern(r"!==", MK_DEFAULT_HANDLER!(TokenKind::StrictNotEquals, "!==")),
        pattern(r"==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"=>", MK_DEFAULT_HANDLER!(TokenKind::FatArrow, "=>")),
        pattern(r"<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern(r"\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern(r"\+\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern(r"--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern(r"\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern(r"-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern(r"\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern(r"/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern(r"%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern(r"=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern(r"<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern(r"\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern(r"\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern(r"\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(r"\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern(r"\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern(r";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
    ];
}

/// A lazy tokenizer over a source string.
///
/// Yields tokens in source order, ending with a single `EOF` token. After the
/// first error (or the `EOF`) it yields nothing more until [`Lexer::reset`].
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Rc<String>) -> Lexer<'a> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            file,
            finished: false,
        }
    }

    /// Rewinds to the start of the source.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.finished = false;
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.pos, self.line, self.column, Rc::clone(&self.file))
    }

    /// Advances past `matched`, which must be the text at the current offset,
    /// and returns the span it covered.
    pub fn consume(&mut self, matched: &str) -> Span {
        let start = self.current_position();

        for ch in matched.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += matched.len();

        Span::new(start, self.current_position())
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.at_eof() {
                self.finished = true;
                let position = self.current_position();
                return Some(Ok(MK_TOKEN!(
                    TokenKind::EOF,
                    String::from("EOF"),
                    Span::new(position.clone(), position)
                )));
            }

            let source = self.source;
            let remainder = &source[self.pos..];
            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|m| (pattern.handler, &remainder[..m.end()]))
            });

            let Some((handler, matched)) = found else {
                self.finished = true;
                let token = remainder.chars().next().unwrap_or_default().to_string();
                return Some(Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token },
                    self.current_position(),
                )));
            };

            match handler(self, matched) {
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => continue,
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    lexer.consume(matched);
    Ok(None)
}

fn unterminated_comment_handler(lexer: &mut Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedComment, lexer.current_position()))
}

fn unterminated_string_handler(lexer: &mut Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.current_position()))
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.consume(matched);
    Ok(Some(MK_TOKEN!(TokenKind::Number, matched.to_string(), span)))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.consume(matched);
    let literal = &matched[1..matched.len() - 1];

    let mut result = String::with_capacity(literal.len());
    let mut chars = literal.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        // The pattern guarantees a character after every backslash.
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    Ok(Some(MK_TOKEN!(TokenKind::String, result, span)))
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let span = lexer.consume(matched);
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    Ok(Some(MK_TOKEN!(kind, matched.to_string(), span)))
}

/// Tokenizes a whole source string, stopping at the first error.
pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let tokens = Lexer::new(source, file).collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
