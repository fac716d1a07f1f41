//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Greedy operator matching
//! - Comments and positions
//! - Error cases

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    lexer::{tokenize, Lexer},
    tokens::TokenKind,
};
use crate::errors::errors::ErrorImpl;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Rc::new("test.js".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("let const var function if else while for return break continue true false null undefined typeof"),
        vec![
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::Var,
            TokenKind::Function,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Undefined,
            TokenKind::Typeof,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _underscore $el letter", Rc::new("test.js".to_string())).unwrap();

    let values: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
    assert_eq!(
        values,
        vec![
            (TokenKind::Identifier, "foo"),
            (TokenKind::Identifier, "baz_123"),
            (TokenKind::Identifier, "_underscore"),
            (TokenKind::Identifier, "$el"),
            (TokenKind::Identifier, "letter"),
            (TokenKind::EOF, "EOF"),
        ]
    );
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 0 1.", Rc::new("test.js".to_string())).unwrap();

    let values: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
    assert_eq!(
        values,
        vec![
            (TokenKind::Number, "42"),
            (TokenKind::Number, "3.14"),
            (TokenKind::Number, "0"),
            (TokenKind::Number, "1"),
            (TokenKind::Dot, "."),
            (TokenKind::EOF, "EOF"),
        ]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" 'world' "it's" 'say "hi"' """#, Rc::new("test.js".to_string())).unwrap();

    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].value, "it's");
    assert_eq!(tokens[3].value, "say \"hi\"");
    assert_eq!(tokens[4].value, "");
    assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::String));
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = tokenize(r#""a\nb" 'tab\there' "back\\slash" 'don\'t' "q\"q""#, Rc::new("test.js".to_string())).unwrap();

    assert_eq!(tokens[0].value, "a\nb");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "back\\slash");
    assert_eq!(tokens[3].value, "don't");
    assert_eq!(tokens[4].value, "q\"q");
}

#[test]
fn test_tokenize_greedy_operators() {
    assert_eq!(
        kinds("=== !== == != => <= >= && || ++ -- += -= *= /= %= = ! < > + - * / %"),
        vec![
            TokenKind::StrictEquals,
            TokenKind::StrictNotEquals,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::FatArrow,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::PercentEquals,
            TokenKind::Assignment,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_adjacent_operators() {
    assert_eq!(
        kinds("x=>x>=1"),
        vec![
            TokenKind::Identifier,
            TokenKind::FatArrow,
            TokenKind::Identifier,
            TokenKind::GreaterEquals,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
    assert_eq!(
        kinds("a+++b"),
        vec![
            TokenKind::Identifier,
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] . , ; :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        kinds("a // line comment\n/* block\ncomment */ b / c"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Slash,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("let x;\n  x = 'a\nb';\ny", Rc::new("test.js".to_string())).unwrap();

    let x = &tokens[3];
    assert_eq!(x.value, "x");
    assert_eq!((x.span.start.line, x.span.start.column, x.span.start.offset), (2, 3, 9));

    let string = &tokens[5];
    assert_eq!((string.span.start.line, string.span.start.column), (2, 7));
    assert_eq!((string.span.end.line, string.span.end.column), (3, 3));

    let y = &tokens[7];
    assert_eq!((y.span.start.line, y.span.start.column), (4, 1));
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("let a = #;", Rc::new("test.js".to_string())).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnrecognisedToken {
            token: "#".to_string()
        }
    );
    assert_eq!(error.get_position().offset, 8);
    assert_eq!(error.get_position().column, 9);
}

#[test]
fn test_unterminated_string_and_comment() {
    let error = tokenize("let s = 'abc;", Rc::new("test.js".to_string())).unwrap_err();
    assert_eq!(error.get_internal_error(), &ErrorImpl::UnterminatedString);

    let error = tokenize("a /* never closed", Rc::new("test.js".to_string())).unwrap_err();
    assert_eq!(error.get_internal_error(), &ErrorImpl::UnterminatedComment);
}

#[test]
fn test_lexer_is_lazy_and_stops_after_error() {
    let mut lexer = Lexer::new("a @ b", Rc::new("test.js".to_string()));

    assert_eq!(lexer.next().unwrap().unwrap().value, "a");
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn test_relexing_is_deterministic() {
    let source = "function f(x) { return x => x >= 1 && 'a' !== \"b\"; } // done";
    let mut lexer = Lexer::new(source, Rc::new("test.js".to_string()));

    let first: Vec<_> = lexer.by_ref().collect::<Result<_, _>>().unwrap();
    assert!(lexer.next().is_none());

    lexer.reset();
    let second: Vec<_> = lexer.collect::<Result<_, _>>().unwrap();

    assert_eq!(first, second);
    assert_eq!(first, tokenize(source, Rc::new("test.js".to_string())).unwrap());
}

#[test]
fn test_current_position_follows_iteration() {
    let mut lexer = Lexer::new("let x\n  = 1;", Rc::new("test.js".to_string()));

    let start = lexer.current_position();
    assert_eq!((start.offset, start.line, start.column), (0, 1, 1));

    lexer.next();
    lexer.next();
    let after_x = lexer.current_position();
    assert_eq!((after_x.offset, after_x.line, after_x.column), (5, 1, 6));

    let assign = lexer.next().unwrap().unwrap();
    assert_eq!(assign.kind, TokenKind::Assignment);
    let after_assign = lexer.current_position();
    assert_eq!((after_assign.offset, after_assign.line, after_assign.column), (9, 2, 4));
    assert!(!lexer.at_eof());
}
