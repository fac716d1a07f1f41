//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn position(offset: usize) -> Position {
    Position::new(offset, 1, offset as u32 + 1, Rc::new("test.js".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Lex);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(42),
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().column, 43);
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        Position::new(5, 2, 3, Rc::new("main.js".to_string())),
    );

    assert_eq!(error.to_string(), "variable \"foo\" not declared at main.js:2:3");
}

#[test]
fn test_error_kinds() {
    let cases = [
        (ErrorImpl::UnterminatedString, ErrorKind::Lex),
        (ErrorImpl::UnterminatedComment, ErrorKind::Lex),
        (
            ErrorImpl::ExpectedToken {
                expected: ")".to_string(),
                found: "EOF".to_string(),
            },
            ErrorKind::Parse,
        ),
        (ErrorImpl::InvalidAssignmentTarget, ErrorKind::Parse),
        (ErrorImpl::IllegalBreak, ErrorKind::Parse),
        (
            ErrorImpl::ConstAssignment {
                variable: "x".to_string(),
            },
            ErrorKind::Runtime,
        ),
        (ErrorImpl::StackOverflow { depth: 10 }, ErrorKind::Runtime),
        (
            ErrorImpl::InvalidArrayLength {
                length: "-1".to_string(),
            },
            ErrorKind::Runtime,
        ),
        (
            ErrorImpl::NotCallable {
                callee: "5".to_string(),
            },
            ErrorKind::Runtime,
        ),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{:?}", error);
    }
}

#[test]
fn test_variable_already_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        },
        position(0),
    );

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
    assert_eq!(error.get_tip().to_string(), "Variable `x` already declared");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        position(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_expected_token_message() {
    let error = ErrorImpl::ExpectedToken {
        expected: "`;`".to_string(),
        found: "}".to_string(),
    };

    assert_eq!(error.to_string(), "expected `;`, found \"}\"");
}
