use std::fmt::Display;

use thiserror::Error;

use crate::{config::MAX_ARRAY_LENGTH, Position};

/// The stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Runtime,
}

#[derive(Error, Debug, Clone)]
#[error("{internal_error} at {position}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::InvalidUpdateTarget { .. } => "InvalidUpdateTarget",
            ErrorImpl::MissingConstInitializer { .. } => "MissingConstInitializer",
            ErrorImpl::IllegalBreak => "IllegalBreak",
            ErrorImpl::IllegalContinue => "IllegalContinue",
            ErrorImpl::IllegalReturn => "IllegalReturn",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::ConstAssignment { .. } => "ConstAssignment",
            ErrorImpl::PropertyOfNullish { .. } => "PropertyOfNullish",
            ErrorImpl::PropertyAssignment { .. } => "PropertyAssignment",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::InvalidPrototype { .. } => "InvalidPrototype",
            ErrorImpl::InvalidArrayLength { .. } => "InvalidArrayLength",
            ErrorImpl::StackOverflow { .. } => "StackOverflow",
            ErrorImpl::StepLimitExceeded { .. } => "StepLimitExceeded",
            ErrorImpl::Interrupted { .. } => "Interrupted",
            ErrorImpl::IllegalControlFlow { .. } => "IllegalControlFlow",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Block comment is missing its closing `*/`"))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, found } => {
                ErrorTip::Suggestion(format!("Expected `{}`, found `{}`", expected, found))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables and properties can be assigned to",
            )),
            ErrorImpl::InvalidUpdateTarget { operator } => ErrorTip::Suggestion(format!(
                "`{}` can only be applied to a variable or property",
                operator
            )),
            ErrorImpl::MissingConstInitializer { variable } => ErrorTip::Suggestion(format!(
                "Constant `{}` must be initialized where it is declared",
                variable
            )),
            ErrorImpl::IllegalBreak => {
                ErrorTip::Suggestion(String::from("`break` can only be used inside a loop"))
            }
            ErrorImpl::IllegalContinue => {
                ErrorTip::Suggestion(String::from("`continue` can only be used inside a loop"))
            }
            ErrorImpl::IllegalReturn => {
                ErrorTip::Suggestion(String::from("`return` can only be used inside a function"))
            }
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::ConstAssignment { variable } => ErrorTip::Suggestion(format!(
                "Declare `{}` with `let` if it needs to change",
                variable
            )),
            ErrorImpl::PropertyOfNullish { property, value } => ErrorTip::Suggestion(format!(
                "Cannot access `{}` of {}",
                property, value
            )),
            ErrorImpl::PropertyAssignment { property, target } => ErrorTip::Suggestion(format!(
                "Cannot set `{}` on a {}",
                property, target
            )),
            ErrorImpl::NotCallable { callee } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", callee))
            }
            ErrorImpl::InvalidOperands { .. } | ErrorImpl::InvalidOperand { .. } => {
                ErrorTip::Suggestion(String::from(
                    "Objects, arrays and functions do not convert to numbers",
                ))
            }
            ErrorImpl::InvalidPrototype { .. } => ErrorTip::Suggestion(String::from(
                "Object prototype may only be an object or null",
            )),
            ErrorImpl::InvalidArrayLength { .. } => ErrorTip::Suggestion(format!(
                "Array length must be a whole number no greater than {}",
                MAX_ARRAY_LENGTH
            )),
            ErrorImpl::StackOverflow { depth } => ErrorTip::Suggestion(format!(
                "Call depth exceeded {}, is there unbounded recursion?",
                depth
            )),
            ErrorImpl::StepLimitExceeded { .. } | ErrorImpl::Interrupted { .. } => ErrorTip::None,
            ErrorImpl::IllegalControlFlow { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, found {found:?}")]
    ExpectedToken { expected: String, found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("invalid operand for {operator}")]
    InvalidUpdateTarget { operator: String },
    #[error("missing initializer in const declaration of {variable:?}")]
    MissingConstInitializer { variable: String },
    #[error("illegal break statement")]
    IllegalBreak,
    #[error("illegal continue statement")]
    IllegalContinue,
    #[error("illegal return statement")]
    IllegalReturn,

    // Runtime
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("assignment to constant variable {variable:?}")]
    ConstAssignment { variable: String },
    #[error("cannot read or write property {property:?} of {value}")]
    PropertyOfNullish { property: String, value: String },
    #[error("cannot assign property {property:?} on {target}")]
    PropertyAssignment { property: String, target: String },
    #[error("{callee} is not a function")]
    NotCallable { callee: String },
    #[error("invalid operands for {operator}: {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("invalid operand for {operator}: {operand}")]
    InvalidOperand { operator: String, operand: String },
    #[error("object prototype may only be an object or null: {found}")]
    InvalidPrototype { found: String },
    #[error("invalid array length: {length}")]
    InvalidArrayLength { length: String },
    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow { depth: usize },
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
    #[error("interrupted after {steps} steps")]
    Interrupted { steps: u64 },
    #[error("{statement} escaped its enclosing construct")]
    IllegalControlFlow { statement: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedComment => ErrorKind::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::ExpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidAssignmentTarget
            | ErrorImpl::InvalidUpdateTarget { .. }
            | ErrorImpl::MissingConstInitializer { .. }
            | ErrorImpl::IllegalBreak
            | ErrorImpl::IllegalContinue
            | ErrorImpl::IllegalReturn => ErrorKind::Parse,
            _ => ErrorKind::Runtime,
        }
    }
}
