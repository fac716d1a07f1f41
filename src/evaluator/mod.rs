//! Tree-walking evaluator.
//!
//! Executes a parsed [`Program`](crate::ast::ast::Program) directly against a
//! chain of lexical environments:
//!
//! - Values, objects with prototype chains, arrays and closures
//! - Operator semantics and coercions
//! - Per-variant property access through the `MemberAccess` trait
//! - Built-in globals and a configurable output handler
//!
//! Control flow travels as a [`stmt::Completion`]; errors use `Result`.

pub mod environment;
pub mod evaluator;
pub mod expr;
pub mod members;
pub mod operators;
pub mod print_handler;
pub mod stdlib;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;
