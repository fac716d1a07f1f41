//! Error types and error handling for the interpreter.
//!
//! Every stage reports failures through the same [`errors::Error`] type:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and evaluation
//! - Classification by stage through [`errors::ErrorKind`]
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
