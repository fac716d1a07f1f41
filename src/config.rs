//! Interpreter configuration.

use std::rc::Rc;

/// Default limit on nested function calls before a `StackOverflow` error.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Largest length an array can reach through index writes, `length` writes
/// or `push`. Longer arrays raise `InvalidArrayLength`.
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Knobs the host can turn before running a program.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Maximum depth of nested calls.
    pub max_call_depth: usize,
    /// Maximum number of statements executed, `None` for unbounded.
    pub step_limit: Option<u64>,
    /// Name used for the source in positions and error messages.
    pub file_name: Rc<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            step_limit: None,
            file_name: Rc::new(String::from("shell")),
        }
    }
}

impl InterpreterConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Rc::new(name.into());
        self
    }
}
