//! Where `console.log` and `console.error` output goes.
//!
//! - `Stdout`: the default for the command line, errors go to stderr
//! - `Buffer`: captured in memory for tests and embedders
//! - `Silent`: discarded

use std::{cell::RefCell, rc::Rc};

/// Writes each line to stdout, or stderr for error lines.
#[derive(Default, Clone, Copy)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn println(&self, msg: &str) {
        println!("{msg}");
    }

    pub fn eprintln(&self, msg: &str) {
        eprintln!("{msg}");
    }
}

/// Captures output in a buffer. Clones share the same buffer, so a caller
/// can keep a handle and read what the interpreter printed. Error lines are
/// interleaved with the rest, as on a terminal.
#[derive(Default, Clone)]
pub struct BufferPrintHandler {
    buffer: Rc<RefCell<String>>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(msg);
        buffer.push('\n');
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    Silent,
}

impl PrintHandlerImpl {
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.println(msg),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    pub fn eprintln(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.eprintln(msg),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

impl Default for PrintHandlerImpl {
    fn default() -> Self {
        PrintHandlerImpl::Stdout(StdoutPrintHandler)
    }
}
