//! The interpreter: owns the global environment, the output handler and the
//! call/step accounting, and drives statement execution.

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::{
    ast::{
        ast::{Expr, Program},
        expressions::{FunctionBody, FunctionDef},
    },
    config::InterpreterConfig,
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    stack::ensure_sufficient_stack,
    Position,
};

use super::{
    environment::{Env, ScopeKind},
    expr::eval_expr,
    print_handler::{BufferPrintHandler, PrintHandlerImpl},
    stdlib::install_globals,
    stmt::{exec_statements, Completion},
    value::{Callable, Value},
};

/// Called between statements with the running step count. Returning `false`
/// stops evaluation with an `Interrupted` error.
pub type InterruptHook = Box<dyn FnMut(u64) -> bool>;

pub struct Interpreter {
    config: InterpreterConfig,
    globals: Env,
    print_handler: PrintHandlerImpl,
    call_depth: usize,
    steps: u64,
    interrupt: Option<InterruptHook>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let globals = Env::new_global();
        install_globals(&globals);

        Interpreter {
            config,
            globals,
            print_handler: PrintHandlerImpl::default(),
            call_depth: 0,
            steps: 0,
            interrupt: None,
        }
    }

    pub fn with_print_handler(mut self, print_handler: PrintHandlerImpl) -> Self {
        self.print_handler = print_handler;
        self
    }

    /// An interpreter whose output is captured. The returned handle shares
    /// the interpreter's buffer.
    pub fn buffered(config: InterpreterConfig) -> (Self, BufferPrintHandler) {
        let buffer = BufferPrintHandler::new();
        let interpreter = Interpreter::with_config(config)
            .with_print_handler(PrintHandlerImpl::Buffer(buffer.clone()));
        (interpreter, buffer)
    }

    pub fn set_interrupt_hook(&mut self, hook: impl FnMut(u64) -> bool + 'static) {
        self.interrupt = Some(Box::new(hook));
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    pub fn print_handler(&self) -> &PrintHandlerImpl {
        &self.print_handler
    }

    pub fn get_output(&self) -> String {
        self.print_handler.get_output()
    }

    /// Statements executed by the current run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Executes a program in the global environment.
    ///
    /// Top-level `var` names are bound first, so a program can read one
    /// before its declaration runs. The result is `undefined` unless a
    /// `return` escapes, which the parser rules out for source programs.
    pub fn run(&mut self, program: &Program) -> Result<Value, Error> {
        self.steps = 0;
        self.call_depth = 0;

        for name in &program.var_names {
            if !self.globals.has_own(name) {
                self.globals.define(name, Value::Undefined);
            }
        }

        let globals = self.globals.clone();
        let result = match exec_statements(self, &program.body, &globals)? {
            Completion::Return(value) => value,
            _ => Value::Undefined,
        };

        debug!(steps = self.steps, "program finished");
        Ok(result)
    }

    /// Lexes, parses and runs `source`.
    pub fn run_source(&mut self, source: &str) -> Result<Value, Error> {
        let file = Rc::clone(&self.config.file_name);
        let tokens = tokenize(source, Rc::clone(&file))?;
        let program = parse(tokens, file)?;
        self.run(&program)
    }

    /// Evaluates a single expression in the global environment.
    pub fn eval_expression(&mut self, expression: &Expr) -> Result<Value, Error> {
        self.steps = 0;
        self.call_depth = 0;
        let globals = self.globals.clone();
        eval_expr(self, expression, &globals)
    }

    /// Calls a function value with already evaluated arguments.
    pub fn call_function(
        &mut self,
        callee: &Value,
        arguments: Vec<Value>,
        position: &Position,
    ) -> Result<Value, Error> {
        let Value::Function(function) = callee else {
            return Err(Error::new(
                ErrorImpl::NotCallable {
                    callee: callee.to_display(),
                },
                position.clone(),
            ));
        };

        if self.call_depth >= self.config.max_call_depth {
            return Err(Error::new(
                ErrorImpl::StackOverflow {
                    depth: self.config.max_call_depth,
                },
                position.clone(),
            ));
        }

        self.call_depth += 1;
        trace!(
            depth = self.call_depth,
            function = function.name().unwrap_or("(anonymous)"),
            "call"
        );
        let result = ensure_sufficient_stack(|| match function.as_ref() {
            Callable::Native { func, receiver, .. } => {
                func(self, receiver, arguments).map_err(|error| Error::new(error, position.clone()))
            }
            Callable::Closure {
                definition, env, ..
            } => self.invoke_closure(definition, env, arguments),
        });
        self.call_depth -= 1;

        result
    }

    fn invoke_closure(
        &mut self,
        definition: &FunctionDef,
        captured: &Env,
        arguments: Vec<Value>,
    ) -> Result<Value, Error> {
        let scope = captured.child(ScopeKind::Function);

        let mut arguments = arguments.into_iter();
        for param in &definition.params {
            scope.define(param, arguments.next().unwrap_or(Value::Undefined));
        }
        for name in &definition.var_names {
            if !scope.has_own(name) {
                scope.define(name, Value::Undefined);
            }
        }

        match &definition.body {
            FunctionBody::Expression(expression) => eval_expr(self, expression, &scope),
            FunctionBody::Block(block) => match exec_statements(self, &block.body, &scope)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal => Ok(Value::Undefined),
                Completion::Break => Err(illegal_control_flow("break", &block.span.start)),
                Completion::Continue => Err(illegal_control_flow("continue", &block.span.start)),
            },
        }
    }

    /// Counts one executed statement, enforcing the step limit and giving the
    /// interrupt hook a chance to stop evaluation.
    pub(super) fn tick(&mut self, position: &Position) -> Result<(), Error> {
        self.steps += 1;

        if let Some(limit) = self.config.step_limit {
            if self.steps > limit {
                warn!(limit, "step limit exceeded");
                return Err(Error::new(
                    ErrorImpl::StepLimitExceeded { limit },
                    position.clone(),
                ));
            }
        }

        if let Some(hook) = self.interrupt.as_mut() {
            if !hook(self.steps) {
                warn!(steps = self.steps, "evaluation interrupted");
                return Err(Error::new(
                    ErrorImpl::Interrupted { steps: self.steps },
                    position.clone(),
                ));
            }
        }

        Ok(())
    }
}

fn illegal_control_flow(statement: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::IllegalControlFlow {
            statement: statement.to_string(),
        },
        position.clone(),
    )
}
