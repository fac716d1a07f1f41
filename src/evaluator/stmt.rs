use crate::{
    ast::{
        ast::Stmt,
        statements::{ForStmt, VarDeclStmt, VarKind},
    },
    errors::errors::Error,
    stack::ensure_sufficient_stack,
};

use super::{
    environment::{Env, Mutability, ScopeKind},
    evaluator::Interpreter,
    expr::{eval_expr, eval_named, make_closure},
    value::Value,
};

/// How a statement finished. Loops absorb `Break` and `Continue`, function
/// bodies absorb `Return`.
#[derive(Debug)]
pub enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Runs a statement list in `env`, after hoisting its function declarations.
pub fn exec_statements(
    interpreter: &mut Interpreter,
    statements: &[Stmt],
    env: &Env,
) -> Result<Completion, Error> {
    for statement in statements {
        if let Stmt::FnDecl(declaration) = statement {
            let function = make_closure(&declaration.definition, env, None);
            env.declare_var(&declaration.identifier, Some(function))
                .map_err(|error| Error::new(error, declaration.span.start.clone()))?;
        }
    }

    for statement in statements {
        match exec_stmt(interpreter, statement, env)? {
            Completion::Normal => {}
            completion => return Ok(completion),
        }
    }

    Ok(Completion::Normal)
}

pub fn exec_stmt(
    interpreter: &mut Interpreter,
    statement: &Stmt,
    env: &Env,
) -> Result<Completion, Error> {
    ensure_sufficient_stack(|| -> Result<Completion, Error> {
        interpreter.tick(&statement.get_span().start)?;

        match statement {
            Stmt::Expression(stmt) => {
                eval_expr(interpreter, &stmt.expression, env)?;
                Ok(Completion::Normal)
            }
            Stmt::Block(block) => {
                exec_statements(interpreter, &block.body, &env.child(ScopeKind::Block))
            }
            Stmt::VarDecl(declaration) => {
                exec_var_decl(interpreter, declaration, env)?;
                Ok(Completion::Normal)
            }
            // Bound when the enclosing statement list was entered.
            Stmt::FnDecl(_) => Ok(Completion::Normal),
            Stmt::If(stmt) => {
                if eval_expr(interpreter, &stmt.condition, env)?.is_truthy() {
                    exec_stmt(interpreter, &stmt.then_body, env)
                } else if let Some(else_body) = &stmt.else_body {
                    exec_stmt(interpreter, else_body, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Stmt::While(stmt) => {
                while eval_expr(interpreter, &stmt.condition, env)?.is_truthy() {
                    match exec_stmt(interpreter, &stmt.body, env)? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal | Completion::Continue => {}
                    }
                }
                Ok(Completion::Normal)
            }
            Stmt::For(stmt) => exec_for(interpreter, stmt, env),
            Stmt::Return(stmt) => {
                let value = match &stmt.value {
                    Some(expression) => eval_expr(interpreter, expression, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Stmt::Break(_) => Ok(Completion::Break),
            Stmt::Continue(_) => Ok(Completion::Continue),
            Stmt::Empty(_) => Ok(Completion::Normal),
        }
    })
}

fn exec_var_decl(
    interpreter: &mut Interpreter,
    declaration: &VarDeclStmt,
    env: &Env,
) -> Result<(), Error> {
    let name = &declaration.identifier;
    let value = match &declaration.assigned_value {
        Some(expression) => Some(eval_named(interpreter, expression, name, env)?),
        None => None,
    };

    let result = match declaration.kind {
        VarKind::Var => env.function_scope().declare_var(name, value),
        VarKind::Let => env.declare(name, value.unwrap_or(Value::Undefined), Mutability::Mutable),
        VarKind::Const => {
            env.declare(name, value.unwrap_or(Value::Undefined), Mutability::Immutable)
        }
    };

    result.map_err(|error| Error::new(error, declaration.span.start.clone()))
}

/// `for (init; condition; update) body`. The head gets its own scope; with a
/// `let`/`const` init every iteration runs in a fresh copy of it, so closures
/// created in the body keep that iteration's values.
fn exec_for(interpreter: &mut Interpreter, stmt: &ForStmt, env: &Env) -> Result<Completion, Error> {
    let loop_env = env.child(ScopeKind::Block);
    let per_iteration = matches!(
        stmt.init.as_deref(),
        Some(Stmt::VarDecl(declaration)) if declaration.kind != VarKind::Var
    );

    if let Some(init) = &stmt.init {
        exec_stmt(interpreter, init, &loop_env)?;
    }

    let mut iteration_env = if per_iteration {
        loop_env.copy_bindings()
    } else {
        loop_env
    };

    loop {
        if let Some(condition) = &stmt.condition {
            if !eval_expr(interpreter, condition, &iteration_env)?.is_truthy() {
                break;
            }
        }

        match exec_stmt(interpreter, &stmt.body, &iteration_env)? {
            Completion::Break => break,
            Completion::Return(value) => return Ok(Completion::Return(value)),
            Completion::Normal | Completion::Continue => {}
        }

        if per_iteration {
            iteration_env = iteration_env.copy_bindings();
        }
        if let Some(update) = &stmt.update {
            eval_expr(interpreter, update, &iteration_env)?;
        }
    }

    Ok(Completion::Normal)
}
