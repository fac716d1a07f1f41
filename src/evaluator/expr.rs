use std::rc::Rc;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, CallExpr, FunctionDef, Literal, LiteralExpr, LogicalOp, MemberExpr,
            UnaryExpr, UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    stack::ensure_sufficient_stack,
    Position,
};

use super::{
    environment::{AssignError, Env, ScopeKind},
    evaluator::Interpreter,
    members::{get_member, set_member, PropertyKey},
    operators::{binary, to_number, unary},
    value::{Callable, JsObject, Value},
};

/// An assignable location, resolved once so compound assignment and `++`
/// evaluate the target's subexpressions a single time.
enum Reference {
    Binding(String),
    Property(Value, PropertyKey),
}

fn at(position: &Position) -> impl FnOnce(ErrorImpl) -> Error + '_ {
    move |error| Error::new(error, position.clone())
}

pub fn eval_expr(interpreter: &mut Interpreter, expr: &Expr, env: &Env) -> Result<Value, Error> {
    ensure_sufficient_stack(|| -> Result<Value, Error> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(&literal.value)),
            Expr::Symbol(symbol) => env.lookup(&symbol.value).ok_or_else(|| {
                Error::new(
                    ErrorImpl::VariableNotDeclared {
                        variable: symbol.value.clone(),
                    },
                    symbol.span.start.clone(),
                )
            }),
            Expr::Assignment(assignment) => eval_assignment(interpreter, assignment, env),
            Expr::Logical(logical) => {
                let left = eval_expr(interpreter, &logical.left, env)?;
                match (logical.operator, left.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                    _ => eval_expr(interpreter, &logical.right, env),
                }
            }
            Expr::Binary(expr) => {
                let left = eval_expr(interpreter, &expr.left, env)?;
                let right = eval_expr(interpreter, &expr.right, env)?;
                binary(expr.operator, &left, &right).map_err(at(&expr.span.start))
            }
            Expr::Unary(unary) => eval_unary(interpreter, unary, env),
            Expr::Call(call) => eval_call(interpreter, call, env),
            Expr::Member(member) => {
                let object = eval_expr(interpreter, &member.object, env)?;
                let key = eval_property_key(interpreter, member, env)?;
                get_member(&object, &key).map_err(at(&member.span.start))
            }
            Expr::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(eval_expr(interpreter, element, env)?);
                }
                Ok(Value::new_array(elements))
            }
            Expr::Object(object) => {
                let mut result = JsObject::default();
                for (key, value) in &object.properties {
                    let value = eval_named(interpreter, value, key, env)?;
                    result.properties.insert(Rc::from(key.as_str()), value);
                }
                Ok(Value::new_object(result))
            }
            Expr::Function(function) => Ok(eval_function_expr(&function.definition, env)),
            Expr::ArrowFunction(function) => Ok(make_closure(&function.definition, env, None)),
        }
    })
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(Rc::clone(s)),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
    }
}

/// Creates a closure over `env`. An anonymous function takes `inferred_name`
/// as its name.
pub fn make_closure(definition: &Rc<FunctionDef>, env: &Env, inferred_name: Option<&str>) -> Value {
    let name = definition.name.as_deref().or(inferred_name).map(Rc::from);
    Value::Function(Rc::new(Callable::Closure {
        definition: Rc::clone(definition),
        env: env.clone(),
        name,
    }))
}

/// A named function expression sees its own name, bound in a scope between
/// the closure and `env`.
fn eval_function_expr(definition: &Rc<FunctionDef>, env: &Env) -> Value {
    let Some(name) = &definition.name else {
        return make_closure(definition, env, None);
    };

    let scope = env.child(ScopeKind::Block);
    let function = make_closure(definition, &scope, None);
    scope.define(name, function.clone());
    function
}

/// Evaluates `expr`, naming it `name` if it is an anonymous function.
pub fn eval_named(
    interpreter: &mut Interpreter,
    expr: &Expr,
    name: &str,
    env: &Env,
) -> Result<Value, Error> {
    match expr {
        Expr::Function(function) if function.definition.name.is_none() => {
            Ok(make_closure(&function.definition, env, Some(name)))
        }
        Expr::ArrowFunction(function) => Ok(make_closure(&function.definition, env, Some(name))),
        other => eval_expr(interpreter, other, env),
    }
}

fn eval_property_key(
    interpreter: &mut Interpreter,
    member: &MemberExpr,
    env: &Env,
) -> Result<PropertyKey, Error> {
    if !member.computed {
        if let Expr::Literal(LiteralExpr {
            value: Literal::String(name),
            ..
        }) = member.property.as_ref()
        {
            return Ok(PropertyKey::Name(Rc::clone(name)));
        }
    }

    let key = eval_expr(interpreter, &member.property, env)?;
    Ok(PropertyKey::from_value(&key))
}

fn eval_reference(
    interpreter: &mut Interpreter,
    target: &Expr,
    env: &Env,
) -> Result<Reference, Error> {
    match target {
        Expr::Symbol(symbol) => Ok(Reference::Binding(symbol.value.clone())),
        Expr::Member(member) => {
            let object = eval_expr(interpreter, &member.object, env)?;
            let key = eval_property_key(interpreter, member, env)?;
            Ok(Reference::Property(object, key))
        }
        other => Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            other.get_span().start.clone(),
        )),
    }
}

fn read_reference(reference: &Reference, env: &Env, position: &Position) -> Result<Value, Error> {
    match reference {
        Reference::Binding(name) => env.lookup(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: name.clone(),
                },
                position.clone(),
            )
        }),
        Reference::Property(object, key) => get_member(object, key).map_err(at(position)),
    }
}

/// Stores through a reference. Assigning an undeclared name creates a global.
fn write_reference(
    reference: &Reference,
    value: Value,
    env: &Env,
    position: &Position,
) -> Result<(), Error> {
    match reference {
        Reference::Binding(name) => match env.assign(name, value.clone()) {
            Ok(()) => Ok(()),
            Err(AssignError::Undefined) => {
                env.global().define(name, value);
                Ok(())
            }
            Err(AssignError::Immutable) => Err(Error::new(
                ErrorImpl::ConstAssignment {
                    variable: name.clone(),
                },
                position.clone(),
            )),
        },
        Reference::Property(object, key) => {
            set_member(object, key, value).map_err(at(position))
        }
    }
}

fn eval_assignment(
    interpreter: &mut Interpreter,
    assignment: &AssignmentExpr,
    env: &Env,
) -> Result<Value, Error> {
    let position = &assignment.span.start;
    let reference = eval_reference(interpreter, &assignment.assignee, env)?;

    let value = match assignment.operator.binary() {
        None => match &reference {
            Reference::Binding(name) => eval_named(interpreter, &assignment.value, name, env)?,
            Reference::Property(..) => eval_expr(interpreter, &assignment.value, env)?,
        },
        Some(op) => {
            let current = read_reference(&reference, env, position)?;
            let operand = eval_expr(interpreter, &assignment.value, env)?;
            binary(op, &current, &operand).map_err(at(position))?
        }
    };

    write_reference(&reference, value.clone(), env, position)?;
    Ok(value)
}

fn eval_unary(interpreter: &mut Interpreter, expr: &UnaryExpr, env: &Env) -> Result<Value, Error> {
    let position = &expr.span.start;

    match expr.operator {
        UnaryOp::Increment | UnaryOp::Decrement => {
            let reference = eval_reference(interpreter, &expr.operand, env)?;
            let old = read_reference(&reference, env, position)?;
            let old = to_number(&old, expr.operator.as_str()).map_err(at(position))?;
            let new = if expr.operator == UnaryOp::Increment {
                old + 1.0
            } else {
                old - 1.0
            };

            write_reference(&reference, Value::Number(new), env, position)?;
            Ok(Value::Number(if expr.prefix { new } else { old }))
        }
        UnaryOp::Typeof => {
            // `typeof` of an undeclared name is "undefined", not an error.
            let operand = match expr.operand.as_ref() {
                Expr::Symbol(symbol) => env.lookup(&symbol.value).unwrap_or(Value::Undefined),
                other => eval_expr(interpreter, other, env)?,
            };
            Ok(Value::string(operand.type_of()))
        }
        operator => {
            let operand = eval_expr(interpreter, &expr.operand, env)?;
            unary(operator, &operand).map_err(at(position))
        }
    }
}

/// A readable name for a callee, used when it turns out not to be callable.
fn describe_callee(callee: &Expr) -> String {
    match callee {
        Expr::Symbol(symbol) => symbol.value.clone(),
        Expr::Member(member) => match member.property.as_ref() {
            Expr::Literal(LiteralExpr {
                value: Literal::String(name),
                ..
            }) if !member.computed => format!("{}.{}", describe_callee(&member.object), name),
            _ => format!("{}[...]", describe_callee(&member.object)),
        },
        Expr::Call(call) => format!("{}(...)", describe_callee(&call.callee)),
        _ => String::from("expression"),
    }
}

fn eval_call(interpreter: &mut Interpreter, call: &CallExpr, env: &Env) -> Result<Value, Error> {
    let callee = eval_expr(interpreter, &call.callee, env)?;

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(eval_expr(interpreter, argument, env)?);
    }

    if !matches!(callee, Value::Function(_)) {
        return Err(Error::new(
            ErrorImpl::NotCallable {
                callee: describe_callee(&call.callee),
            },
            call.span.start.clone(),
        ));
    }

    interpreter.call_function(&callee, arguments, &call.span.start)
}
