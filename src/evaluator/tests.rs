//! Unit tests for the evaluator module.
//!
//! Covers values and their string/display forms, operators and coercion,
//! environments and scoping, member access, built-ins, and the call-depth and
//! step limits.

use std::{cell::Cell, rc::Rc};

use pretty_assertions::assert_eq;

use super::{
    environment::{AssignError, Env, Mutability, ScopeKind},
    evaluator::Interpreter,
    members::{get_member, set_member, PropertyKey},
    operators::{binary, loose_equals, strict_equals, string_to_number},
    print_handler::{BufferPrintHandler, PrintHandlerImpl},
    value::{number_to_string, JsObject, Value},
};
use crate::{
    ast::expressions::BinaryOp,
    config::{InterpreterConfig, MAX_ARRAY_LENGTH},
    errors::errors::{Error, ErrorImpl, ErrorKind},
};

fn run(source: &str) -> Result<String, Error> {
    let (mut interpreter, output) = Interpreter::buffered(InterpreterConfig::default());
    interpreter.run_source(source)?;
    Ok(output.get_output())
}

fn output(source: &str) -> String {
    match run(source) {
        Ok(output) => output,
        Err(error) => panic!("{} failed: {}", source, error),
    }
}

fn error(source: &str) -> ErrorImpl {
    match run(source) {
        Ok(output) => panic!("{} should fail, printed {:?}", source, output),
        Err(error) => error.get_internal_error().clone(),
    }
}

#[test]
fn test_number_to_string() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-2.5), "-2.5");
    assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::INFINITY), "Infinity");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(1.5e-7), "1.5e-7");
    assert_eq!(number_to_string(1e20), "100000000000000000000");
    assert_eq!(number_to_string(0.000001), "0.000001");
}

#[test]
fn test_string_to_number() {
    assert_eq!(string_to_number("42"), 42.0);
    assert_eq!(string_to_number("  3.5\n"), 3.5);
    assert_eq!(string_to_number(""), 0.0);
    assert_eq!(string_to_number("   "), 0.0);
    assert_eq!(string_to_number("0x1f"), 31.0);
    assert_eq!(string_to_number("0b101"), 5.0);
    assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
    assert_eq!(string_to_number("1e3"), 1000.0);
    assert!(string_to_number("12px").is_nan());
    assert!(string_to_number("inf").is_nan());
    assert!(string_to_number("NaN").is_nan());
}

#[test]
fn test_truthiness() {
    for falsy in [
        Value::Boolean(false),
        Value::Number(0.0),
        Value::Number(f64::NAN),
        Value::string(""),
        Value::Null,
        Value::Undefined,
    ] {
        assert!(!falsy.is_truthy(), "{:?} should be falsy", falsy);
    }

    for truthy in [
        Value::Boolean(true),
        Value::Number(-1.0),
        Value::string("0"),
        Value::new_array(vec![]),
        Value::new_object(JsObject::default()),
    ] {
        assert!(truthy.is_truthy(), "{:?} should be truthy", truthy);
    }
}

#[test]
fn test_string_form() {
    let nested = Value::new_array(vec![
        Value::Number(1.0),
        Value::new_array(vec![Value::Number(2.0), Value::Null]),
        Value::Undefined,
        Value::string("x"),
    ]);
    assert_eq!(&*nested.to_js_string(), "1,2,,,x");
    assert_eq!(
        &*Value::new_object(JsObject::default()).to_js_string(),
        "[object Object]"
    );
    assert_eq!(&*Value::Boolean(true).to_js_string(), "true");
}

#[test]
fn test_display_form() {
    assert_eq!(output(r#"console.log("hi", 1, true, null, undefined);"#), "hi 1 true null undefined\n");
    assert_eq!(output("console.log([1, 'a', [2]]);"), "[ 1, 'a', [ 2 ] ]\n");
    assert_eq!(output("console.log([], {});"), "[] {}\n");
    assert_eq!(
        output("console.log({ x: 1, 'two words': 2, nested: { y: \"it's\" } });"),
        "{ x: 1, 'two words': 2, nested: { y: \"it's\" } }\n"
    );
    assert_eq!(
        output("function named() {} let anon = [function () {}]; console.log(named, anon);"),
        "[Function: named] [ [Function (anonymous)] ]\n"
    );
    assert_eq!(output("console.log({ a: { b: { c: { d: 1 } } } });"), "{ a: { b: { c: [Object] } } }\n");
}

#[test]
fn test_display_circular() {
    assert_eq!(output("let o = { a: 1 }; o.self = o; console.log(o);"), "{ a: 1, self: [Circular] }\n");
    assert_eq!(output("let a = [1]; a.push(a); console.log(a);"), "[ 1, [Circular] ]\n");
    assert_eq!(output("let a = [1]; a.push(a); console.log('' + a);"), "1,\n");
}

#[test]
fn test_loose_equality_table() {
    let cases = [
        (Value::Null, Value::Undefined, true),
        (Value::Null, Value::Number(0.0), false),
        (Value::Undefined, Value::Boolean(false), false),
        (Value::Number(1.0), Value::string("1"), true),
        (Value::string(" 2 "), Value::Number(2.0), true),
        (Value::Boolean(true), Value::Number(1.0), true),
        (Value::Boolean(false), Value::string("0"), true),
        (Value::Boolean(true), Value::string("true"), false),
        (Value::Number(f64::NAN), Value::Number(f64::NAN), false),
        (Value::new_array(vec![]), Value::string(""), false),
    ];

    for (left, right, expected) in cases {
        assert_eq!(loose_equals(&left, &right), expected, "{:?} == {:?}", left, right);
    }
}

#[test]
fn test_strict_equality_uses_identity() {
    let array = Value::new_array(vec![]);
    assert!(strict_equals(&array, &array.clone()));
    assert!(!strict_equals(&array, &Value::new_array(vec![])));
    assert!(!strict_equals(&Value::Number(1.0), &Value::string("1")));
    assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    assert!(strict_equals(&Value::string("a"), &Value::string("a")));
}

#[test]
fn test_binary_operators() {
    let add = |l: Value, r: Value| binary(BinaryOp::Add, &l, &r).map(|v| v.to_display());

    assert_eq!(add(Value::Number(1.0), Value::Number(2.0)), Ok(String::from("3")));
    assert_eq!(add(Value::string("a"), Value::Number(1.0)), Ok(String::from("a1")));
    assert_eq!(add(Value::Null, Value::string("!")), Ok(String::from("null!")));
    assert_eq!(
        add(Value::Boolean(true), Value::Number(1.0)),
        Err(ErrorImpl::InvalidOperands {
            operator: String::from("+"),
            left: String::from("boolean"),
            right: String::from("number"),
        })
    );

    let sub = binary(BinaryOp::Subtract, &Value::string("5"), &Value::Null).map(|v| v.to_display());
    assert_eq!(sub, Ok(String::from("5")));

    let rem = binary(BinaryOp::Modulo, &Value::Number(-7.0), &Value::Number(3.0));
    assert_eq!(rem.map(|v| v.to_display()), Ok(String::from("-1")));

    let less = binary(BinaryOp::Less, &Value::string("apple"), &Value::string("banana"));
    assert_eq!(less.map(|v| v.is_truthy()), Ok(true));

    let nan = binary(BinaryOp::GreaterEqual, &Value::Undefined, &Value::Number(0.0));
    assert_eq!(nan.map(|v| v.is_truthy()), Ok(false));

    assert_eq!(
        binary(BinaryOp::Multiply, &Value::new_object(JsObject::default()), &Value::Number(2.0))
            .map(|v| v.to_display()),
        Err(ErrorImpl::InvalidOperands {
            operator: String::from("*"),
            left: String::from("object"),
            right: String::from("number"),
        })
    );
}

#[test]
fn test_environment_scoping() {
    let global = Env::new_global();
    global.declare("x", Value::Number(1.0), Mutability::Mutable).unwrap();

    let function = global.child(ScopeKind::Function);
    let block = function.child(ScopeKind::Block);
    block.declare("x", Value::Number(2.0), Mutability::Immutable).unwrap();

    assert_eq!(block.lookup("x").map(|v| v.to_display()), Some(String::from("2")));
    assert_eq!(function.lookup("x").map(|v| v.to_display()), Some(String::from("1")));
    assert!(block.lookup("missing").is_none());

    assert_eq!(block.assign("x", Value::Null), Err(AssignError::Immutable));
    assert_eq!(function.assign("x", Value::Null), Ok(()));
    assert_eq!(global.lookup("x").map(|v| v.to_display()), Some(String::from("null")));
    assert_eq!(block.assign("y", Value::Null), Err(AssignError::Undefined));

    assert!(block.function_scope().ptr_eq(&function));
    assert!(block.global().ptr_eq(&global));
    assert!(global.function_scope().ptr_eq(&global));

    assert_eq!(
        block.declare("x", Value::Null, Mutability::Mutable),
        Err(ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("x")
        })
    );
}

#[test]
fn test_copy_bindings_is_independent() {
    let global = Env::new_global();
    let loop_env = global.child(ScopeKind::Block);
    loop_env.declare("i", Value::Number(0.0), Mutability::Mutable).unwrap();

    let copy = loop_env.copy_bindings();
    copy.assign("i", Value::Number(1.0)).unwrap();

    assert_eq!(loop_env.lookup("i").map(|v| v.to_display()), Some(String::from("0")));
    assert_eq!(copy.lookup("i").map(|v| v.to_display()), Some(String::from("1")));
    assert_eq!(copy.kind(), ScopeKind::Block);
}

#[test]
fn test_property_keys() {
    assert_eq!(PropertyKey::from_value(&Value::Number(2.0)), PropertyKey::Index(2));
    assert_eq!(PropertyKey::from_value(&Value::string("10")), PropertyKey::Index(10));
    assert_eq!(
        PropertyKey::from_value(&Value::string("010")),
        PropertyKey::Name(Rc::from("010"))
    );
    assert_eq!(
        PropertyKey::from_value(&Value::Number(1.5)),
        PropertyKey::Name(Rc::from("1.5"))
    );
    assert_eq!(
        PropertyKey::from_value(&Value::Boolean(true)),
        PropertyKey::Name(Rc::from("true"))
    );
}

#[test]
fn test_member_access_per_variant() {
    let array = Value::new_array(vec![Value::Number(1.0)]);
    set_member(&array, &PropertyKey::Index(3), Value::Number(4.0)).unwrap();
    assert_eq!(array.to_display(), "[ 1, undefined, undefined, 4 ]");
    assert_eq!(
        get_member(&array, &PropertyKey::Name(Rc::from("length"))).map(|v| v.to_display()),
        Ok(String::from("4"))
    );
    assert_eq!(
        get_member(&array, &PropertyKey::Index(9)).map(|v| v.to_display()),
        Ok(String::from("undefined"))
    );
    assert_eq!(
        set_member(&array, &PropertyKey::Name(Rc::from("foo")), Value::Null),
        Err(ErrorImpl::PropertyAssignment {
            property: String::from("foo"),
            target: String::from("array"),
        })
    );

    let string = Value::string("héllo");
    assert_eq!(
        get_member(&string, &PropertyKey::Index(1)).map(|v| v.to_display()),
        Ok(String::from("é"))
    );
    assert_eq!(
        get_member(&string, &PropertyKey::Name(Rc::from("length"))).map(|v| v.to_display()),
        Ok(String::from("5"))
    );

    assert_eq!(
        get_member(&Value::Number(1.0), &PropertyKey::Name(Rc::from("x"))).map(|v| v.to_display()),
        Ok(String::from("undefined"))
    );
    assert_eq!(
        get_member(&Value::Null, &PropertyKey::Name(Rc::from("x"))).map(|v| v.to_display()),
        Err(ErrorImpl::PropertyOfNullish {
            property: String::from("x"),
            value: String::from("null"),
        })
    );
}

#[test]
fn test_array_methods() {
    assert_eq!(
        output("let a = [1]; console.log(a.push(2, 3), a, a.pop(), a.length);"),
        "3 [ 1, 2 ] 3 2\n"
    );
    assert_eq!(output("let a = []; console.log(a.pop());"), "undefined\n");
    assert_eq!(output("let a = [1, 2, 3]; a.length = 1; console.log(a);"), "[ 1 ]\n");
}

#[test]
fn test_function_members() {
    assert_eq!(
        output("function add(a, b) { return a + b; } console.log(add.name, add.length);"),
        "add 2\n"
    );
    assert_eq!(output("let f = x => x; console.log(f.name);"), "f\n");
    assert_eq!(output("let o = { m: function () {} }; console.log(o.m.name);"), "m\n");
    assert!(matches!(
        error("function f() {} f.name = 'g';"),
        ErrorImpl::PropertyAssignment { .. }
    ));
}

#[test]
fn test_prototype_chain() {
    let source = "
        let base = { greet: function () { return 'hi'; }, kind: 'base' };
        let child = Object.create(base);
        child.kind = 'child';
        console.log(child.greet(), child.kind, base.kind, Object.keys(child));
    ";
    assert_eq!(output(source), "hi child base [ 'kind' ]\n");

    assert_eq!(output("let o = Object.create(null); console.log(o.x);"), "undefined\n");
    assert_eq!(
        error("Object.create(1);"),
        ErrorImpl::InvalidPrototype {
            found: String::from("number")
        }
    );
}

#[test]
fn test_object_keys_in_insertion_order() {
    assert_eq!(
        output("let o = { b: 1, a: 2 }; o.c = 3; o.b = 4; console.log(Object.keys(o), o);"),
        "[ 'b', 'a', 'c' ] { b: 4, a: 2, c: 3 }\n"
    );
}

#[test]
fn test_typeof() {
    assert_eq!(
        output("console.log(typeof 1, typeof 'a', typeof true, typeof undefined, typeof null, typeof [], typeof {}, typeof console.log, typeof missing);"),
        "number string boolean undefined object object object function undefined\n"
    );
}

#[test]
fn test_var_hoisting() {
    assert_eq!(
        output("function f() { x = 5; var x; return x; } console.log(f());"),
        "5\n"
    );
    assert_eq!(output("console.log(y); var y = 1; console.log(y);"), "undefined\n1\n");
    assert_eq!(
        output("function f() { if (true) { var inner = 'seen'; } return inner; } console.log(f());"),
        "seen\n"
    );
    assert_eq!(
        output("function t() { if (true) { var x = 5; } return x; } console.log(t());"),
        "5\n"
    );
    assert_eq!(
        error("function t() { if (true) { let x = 5; } return x; } t();"),
        ErrorImpl::VariableNotDeclared {
            variable: String::from("x")
        }
    );
}

#[test]
fn test_let_is_block_scoped() {
    assert_eq!(
        output("let x = 1; { let x = 2; console.log(x); } console.log(x);"),
        "2\n1\n"
    );
    assert_eq!(
        error("{ let hidden = 1; } hidden;"),
        ErrorImpl::VariableNotDeclared {
            variable: String::from("hidden")
        }
    );
    assert_eq!(
        error("let x = 1; let x = 2;"),
        ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("x")
        }
    );
}

#[test]
fn test_mutual_recursion_before_declaration() {
    let source = "
        console.log(isEven(10));
        function isEven(n) { if (n === 0) { return true; } return isOdd(n - 1); }
        function isOdd(n) { if (n === 0) { return false; } return isEven(n - 1); }
    ";
    assert_eq!(output(source), "true\n");
}

#[test]
fn test_named_function_expression_sees_itself() {
    let source = "
        let fact = function inner(n) { if (n <= 1) { return 1; } return n * inner(n - 1); };
        console.log(fact(5), typeof inner);
    ";
    assert_eq!(output(source), "120 undefined\n");
}

#[test]
fn test_for_let_binds_per_iteration() {
    let source = "
        let fns = [];
        for (let i = 0; i < 3; i++) { fns.push(() => i); }
        console.log(fns[0](), fns[1](), fns[2]());
        let shared = [];
        for (var j = 0; j < 3; j++) { shared.push(() => j); }
        console.log(shared[0](), shared[2]());
    ";
    assert_eq!(output(source), "0 1 2\n3 3\n");
}

#[test]
fn test_compound_assignment_evaluates_target_once() {
    let source = "
        let calls = 0;
        let o = { n: 1 };
        function target() { calls++; return o; }
        target().n += 2;
        target().n++;
        console.log(o.n, calls);
    ";
    assert_eq!(output(source), "4 2\n");
}

#[test]
fn test_update_expressions() {
    assert_eq!(
        output("let x = 1; let a = x++; let b = ++x; let c = x--; let d = --x; console.log(a, b, c, d, x);"),
        "1 3 3 1 1\n"
    );
    assert_eq!(output("let s = '5'; s++; console.log(s, typeof s);"), "6 number\n");
    assert_eq!(output("let a = [1]; a[0] += 10; a[0]--; console.log(a[0]);"), "10\n");
}

#[test]
fn test_undeclared_assignment_creates_global() {
    assert_eq!(output("function f() { leaked = 3; } f(); console.log(leaked);"), "3\n");
}

#[test]
fn test_runtime_errors() {
    assert_eq!(
        error("const x = 1; x = 2;"),
        ErrorImpl::ConstAssignment {
            variable: String::from("x")
        }
    );
    assert_eq!(
        error("let o = {}; o.missing();"),
        ErrorImpl::NotCallable {
            callee: String::from("o.missing")
        }
    );
    assert_eq!(
        error("null.x;"),
        ErrorImpl::PropertyOfNullish {
            property: String::from("x"),
            value: String::from("null"),
        }
    );
    assert_eq!(
        error("let u; u.x = 1;"),
        ErrorImpl::PropertyOfNullish {
            property: String::from("x"),
            value: String::from("undefined"),
        }
    );
    assert_eq!(
        error("-{};"),
        ErrorImpl::InvalidOperand {
            operator: String::from("-"),
            operand: String::from("object"),
        }
    );
}

#[test]
fn test_runtime_error_position_and_kind() {
    let error = run("let a = 1;\nlet b = a + missing;").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().column, 13);
}

#[test]
fn test_stack_overflow() {
    let config = InterpreterConfig::default().with_max_call_depth(200);
    let (mut interpreter, _) = Interpreter::buffered(config);
    let error = interpreter
        .run_source("function down(n) { return down(n + 1); } down(0);")
        .unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::StackOverflow { depth: 200 }
    );

    // Depth is released after the error, so the interpreter stays usable.
    interpreter.run_source("function ok() { return 1; } ok();").unwrap();
}

#[test]
fn test_default_depth_survives_deep_recursion() {
    let (mut interpreter, output) = Interpreter::buffered(InterpreterConfig::default());
    interpreter
        .run_source("function depth(n) { if (n === 0) { return 0; } return 1 + depth(n - 1); } console.log(depth(5000));")
        .unwrap();
    assert_eq!(output.get_output(), "5000\n");
}

#[test]
fn test_step_limit() {
    let config = InterpreterConfig::default().with_step_limit(Some(100));
    let (mut interpreter, _) = Interpreter::buffered(config);
    let error = interpreter.run_source("while (true) {}").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::StepLimitExceeded { limit: 100 }
    );
}

#[test]
fn test_interrupt_hook() {
    let seen = Rc::new(Cell::new(0));
    let seen_in_hook = Rc::clone(&seen);

    let (mut interpreter, _) = Interpreter::buffered(InterpreterConfig::default());
    interpreter.set_interrupt_hook(move |steps| {
        seen_in_hook.set(steps);
        steps < 50
    });

    let error = interpreter.run_source("let i = 0; while (true) { i++; }").unwrap_err();
    assert_eq!(error.get_internal_error(), &ErrorImpl::Interrupted { steps: 50 });
    assert_eq!(seen.get(), 50);
}

#[test]
fn test_globals_persist_across_runs() {
    let (mut interpreter, output) = Interpreter::buffered(InterpreterConfig::default());
    interpreter.run_source("let count = 1; function bump() { count++; }").unwrap();
    interpreter.run_source("bump(); bump(); console.log(count);").unwrap();
    assert_eq!(output.get_output(), "3\n");
}

#[test]
fn test_var_and_function_cannot_redeclare_const() {
    let (mut interpreter, output) = Interpreter::buffered(InterpreterConfig::default());
    interpreter.run_source("const c = 1; const g = 1;").unwrap();

    for source in ["var c = 2;", "var c;", "function g() { return 9; } console.log(g);"] {
        let error = interpreter.run_source(source).unwrap_err();
        assert!(
            matches!(error.get_internal_error(), ErrorImpl::VariableAlreadyDeclared { .. }),
            "{}",
            source
        );
    }

    let error = interpreter.run_source("c = 3;").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConstAssignment {
            variable: String::from("c")
        }
    );

    interpreter.run_source("console.log(c, g);").unwrap();
    assert_eq!(output.get_output(), "1 1\n");
}

#[test]
fn test_const_conflicts_within_one_program() {
    assert_eq!(
        error("const g = 1; function g() {}"),
        ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("g")
        }
    );
    assert_eq!(
        error("function f() { const x = 1; var x = 2; } f();"),
        ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("x")
        }
    );
    assert_eq!(output("var a = 1; var a; console.log(a);"), "1\n");
    assert_eq!(output("function h() { return 1; } function h() { return 2; } console.log(h());"), "2\n");
}

#[test]
fn test_oversized_array_writes() {
    let (mut interpreter, _) = Interpreter::buffered(InterpreterConfig::default());
    interpreter.run_source("let a = [1, 2];").unwrap();

    let cases = [
        (String::from("a[3000000000] = 1;"), String::from("3000000001")),
        (String::from("a.length = 4000000000;"), String::from("4000000000")),
        (
            format!("a[{}] = 1;", MAX_ARRAY_LENGTH),
            (MAX_ARRAY_LENGTH + 1).to_string(),
        ),
        (String::from("a.length = -1;"), String::from("-1")),
        (String::from("a.length = 1.5;"), String::from("1.5")),
    ];
    for (source, length) in cases {
        let error = interpreter.run_source(&source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Runtime);
        assert_eq!(
            error.get_internal_error(),
            &ErrorImpl::InvalidArrayLength { length },
            "{}",
            source
        );
    }

    let a = interpreter.globals().lookup("a").map(|a| a.to_display());
    assert_eq!(a, Some(String::from("[ 1, 2 ]")));
}

#[test]
fn test_numeric_globals() {
    assert_eq!(
        output("console.log(Infinity, -Infinity, NaN, typeof NaN, 1 / 0 === Infinity);"),
        "Infinity -Infinity NaN number true\n"
    );
    assert_eq!(
        output("console.log(isFinite(1), isFinite('12'), isFinite(null), isFinite(Infinity), isFinite(NaN), isFinite(), isFinite({}));"),
        "true true true false false false false\n"
    );
    assert_eq!(
        error("NaN = 1;"),
        ErrorImpl::ConstAssignment {
            variable: String::from("NaN")
        }
    );
    assert_eq!(
        error("let Infinity = 1;"),
        ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("Infinity")
        }
    );
}

#[test]
fn test_global_this() {
    assert_eq!(
        output("console.log(globalThis.Infinity, globalThis.undefined, globalThis.isFinite === isFinite, globalThis.console === console, globalThis.Object === Object);"),
        "Infinity undefined true true true\n"
    );
    assert_eq!(output("console.log(typeof globalThis, isFinite);"), "object [Function: isFinite]\n");
}

#[test]
fn test_console_error_shares_the_output_channel() {
    assert_eq!(
        output("console.log('a'); console.error('b', 1, [2]); console.log('c');"),
        "a\nb 1 [ 2 ]\nc\n"
    );
}

#[test]
fn test_print_handlers() {
    let buffer = BufferPrintHandler::new();
    let handler = PrintHandlerImpl::Buffer(buffer.clone());
    handler.println("out");
    handler.eprintln("err");
    assert_eq!(handler.get_output(), "out\nerr\n");
    assert_eq!(buffer.get_output(), "out\nerr\n");

    handler.clear();
    assert_eq!(buffer.get_output(), "");

    let silent = PrintHandlerImpl::Silent;
    silent.println("dropped");
    silent.eprintln("dropped");
    silent.clear();
    assert_eq!(silent.get_output(), "");
}

#[test]
fn test_silent_interpreter() {
    let mut interpreter = Interpreter::new().with_print_handler(PrintHandlerImpl::Silent);
    interpreter.run_source("console.log('hidden');").unwrap();

    assert!(matches!(interpreter.print_handler(), PrintHandlerImpl::Silent));
    assert_eq!(interpreter.get_output(), "");
}

#[test]
fn test_steps_count_each_run() {
    let (mut interpreter, _) = Interpreter::buffered(InterpreterConfig::default());

    interpreter.run_source("let a = 1; if (a) { a = 2; }").unwrap();
    assert_eq!(interpreter.steps(), 4);

    interpreter.run_source("a;").unwrap();
    assert_eq!(interpreter.steps(), 1);
    assert_eq!(
        interpreter.globals().lookup("a").map(|a| a.to_display()),
        Some(String::from("2"))
    );
}
