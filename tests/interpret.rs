//! Interpreter integration tests
//!
//! Tests the full pipeline: AST → Interpreter::execute → bindings and result

use ecmalite::ast::*;
use ecmalite::config::{ArityPolicy, Config};
use ecmalite::interp::{Interpreter, Value};
use ecmalite::{RuntimeError, execute_json};
use pretty_assertions::assert_eq;

/// Helper to run a program and hand back the interpreter for inspection
fn run(program: &Program) -> Interpreter {
    let mut interpreter = Interpreter::new();
    if let Err(e) = interpreter.execute(program) {
        panic!("Interpretation failed: {}", e);
    }
    interpreter
}

/// Helper to check the result of a program
fn assert_result(program: &Program, expected: Value) {
    match ecmalite::execute(program) {
        Ok(v) => assert_eq!(v, expected),
        Err(e) => panic!("Interpretation failed: {}", e),
    }
}

/// Helper to check that a program faults with `expected`
fn assert_fault(program: &Program, expected: RuntimeError) {
    match ecmalite::execute(program) {
        Ok(v) => panic!("Expected {:?}, got {:?}", expected, v),
        Err(e) => assert_eq!(e, expected),
    }
}

fn call(name: &str, args: Vec<Expression>) -> Expression {
    Expression::call(Expression::ident(name), args)
}

// ==================== Declarations ====================

#[test]
fn test_declaration_sequence() {
    // const b = 10 * 2; const a = b + 1;
    let program = Program::script()
        .with(Statement::declare(
            VariableKind::Const,
            "b",
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::literal(10.0),
                Expression::literal(2.0),
            ),
        ))
        .with(Statement::declare(
            VariableKind::Const,
            "a",
            Expression::binary(
                BinaryOperator::Add,
                Expression::ident("b"),
                Expression::literal(1.0),
            ),
        ));

    let interp = run(&program);
    assert_eq!(interp.get_variable("b"), Some(Value::Number(20.0)));
    assert_eq!(interp.get_variable("a"), Some(Value::Number(21.0)));
}

#[test]
fn test_declaration_without_init_binds_undefined() {
    let program = Program::script().with(Statement::VariableDeclaration(VariableDeclaration {
        kind: VariableKind::Var,
        declarations: vec![
            VariableDeclarator {
                id: Expression::ident("x"),
                init: None,
            },
            VariableDeclarator {
                id: Expression::ident("y"),
                init: Some(Expression::literal("set")),
            },
        ],
    }));

    let interp = run(&program);
    assert_eq!(interp.get_variable("x"), Some(Value::Undefined));
    assert_eq!(interp.get_variable("y"), Some(Value::from("set")));
}

// ==================== Calls ====================

#[test]
fn test_call_returns_value_and_balances_frames() {
    // function inc(a) { return 3 + 1; }  inc();
    let program = Program::script()
        .with(Statement::function(
            "inc",
            &["a"],
            vec![Statement::ret(Expression::binary(
                BinaryOperator::Add,
                Expression::literal(3),
                Expression::literal(1),
            ))],
        ))
        .with(Statement::expression(call("inc", vec![])));

    let mut interp = Interpreter::new();
    let before = interp.frame_count();
    let result = interp.execute(&program).unwrap();

    assert_eq!(result, Value::Int(4));
    assert_eq!(interp.frame_count(), before);
}

#[test]
fn test_params_bind_positionally() {
    // function add(x, y) { return x + y; }  add(2, 3);
    let program = Program::script()
        .with(Statement::function(
            "add",
            &["x", "y"],
            vec![Statement::ret(Expression::binary(
                BinaryOperator::Add,
                Expression::ident("x"),
                Expression::ident("y"),
            ))],
        ))
        .with(Statement::expression(call(
            "add",
            vec![Expression::literal(2), Expression::literal(3)],
        )));

    assert_result(&program, Value::Int(5));
}

#[test]
fn test_missing_argument_is_undefined() {
    // function id(x) { return x; }  id();
    let program = Program::script()
        .with(Statement::function(
            "id",
            &["x"],
            vec![Statement::ret(Expression::ident("x"))],
        ))
        .with(Statement::expression(call("id", vec![])));

    assert_result(&program, Value::Undefined);
}

#[test]
fn test_body_without_return_yields_undefined() {
    let program = Program::script()
        .with(Statement::function(
            "noop",
            &[],
            vec![Statement::expression(Expression::literal(1))],
        ))
        .with(Statement::expression(call("noop", vec![])));

    assert_result(&program, Value::Undefined);
}

#[test]
fn test_return_propagates_out_of_nested_blocks() {
    // function pick(flag) { if (flag) { return 1; } return 2; }
    let pick = Statement::function(
        "pick",
        &["flag"],
        vec![
            Statement::if_then(
                Expression::ident("flag"),
                Statement::block(vec![Statement::ret(Expression::literal(1))]),
            ),
            Statement::ret(Expression::literal(2)),
        ],
    );

    let taken = Program::script()
        .with(pick.clone())
        .with(Statement::expression(call("pick", vec![Expression::literal(true)])));
    assert_result(&taken, Value::Int(1));

    let skipped = Program::script()
        .with(pick)
        .with(Statement::expression(call("pick", vec![Expression::literal(false)])));
    assert_result(&skipped, Value::Int(2));
}

#[test]
fn test_recursion() {
    // function fact(n) { if (n > 1) { return n * fact(n - 1); } return 1; }
    let program = Program::script()
        .with(Statement::function(
            "fact",
            &["n"],
            vec![
                Statement::if_then(
                    Expression::binary(
                        BinaryOperator::GreaterThan,
                        Expression::ident("n"),
                        Expression::literal(1),
                    ),
                    Statement::block(vec![Statement::ret(Expression::binary(
                        BinaryOperator::Multiply,
                        Expression::ident("n"),
                        call(
                            "fact",
                            vec![Expression::binary(
                                BinaryOperator::Subtract,
                                Expression::ident("n"),
                                Expression::literal(1),
                            )],
                        ),
                    ))]),
                ),
                Statement::ret(Expression::literal(1)),
            ],
        ))
        .with(Statement::expression(call("fact", vec![Expression::literal(5)])));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(120)));
    assert_eq!(interp.frame_count(), 1);
}

#[test]
fn test_closure_outlives_defining_call() {
    // function outer() { let secret = 7; function inner() { return secret; } return inner; }
    // const g = outer(); g();
    let program = Program::script()
        .with(Statement::function(
            "outer",
            &[],
            vec![
                Statement::declare(VariableKind::Let, "secret", Expression::literal(7)),
                Statement::function("inner", &[], vec![Statement::ret(Expression::ident("secret"))]),
                Statement::ret(Expression::ident("inner")),
            ],
        ))
        .with(Statement::declare(
            VariableKind::Const,
            "g",
            call("outer", vec![]),
        ))
        .with(Statement::expression(call("g", vec![])));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(7)));
    assert_eq!(interp.get_variable("secret"), None);
}

#[test]
fn test_callee_does_not_see_caller_locals() {
    // function peek() { return hidden; }
    // function caller() { let hidden = 1; return peek(); }
    let program = Program::script()
        .with(Statement::function("peek", &[], vec![Statement::ret(Expression::ident("hidden"))]))
        .with(Statement::function(
            "caller",
            &[],
            vec![
                Statement::declare(VariableKind::Let, "hidden", Expression::literal(1)),
                Statement::ret(call("peek", vec![])),
            ],
        ))
        .with(Statement::expression(call("caller", vec![])));

    assert_result(&program, Value::Undefined);
}

#[test]
fn test_calling_unknown_name_faults() {
    let program = Program::script().with(Statement::expression(call("missing", vec![])));
    assert_fault(
        &program,
        RuntimeError::UndefinedFunction {
            name: "missing".to_string(),
        },
    );
}

#[test]
fn test_calling_non_function_faults() {
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "n", Expression::literal(1)))
        .with(Statement::expression(call("n", vec![])));
    assert_fault(
        &program,
        RuntimeError::WrongVariant {
            expected: "function",
            found: "int",
        },
    );
}

#[test]
fn test_runaway_recursion_hits_depth_limit() {
    // function forever() { return forever(); }
    let program = Program::script()
        .with(Statement::function("forever", &[], vec![Statement::ret(call("forever", vec![]))]))
        .with(Statement::expression(call("forever", vec![])));

    let mut interp = Interpreter::with_config(Config::default().with_max_call_depth(16));
    assert_eq!(
        interp.execute(&program),
        Err(RuntimeError::CallDepthExceeded { limit: 16 })
    );
    assert_eq!(interp.frame_count(), 1);
}

#[test]
fn test_default_depth_limit_is_reached_without_overflow() {
    let program = Program::script()
        .with(Statement::function("forever", &[], vec![Statement::ret(call("forever", vec![]))]))
        .with(Statement::expression(call("forever", vec![])));

    let mut interp = Interpreter::new();
    assert_eq!(
        interp.execute(&program),
        Err(RuntimeError::CallDepthExceeded {
            limit: ecmalite::config::DEFAULT_MAX_CALL_DEPTH
        })
    );
    assert_eq!(interp.frame_count(), 1);
}

#[test]
fn test_strict_arity() {
    let program = Program::script()
        .with(Statement::function("two", &["a", "b"], vec![]))
        .with(Statement::expression(call("two", vec![Expression::literal(1)])));

    let mut strict = Interpreter::with_config(Config::default().with_arity(ArityPolicy::Strict));
    assert_eq!(
        strict.execute(&program),
        Err(RuntimeError::ArityMismatch {
            name: "two".to_string(),
            expected: 2,
            found: 1,
        })
    );

    let mut lenient = Interpreter::new();
    assert_eq!(lenient.execute(&program), Ok(Value::Undefined));
}

// ==================== Control flow ====================

fn doubling_program(test: Expression) -> Program {
    // let t = 2; if (test) { t *= 2; }
    Program::script()
        .with(Statement::declare(VariableKind::Let, "t", Expression::literal(2)))
        .with(Statement::if_then(
            test,
            Statement::block(vec![Statement::expression(Expression::assign(
                AssignmentOperator::MultiplicationAssignment,
                Expression::ident("t"),
                Expression::literal(2),
            ))]),
        ))
}

#[test]
fn test_if_taken() {
    let program = doubling_program(Expression::binary(
        BinaryOperator::GreaterThan,
        Expression::literal(10),
        Expression::literal(2),
    ));
    assert_eq!(run(&program).get_variable("t"), Some(Value::Int(4)));
}

#[test]
fn test_if_not_taken() {
    let program = doubling_program(Expression::binary(
        BinaryOperator::GreaterThan,
        Expression::literal(2),
        Expression::literal(10),
    ));
    assert_eq!(run(&program).get_variable("t"), Some(Value::Int(2)));
}

#[test]
fn test_if_else_uses_truthiness() {
    let program = |test: Value| {
        Program::script().with(Statement::if_else(
            Expression::literal(test),
            Statement::expression(Expression::literal("yes")),
            Statement::expression(Expression::literal("no")),
        ))
    };

    assert_result(&program(Value::from("")), Value::from("no"));
    assert_result(&program(Value::from("x")), Value::from("yes"));
    assert_result(&program(Value::nan()), Value::from("no"));
    assert_result(&program(Value::Null), Value::from("no"));
    assert_result(&program(Value::Object), Value::from("yes"));
}

#[test]
fn test_top_level_return_ends_program() {
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "x", Expression::literal(1)))
        .with(Statement::ret(Expression::literal("early")))
        .with(Statement::declare(VariableKind::Let, "y", Expression::literal(2)));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::from("early")));
    assert_eq!(interp.get_variable("y"), None);
}

// ==================== Assignment ====================

#[test]
fn test_assignment_yields_stored_value() {
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "s", Expression::literal("a")))
        .with(Statement::expression(Expression::assign(
            AssignmentOperator::AdditionAssignment,
            Expression::ident("s"),
            Expression::literal(1),
        )));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::from("a1")));
    assert_eq!(interp.get_variable("s"), Some(Value::from("a1")));
}

#[test]
fn test_increment_and_decrement() {
    let bump = |op| {
        Statement::expression(Expression::assign(
            op,
            Expression::ident("n"),
            Expression::literal(Value::Undefined),
        ))
    };
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "n", Expression::literal(5)))
        .with(bump(AssignmentOperator::Increment))
        .with(bump(AssignmentOperator::Increment))
        .with(bump(AssignmentOperator::Decrement));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(6)));
    assert_eq!(interp.get_variable("n"), Some(Value::Int(6)));
}

#[test]
fn test_compound_division_by_zero_faults() {
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "d", Expression::literal(8)))
        .with(Statement::expression(Expression::assign(
            AssignmentOperator::DivisionAssignment,
            Expression::ident("d"),
            Expression::literal(0),
        )));
    assert_fault(&program, RuntimeError::DivisionByZero);
}

// ==================== Evaluation order ====================

fn assign(name: &str, value: Expression) -> Expression {
    Expression::assign(AssignmentOperator::Assignment, Expression::ident(name), value)
}

#[test]
fn test_binary_operands_left_then_right() {
    // let x = 0; (x = 1) + (x = 2);
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "x", Expression::literal(0)))
        .with(Statement::expression(Expression::binary(
            BinaryOperator::Add,
            assign("x", Expression::literal(1)),
            assign("x", Expression::literal(2)),
        )));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(3)));
    assert_eq!(interp.get_variable("x"), Some(Value::Int(2)));
}

#[test]
fn test_binary_right_operand_runs_after_falsy_left() {
    // let x = 7; (x = 0) * (x = 5);
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "x", Expression::literal(7)))
        .with(Statement::expression(Expression::binary(
            BinaryOperator::Multiply,
            assign("x", Expression::literal(0)),
            assign("x", Expression::literal(5)),
        )));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(0)));
    assert_eq!(interp.get_variable("x"), Some(Value::Int(5)));
}

#[test]
fn test_arguments_left_to_right() {
    // let y = ""; function f(a, b) { return a + b; }  f((y = "a"), (y = y + "b"));
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "y", Expression::literal("")))
        .with(Statement::function(
            "f",
            &["a", "b"],
            vec![Statement::ret(Expression::binary(
                BinaryOperator::Add,
                Expression::ident("a"),
                Expression::ident("b"),
            ))],
        ))
        .with(Statement::expression(call(
            "f",
            vec![
                assign("y", Expression::literal("a")),
                assign(
                    "y",
                    Expression::binary(
                        BinaryOperator::Add,
                        Expression::ident("y"),
                        Expression::literal("b"),
                    ),
                ),
            ],
        )));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::from("aab")));
    assert_eq!(interp.get_variable("y"), Some(Value::from("ab")));
}

#[test]
fn test_callee_resolved_before_arguments() {
    // function f(v) { return v; }  f(f = 1);
    let program = Program::script()
        .with(Statement::function("f", &["v"], vec![Statement::ret(Expression::ident("v"))]))
        .with(Statement::expression(call(
            "f",
            vec![assign("f", Expression::literal(1))],
        )));

    let mut interp = Interpreter::new();
    assert_eq!(interp.execute(&program), Ok(Value::Int(1)));
    assert_eq!(interp.get_variable("f"), Some(Value::Int(1)));
}

#[test]
fn test_if_test_evaluated_once() {
    // let t = 0; if ((t += 1) > 0) {}
    let bump = Expression::assign(
        AssignmentOperator::AdditionAssignment,
        Expression::ident("t"),
        Expression::literal(1),
    );
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "t", Expression::literal(0)))
        .with(Statement::if_else(
            Expression::binary(BinaryOperator::GreaterThan, bump, Expression::literal(0)),
            Statement::block(vec![]),
            Statement::block(vec![]),
        ));

    assert_eq!(run(&program).get_variable("t"), Some(Value::Int(1)));
}

// ==================== Unsupported shapes ====================

#[test]
fn test_member_expressions_fault() {
    let member = || Expression::member(Expression::ident("obj"), "prop");

    let read = Program::script().with(Statement::expression(member()));
    assert_fault(
        &read,
        RuntimeError::UnsupportedExpression {
            shape: "member expression",
        },
    );

    let called = Program::script().with(Statement::expression(Expression::call(member(), vec![])));
    assert_fault(
        &called,
        RuntimeError::UnsupportedCallee {
            shape: "member expression",
        },
    );

    let assigned = Program::script().with(Statement::expression(Expression::assign(
        AssignmentOperator::Assignment,
        member(),
        Expression::literal(1),
    )));
    assert_fault(
        &assigned,
        RuntimeError::UnsupportedTarget {
            shape: "member expression",
        },
    );

    let declared = Program::script().with(Statement::VariableDeclaration(VariableDeclaration {
        kind: VariableKind::Let,
        declarations: vec![VariableDeclarator {
            id: member(),
            init: None,
        }],
    }));
    assert_fault(
        &declared,
        RuntimeError::UnsupportedTarget {
            shape: "member expression",
        },
    );
}

#[test]
fn test_unsupported_operator_faults() {
    let program = Program::script().with(Statement::expression(Expression::binary(
        BinaryOperator::Modulo,
        Expression::literal(7),
        Expression::literal(2),
    )));
    assert_fault(&program, RuntimeError::UnsupportedOperator { operator: "%" });
}

// ==================== Recovery ====================

#[test]
fn test_execute_recovering_collects_every_fault() {
    let program = Program::script()
        .with(Statement::declare(VariableKind::Let, "ok", Expression::literal(1)))
        .with(Statement::expression(call("missing", vec![])))
        .with(Statement::expression(Expression::assign(
            AssignmentOperator::Assignment,
            Expression::ident("ghost"),
            Expression::literal(1),
        )))
        .with(Statement::declare(VariableKind::Let, "after", Expression::literal(2)));

    let mut interp = Interpreter::new();
    let reporter = interp.execute_recovering(&program);

    assert_eq!(reporter.error_count(), 2);
    assert_eq!(
        reporter.into_errors(),
        vec![
            RuntimeError::UndefinedFunction {
                name: "missing".to_string()
            },
            RuntimeError::UndeclaredAssignment {
                name: "ghost".to_string()
            },
        ]
    );
    assert_eq!(interp.get_variable("ok"), Some(Value::Int(1)));
    assert_eq!(interp.get_variable("after"), Some(Value::Int(2)));
}

#[test]
fn test_fault_inside_call_leaves_stack_balanced() {
    let program = Program::script()
        .with(Statement::function(
            "bad",
            &[],
            vec![Statement::expression(Expression::assign(
                AssignmentOperator::Assignment,
                Expression::ident("nowhere"),
                Expression::literal(0),
            ))],
        ))
        .with(Statement::expression(call("bad", vec![])));

    let mut interp = Interpreter::new();
    assert!(interp.execute(&program).is_err());
    assert_eq!(interp.frame_count(), 1);
}

// ==================== JSON ====================

#[test]
fn test_non_finite_literals_survive_json() {
    // let inf = Infinity; inf * 0
    let program = Program::script()
        .with(Statement::declare(
            VariableKind::Let,
            "inf",
            Expression::literal(f64::INFINITY),
        ))
        .with(Statement::expression(Expression::binary(
            BinaryOperator::Multiply,
            Expression::ident("inf"),
            Expression::literal(0.0),
        )));
    let json = serde_json::to_string(&program).unwrap();
    assert!(json.contains(r#""Infinity""#));

    let value = execute_json(&json, Config::default()).unwrap();
    assert!(value.is_nan());
}

#[test]
fn test_json_program_executes() {
    let program = ecmalite::demo::sample_program();
    let json = serde_json::to_string(&program).unwrap();
    let value = execute_json(&json, Config::default()).unwrap();
    // Last statement is the `if`, whose block yields the assignment's value
    assert_eq!(value, Value::Int(4));
}
