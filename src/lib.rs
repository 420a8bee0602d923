//! ecmalite: execution core of a small ECMAScript-flavoured interpreter
//!
//! A dynamically typed [`Value`] model plus a tree-walking evaluator over an
//! AST that some external producer (a parser, a test, a JSON document) has
//! already built.
//!
//! # Architecture
//!
//! ```text
//! Program (AST) → Interpreter::execute → Statement/Expression::execute → Value
//!                        │
//!                        └── frame chain (global → call frames), function table
//! ```
//!
//! # Example
//!
//! ```
//! use ecmalite::ast::{BinaryOperator, Expression, Program, Statement, VariableKind};
//! use ecmalite::interp::{Interpreter, Value};
//!
//! // const b = 10 * 2; const a = b + 1;
//! let program = Program::script()
//!     .with(Statement::declare(
//!         VariableKind::Const,
//!         "b",
//!         Expression::binary(BinaryOperator::Multiply, Expression::literal(10.0), Expression::literal(2.0)),
//!     ))
//!     .with(Statement::declare(
//!         VariableKind::Const,
//!         "a",
//!         Expression::binary(BinaryOperator::Add, Expression::ident("b"), Expression::literal(1.0)),
//!     ));
//!
//! let mut interpreter = Interpreter::new();
//! interpreter.execute(&program).unwrap();
//! assert_eq!(interpreter.get_variable("a"), Some(Value::Number(21.0)));
//! ```

pub mod ast;
pub mod config;
pub mod demo;
pub mod diagnostics;
pub mod interp;

pub use config::Config;
pub use diagnostics::{Reporter, RuntimeError};

// Re-exports for convenience
pub use ast::Program;
pub use interp::{Interpreter, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a program in a fresh interpreter
pub fn execute(program: &Program) -> Result<Value, RuntimeError> {
    let mut interpreter = Interpreter::new();
    interpreter.execute(program)
}

/// Run a program handed over as JSON
pub fn execute_json(json: &str, config: Config) -> miette::Result<Value> {
    let program: Program =
        serde_json::from_str(json).map_err(|e| miette::miette!("Invalid program: {}", e))?;
    let mut interpreter = Interpreter::with_config(config);
    Ok(interpreter.execute(&program)?)
}
