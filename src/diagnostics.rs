//! Runtime diagnostics
//!
//! Every fault the evaluator can raise is a variant of [`RuntimeError`].
//! Faults abort the evaluation that raised them; hosts that want to keep going
//! collect them in a [`Reporter`].

use miette::Diagnostic;
use thiserror::Error;

/// Evaluation fault
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum RuntimeError {
    // === Contract violations ===
    #[error("Expected a {expected} value, found {found}")]
    #[diagnostic(code(runtime::wrong_variant))]
    WrongVariant {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Assignment to undeclared variable `{name}`")]
    #[diagnostic(
        code(runtime::undeclared_assignment),
        help("declare it first with `var`, `let` or `const`")
    )]
    UndeclaredAssignment { name: String },

    #[error("`{name}` is not defined")]
    #[diagnostic(code(runtime::undefined_function))]
    UndefinedFunction { name: String },

    #[error("Function `{name}` expects {expected} argument(s), got {found}")]
    #[diagnostic(
        code(runtime::arity_mismatch),
        help("set `arity = \"lenient\"` to pad missing arguments with undefined")
    )]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Relational comparison of strings is not supported")]
    #[diagnostic(code(runtime::string_comparison))]
    StringComparison,

    #[error("Integer division by zero")]
    #[diagnostic(code(runtime::division_by_zero))]
    DivisionByZero,

    #[error("Maximum call depth of {limit} exceeded")]
    #[diagnostic(
        code(runtime::call_depth_exceeded),
        help("raise `max_call_depth` in the configuration or check for unbounded recursion")
    )]
    CallDepthExceeded { limit: usize },

    // === Unimplemented shapes ===
    #[error("Operator `{operator}` is not supported")]
    #[diagnostic(code(runtime::unsupported_operator))]
    UnsupportedOperator { operator: &'static str },

    #[error("Cannot call through a {shape}")]
    #[diagnostic(
        code(runtime::unsupported_callee),
        help("only plain identifiers can be called")
    )]
    UnsupportedCallee { shape: &'static str },

    #[error("Cannot bind or assign to a {shape}")]
    #[diagnostic(
        code(runtime::unsupported_target),
        help("only plain identifiers can be declared or assigned")
    )]
    UnsupportedTarget { shape: &'static str },

    #[error("Cannot evaluate a {shape}")]
    #[diagnostic(code(runtime::unsupported_expression))]
    UnsupportedExpression { shape: &'static str },
}

/// Collects the faults raised while running a program statement by statement
#[derive(Debug, Default)]
pub struct Reporter {
    errors: Vec<RuntimeError>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, error: RuntimeError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Print all diagnostics
    pub fn emit_all(&self) {
        for error in &self.errors {
            eprintln!("{:?}", miette::Report::new(error.clone()));
        }
    }

    /// Consume and return errors
    pub fn into_errors(self) -> Vec<RuntimeError> {
        self.errors
    }

    /// Get errors by reference
    pub fn errors(&self) -> &[RuntimeError] {
        &self.errors
    }
}
