//! Tree-walking interpreter for the AST
//!
//! Executes a [`Program`](crate::ast::Program) directly against a stack of
//! binding frames.

pub mod eval;
pub mod frame;
pub mod ops;
pub mod scope_guard;
pub mod stack;
pub mod value;

pub use eval::{FunctionId, FunctionObject, Interpreter};
pub use frame::{FrameRef, StackFrame};
pub use ops::{add, divide, greater_than, multiply, subtract};
pub use scope_guard::CallScope;
pub use value::{BigIntHandle, Completion, FunctionRef, Value};
