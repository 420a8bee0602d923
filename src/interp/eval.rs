//! Tree-walking interpreter
//!
//! The [`Interpreter`] owns the call stack and the function table; the
//! per-node `execute` methods below walk the tree against it.

use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

use id_arena::{Arena, Id};

use crate::ast::*;
use crate::config::{ArityPolicy, Config};
use crate::diagnostics::{Reporter, RuntimeError};

use super::frame::{FrameRef, StackFrame};
use super::ops;
use super::stack::ensure_sufficient_stack;
use super::value::{Completion, FunctionRef, Value};

/// Handle into the interpreter's function table
pub type FunctionId = Id<FunctionObject>;

/// A declared function. One entry per declaration node; the frame a value
/// closes over lives in its [`FunctionRef`].
#[derive(Debug)]
pub struct FunctionObject {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<BlockStatement>,
}

/// Tree-walking interpreter
pub struct Interpreter {
    config: Config,
    /// Global scope; never popped
    global: FrameRef,
    /// Frames pushed on top of the global one, innermost last
    frames: Vec<FrameRef>,
    functions: Arena<FunctionObject>,
    /// Table entry per declaration body; the arena keeps each body alive, so
    /// its address is never reused
    declared: HashMap<*const BlockStatement, FunctionId>,
}

impl Interpreter {
    /// Create an interpreter holding only the global frame
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter {
            config,
            global: StackFrame::new().into_ref(),
            frames: Vec::new(),
            functions: Arena::new(),
            declared: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of active frames, the global one included
    pub fn frame_count(&self) -> usize {
        self.frames.len() + 1
    }

    pub fn current_frame(&self) -> &FrameRef {
        self.frames.last().unwrap_or(&self.global)
    }

    pub fn global_frame(&self) -> &FrameRef {
        &self.global
    }

    /// Innermost frame on the current scope chain that binds `name`
    fn resolve(&self, name: &str) -> Option<FrameRef> {
        let mut frame = Some(Rc::clone(self.current_frame()));
        while let Some(current) = frame {
            if current.borrow().contains(name) {
                return Some(current);
            }
            frame = current.borrow().parent().cloned();
        }
        None
    }

    /// Look `name` up along the scope chain, innermost first
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        let value = self
            .resolve(name)
            .and_then(|frame| frame.borrow().get_variable(name));
        tracing::trace!(name, found = value.is_some(), "lookup");
        value
    }

    /// Bind `name` in the topmost frame, shadowing outer bindings
    pub fn declare_variable(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        tracing::trace!(name = %name, value = %value, "declare");
        self.current_frame().borrow_mut().set_variable(name, value);
    }

    /// Overwrite the binding of `name` in the innermost frame that owns it
    pub fn set_variable(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let Some(frame) = self.resolve(name) else {
            return Err(RuntimeError::UndeclaredAssignment {
                name: name.to_string(),
            });
        };
        tracing::trace!(name, value = %value, "assign");
        frame.borrow_mut().set_variable(name, value);
        Ok(())
    }

    /// Push a frame nested in the current one
    pub fn push_stack_frame(&mut self) {
        let frame = StackFrame::with_parent(Rc::clone(self.current_frame()));
        self.push_frame(frame.into_ref());
    }

    pub(super) fn push_frame(&mut self, frame: FrameRef) {
        self.frames.push(frame);
        tracing::trace!(depth = self.frame_count(), "push frame");
    }

    /// Pop the topmost frame; the global frame stays
    pub fn pop_stack_frame(&mut self) {
        if self.frames.pop().is_none() {
            tracing::warn!("attempted to pop the global frame");
            return;
        }
        tracing::trace!(depth = self.frame_count(), "pop frame");
    }

    /// The signal a `return` sends to the enclosing call
    pub fn return_from_stack_frame(&self, value: Value) -> Completion {
        tracing::trace!(value = %value, depth = self.frame_count(), "return");
        Completion::Return(value)
    }

    pub fn function(&self, id: FunctionId) -> Option<&FunctionObject> {
        self.functions.get(id)
    }

    /// Number of distinct function declarations seen so far
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Create the function value for a declaration, closing over the current frame
    fn make_function(&mut self, decl: &FunctionDeclaration) -> Value {
        let name = decl.id.name.clone();
        let key = Rc::as_ptr(&decl.body);
        let id = match self.declared.get(&key) {
            Some(&id) => id,
            None => {
                let id = self.functions.alloc(FunctionObject {
                    name: name.clone(),
                    params: decl.params.iter().map(|p| p.name.clone()).collect(),
                    body: Rc::clone(&decl.body),
                });
                self.declared.insert(key, id);
                id
            }
        };
        tracing::debug!(name = %name, params = decl.params.len(), "declare function");
        Value::Function(FunctionRef {
            name,
            id,
            scope: Rc::clone(self.current_frame()),
        })
    }

    /// Call a function value with already evaluated arguments
    pub fn call_function(
        &mut self,
        func: &FunctionRef,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let Some(object) = self.functions.get(func.id) else {
            return Err(RuntimeError::UndefinedFunction {
                name: func.name.clone(),
            });
        };
        let params = object.params.clone();
        let body = Rc::clone(&object.body);
        let scope = Rc::clone(&func.scope);

        if self.config.arity == ArityPolicy::Strict && params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: func.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }

        if self.frames.len() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        let mut frame = StackFrame::with_parent(scope);
        let mut args = args.into_iter();
        for param in params {
            frame.set_variable(param, args.next().unwrap_or_default());
        }

        tracing::debug!(name = %func.name, depth = self.frame_count() + 1, "call");
        let completion = {
            let mut scoped = self.scoped_call(frame.into_ref());
            execute_statements(&body.body, &mut *scoped)
        }?;
        tracing::debug!(name = %func.name, "return from call");

        Ok(match completion {
            Completion::Return(value) => value,
            Completion::Normal(_) => Value::Undefined,
        })
    }

    /// Run a whole program; the result is the value of its last statement
    /// (or of a top-level `return`)
    pub fn execute(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        tracing::debug!(
            source_type = %program.source_type,
            statements = program.body.body.len(),
            "execute program"
        );
        let value = program.execute(self)?.into_value();
        tracing::debug!(result = %value, "program finished");
        Ok(value)
    }

    /// Run each top-level statement, collecting faults instead of stopping
    pub fn execute_recovering(&mut self, program: &Program) -> Reporter {
        let mut reporter = Reporter::new();
        for statement in &program.body.body {
            match statement.execute(self) {
                Ok(Completion::Return(_)) => break,
                Ok(Completion::Normal(_)) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "statement failed");
                    reporter.error(err);
                }
            }
        }
        reporter
    }

    /// Render every active frame, global first
    pub fn dump_stack(&self) -> String {
        let mut out = String::from("Begin Stack Dump:\n");
        for frame in std::iter::once(&self.global).chain(&self.frames) {
            out.push_str(&frame.borrow().dump());
        }
        let _ = writeln!(out, "<----------------->");
        out.push_str("End Stack Dump:\n");
        out
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute a statement sequence, stopping at the first `return`
fn execute_statements(
    statements: &[Statement],
    interpreter: &mut Interpreter,
) -> Result<Completion, RuntimeError> {
    let mut last = Value::Undefined;
    for statement in statements {
        match statement.execute(interpreter)? {
            Completion::Normal(value) => last = value,
            ret @ Completion::Return(_) => return Ok(ret),
        }
    }
    Ok(Completion::Normal(last))
}

impl Program {
    pub fn execute(&self, interpreter: &mut Interpreter) -> Result<Completion, RuntimeError> {
        self.body.execute(interpreter)
    }
}

impl ScopeNode {
    pub fn execute(&self, interpreter: &mut Interpreter) -> Result<Completion, RuntimeError> {
        execute_statements(&self.body, interpreter)
    }
}

impl BlockStatement {
    pub fn execute(&self, interpreter: &mut Interpreter) -> Result<Completion, RuntimeError> {
        execute_statements(&self.body, interpreter)
    }
}

impl Statement {
    pub fn execute(&self, interpreter: &mut Interpreter) -> Result<Completion, RuntimeError> {
        ensure_sufficient_stack(|| self.eval(interpreter))
    }

    fn eval(&self, interpreter: &mut Interpreter) -> Result<Completion, RuntimeError> {
        match self {
            Statement::Block(block) => block.execute(interpreter),
            Statement::Scope(scope) => scope.execute(interpreter),
            Statement::Expression(stmt) => {
                stmt.expression.execute(interpreter).map(Completion::Normal)
            }
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    let Some(id) = declarator.id.as_identifier() else {
                        return Err(RuntimeError::UnsupportedTarget {
                            shape: declarator.id.shape(),
                        });
                    };
                    let value = match &declarator.init {
                        Some(init) => init.execute(interpreter)?,
                        None => Value::Undefined,
                    };
                    interpreter.declare_variable(id.name.clone(), value);
                }
                Ok(Completion::Normal(Value::Undefined))
            }
            Statement::FunctionDeclaration(decl) => {
                let function = interpreter.make_function(decl);
                interpreter.declare_variable(decl.id.name.clone(), function);
                Ok(Completion::Normal(Value::Undefined))
            }
            Statement::If(stmt) => {
                if stmt.test.execute(interpreter)?.to_boolean() {
                    stmt.consequent.execute(interpreter)
                } else if let Some(alternate) = &stmt.alternate {
                    alternate.execute(interpreter)
                } else {
                    Ok(Completion::Normal(Value::Undefined))
                }
            }
            Statement::Return(stmt) => {
                let value = match &stmt.argument {
                    Some(argument) => argument.execute(interpreter)?,
                    None => Value::Undefined,
                };
                Ok(interpreter.return_from_stack_frame(value))
            }
        }
    }
}

impl Expression {
    pub fn execute(&self, interpreter: &mut Interpreter) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.eval(interpreter))
    }

    fn eval(&self, interpreter: &mut Interpreter) -> Result<Value, RuntimeError> {
        match self {
            // Reading an unbound name is not a fault
            Expression::Identifier(id) => Ok(interpreter.get_variable(&id.name).unwrap_or_default()),

            Expression::Literal(lit) => Ok(lit.value.clone()),

            Expression::Call(call) => {
                let Some(callee) = call.callee.as_identifier() else {
                    return Err(RuntimeError::UnsupportedCallee {
                        shape: call.callee.shape(),
                    });
                };
                let Some(value) = interpreter.get_variable(&callee.name) else {
                    return Err(RuntimeError::UndefinedFunction {
                        name: callee.name.clone(),
                    });
                };
                let func = value.as_function()?.clone();

                let mut args = Vec::with_capacity(call.arguments.len());
                for arg in &call.arguments {
                    args.push(arg.execute(interpreter)?);
                }
                interpreter.call_function(&func, args)
            }

            Expression::Binary(bin) => {
                let left = bin.left.execute(interpreter)?;
                let right = bin.right.execute(interpreter)?;
                eval_binary(bin.operator, &left, &right)
            }

            Expression::Assignment(assign) => {
                let Some(target) = assign.left.as_identifier() else {
                    return Err(RuntimeError::UnsupportedTarget {
                        shape: assign.left.shape(),
                    });
                };

                let value = match assign.operator {
                    AssignmentOperator::Assignment => assign.right.execute(interpreter)?,
                    AssignmentOperator::AdditionAssignment => {
                        compound(assign, interpreter, BinaryOperator::Add)?
                    }
                    AssignmentOperator::SubtractionAssignment => {
                        compound(assign, interpreter, BinaryOperator::Subtract)?
                    }
                    AssignmentOperator::MultiplicationAssignment => {
                        compound(assign, interpreter, BinaryOperator::Multiply)?
                    }
                    AssignmentOperator::DivisionAssignment => {
                        compound(assign, interpreter, BinaryOperator::Divide)?
                    }
                    AssignmentOperator::Increment => ops::step(&assign.left.execute(interpreter)?, 1),
                    AssignmentOperator::Decrement => {
                        ops::step(&assign.left.execute(interpreter)?, -1)
                    }
                };

                interpreter.set_variable(&target.name, value.clone())?;
                Ok(value)
            }

            Expression::Member(_) => Err(RuntimeError::UnsupportedExpression {
                shape: self.shape(),
            }),
        }
    }
}

/// Both sides of a compound assignment are operands of `operator`
fn compound(
    assign: &AssignmentExpression,
    interpreter: &mut Interpreter,
    operator: BinaryOperator,
) -> Result<Value, RuntimeError> {
    let left = assign.left.execute(interpreter)?;
    let right = assign.right.execute(interpreter)?;
    eval_binary(operator, &left, &right)
}

fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOperator::Add => Ok(ops::add(left, right)),
        BinaryOperator::Subtract => Ok(ops::subtract(left, right)),
        BinaryOperator::Multiply => Ok(ops::multiply(left, right)),
        BinaryOperator::Divide => ops::divide(left, right),
        BinaryOperator::GreaterThan => ops::greater_than(left, right),
        _ => Err(RuntimeError::UnsupportedOperator {
            operator: op.symbol(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_global_frame_only() {
        let interp = Interpreter::new();
        assert_eq!(interp.frame_count(), 1);
        assert!(Rc::ptr_eq(interp.current_frame(), interp.global_frame()));
    }

    #[test]
    fn test_declare_shadows_and_pop_restores() {
        let mut interp = Interpreter::new();
        interp.declare_variable("x", Value::Int(1));
        interp.push_stack_frame();
        interp.declare_variable("x", Value::Int(2));
        assert_eq!(interp.get_variable("x"), Some(Value::Int(2)));
        interp.pop_stack_frame();
        assert_eq!(interp.get_variable("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_set_reaches_owning_frame() {
        let mut interp = Interpreter::new();
        interp.declare_variable("x", Value::Int(1));
        interp.push_stack_frame();
        interp.set_variable("x", Value::Int(5)).unwrap();
        interp.pop_stack_frame();
        assert_eq!(interp.get_variable("x"), Some(Value::Int(5)));
    }

    #[test]
    fn test_global_frame_is_never_popped() {
        let mut interp = Interpreter::new();
        interp.declare_variable("g", Value::Null);
        interp.pop_stack_frame();
        assert_eq!(interp.frame_count(), 1);
        assert_eq!(interp.get_variable("g"), Some(Value::Null));
    }

    #[test]
    fn test_return_signal() {
        let interp = Interpreter::new();
        assert_eq!(
            interp.return_from_stack_frame(Value::Int(3)),
            Completion::Return(Value::Int(3))
        );
    }

    #[test]
    fn test_unsupported_operators_fault() {
        for op in [
            BinaryOperator::Modulo,
            BinaryOperator::Power,
            BinaryOperator::BitwiseXor,
            BinaryOperator::LeftShift,
            BinaryOperator::Equal,
            BinaryOperator::LessThan,
        ] {
            assert_eq!(
                eval_binary(op, &Value::Int(1), &Value::Int(2)),
                Err(RuntimeError::UnsupportedOperator {
                    operator: op.symbol()
                })
            );
        }
    }

    #[test]
    fn test_function_table_records_params() {
        let mut interp = Interpreter::new();
        let program = Program::script().with(Statement::function("f", &["a", "b"], vec![]));
        interp.execute(&program).unwrap();

        let value = interp.get_variable("f").unwrap();
        let func = value.as_function().unwrap();
        let object = interp.function(func.id).unwrap();
        assert_eq!(object.name, "f");
        assert_eq!(object.params, ["a", "b"]);
    }

    #[test]
    fn test_dump_stack_lists_frames() {
        let mut interp = Interpreter::new();
        interp.declare_variable("a", Value::Int(1));
        interp.push_stack_frame();
        interp.declare_variable("b", Value::from("x"));
        let dump = interp.dump_stack();
        assert_eq!(
            dump,
            "Begin Stack Dump:\n<----------------->\na: 1\n<----------------->\nb: x\n<----------------->\nEnd Stack Dump:\n"
        );
    }

    #[test]
    fn test_redeclaration_reuses_table_entry() {
        // function outer() { function inner() {} return 1; }  outer(); x1000
        let mut program = Program::script().with(Statement::function(
            "outer",
            &[],
            vec![
                Statement::function("inner", &[], vec![]),
                Statement::ret(Expression::literal(1)),
            ],
        ));
        for _ in 0..1000 {
            program.append(Statement::expression(Expression::call(
                Expression::ident("outer"),
                vec![],
            )));
        }

        let mut interp = Interpreter::new();
        assert_eq!(interp.execute(&program), Ok(Value::Int(1)));
        assert_eq!(interp.function_count(), 2);
    }

    #[test]
    fn test_popped_frame_is_released_with_its_functions() {
        let mut interp = Interpreter::new();
        interp.push_stack_frame();
        let frame = Rc::clone(interp.current_frame());
        let program = Program::script().with(Statement::function("g", &[], vec![]));
        interp.execute(&program).unwrap();
        interp.pop_stack_frame();

        // `g` is bound in the frame it closes over
        assert_eq!(Rc::strong_count(&frame), 2);
        frame.borrow_mut().set_variable("g", Value::Undefined);
        assert_eq!(Rc::strong_count(&frame), 1);
        assert_eq!(interp.function_count(), 1);
    }
}
