//! Constructors for building trees by hand
//!
//! ```
//! use ecmalite::ast::{BinaryOperator, Expression, Program, Statement, VariableKind};
//!
//! // const b = 10 * 2;
//! let program = Program::script().with(Statement::declare(
//!     VariableKind::Const,
//!     "b",
//!     Expression::binary(BinaryOperator::Multiply, Expression::literal(10), Expression::literal(2)),
//! ));
//! assert_eq!(program.body.body.len(), 1);
//! ```

use std::rc::Rc;

use super::*;

impl Program {
    pub fn new(source_type: SourceType) -> Self {
        Program {
            source_type,
            body: ScopeNode::default(),
        }
    }

    pub fn script() -> Self {
        Self::new(SourceType::Script)
    }

    pub fn append(&mut self, statement: Statement) {
        self.body.append(statement);
    }

    /// Builder form of [`Program::append`]
    pub fn with(mut self, statement: Statement) -> Self {
        self.append(statement);
        self
    }
}

impl ScopeNode {
    pub fn append(&mut self, statement: Statement) {
        self.body.push(statement);
    }
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(Literal {
            value: value.into(),
        })
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(operator: AssignmentOperator, left: Expression, right: Expression) -> Self {
        Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn member(object: Expression, property: impl Into<String>) -> Self {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property: Identifier::new(property),
        })
    }
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Statement::Expression(ExpressionStatement { expression })
    }

    pub fn block(body: Vec<Statement>) -> Self {
        Statement::Block(BlockStatement { body })
    }

    pub fn ret(argument: Expression) -> Self {
        Statement::Return(ReturnStatement {
            argument: Some(argument),
        })
    }

    pub fn if_then(test: Expression, consequent: Statement) -> Self {
        Statement::If(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate: None,
        })
    }

    pub fn if_else(test: Expression, consequent: Statement, alternate: Statement) -> Self {
        Statement::If(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate: Some(Box::new(alternate)),
        })
    }

    /// A declaration with a single `name = init` declarator
    pub fn declare(kind: VariableKind, name: impl Into<String>, init: Expression) -> Self {
        Statement::VariableDeclaration(VariableDeclaration {
            kind,
            declarations: vec![VariableDeclarator {
                id: Expression::ident(name),
                init: Some(init),
            }],
        })
    }

    pub fn function(name: impl Into<String>, params: &[&str], body: Vec<Statement>) -> Self {
        Statement::FunctionDeclaration(FunctionDeclaration {
            id: Identifier::new(name),
            params: params.iter().map(|p| Identifier::new(*p)).collect(),
            body: Rc::new(BlockStatement { body }),
            is_async: false,
            is_generator: false,
            is_expression: false,
        })
    }
}
