//! Built-in sample program
//!
//! ```js
//! const b = 10 * 2;
//! const a = b + 1;
//!
//! function inc(a) {
//!     return 3 + 1;
//! }
//! inc();
//!
//! let t = 2;
//! if (10 > 2) {
//!     t *= 2;
//! }
//! ```

use crate::ast::*;

pub fn sample_program() -> Program {
    Program::script()
        .with(Statement::declare(
            VariableKind::Const,
            "b",
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::literal(10),
                Expression::literal(2),
            ),
        ))
        .with(Statement::declare(
            VariableKind::Const,
            "a",
            Expression::binary(
                BinaryOperator::Add,
                Expression::ident("b"),
                Expression::literal(1),
            ),
        ))
        .with(Statement::function(
            "inc",
            &["a"],
            vec![Statement::ret(Expression::binary(
                BinaryOperator::Add,
                Expression::literal(3),
                Expression::literal(1),
            ))],
        ))
        .with(Statement::expression(Expression::call(
            Expression::ident("inc"),
            vec![],
        )))
        .with(Statement::declare(
            VariableKind::Let,
            "t",
            Expression::literal(2),
        ))
        .with(Statement::if_then(
            Expression::binary(
                BinaryOperator::GreaterThan,
                Expression::literal(10),
                Expression::literal(2),
            ),
            Statement::block(vec![Statement::expression(Expression::assign(
                AssignmentOperator::MultiplicationAssignment,
                Expression::ident("t"),
                Expression::literal(2),
            ))]),
        ))
}
