//! Indented structural dump of a tree
//!
//! Every node renders as `[Kind]`, followed by its attributes and its labelled
//! children one level deeper. The format is meant for people and tests, not
//! for round-tripping (use serde for that).

use std::fmt;

use super::*;

const INDENT: &str = "  ";

/// Accumulates dump lines at a current depth
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn new(depth: usize) -> Self {
        Printer {
            out: String::new(),
            depth,
        }
    }

    fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    /// `label:` followed by the children one level deeper
    fn child(&mut self, label: &str, f: impl FnOnce(&mut Self)) {
        self.line(format_args!("{}:", label));
        self.nested(f);
    }
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?} ({})", s, value.type_name()),
        _ => format!("{} ({})", value, value.type_name()),
    }
}

fn flag(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

impl Program {
    pub fn print(&self, indent: usize) -> String {
        let mut p = Printer::new(indent);
        self.print_into(&mut p);
        p.out
    }

    fn print_into(&self, p: &mut Printer) {
        p.line("[Program]");
        p.nested(|p| {
            p.line(format_args!("sourceType: {}", self.source_type));
            p.child("body", |p| print_statements(&self.body.body, p));
        });
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print(0))
    }
}

fn print_statements(statements: &[Statement], p: &mut Printer) {
    for statement in statements {
        statement.print_into(p);
    }
}

impl Statement {
    pub fn print(&self, indent: usize) -> String {
        let mut p = Printer::new(indent);
        self.print_into(&mut p);
        p.out
    }

    fn print_into(&self, p: &mut Printer) {
        match self {
            Statement::Block(block) => {
                p.line("[BlockStatement]");
                p.nested(|p| p.child("body", |p| print_statements(&block.body, p)));
            }
            Statement::Scope(scope) => {
                p.line("[ScopeNode]");
                p.nested(|p| p.child("body", |p| print_statements(&scope.body, p)));
            }
            Statement::Expression(stmt) => {
                p.line("[ExpressionStatement]");
                p.nested(|p| p.child("expression", |p| stmt.expression.print_into(p)));
            }
            Statement::VariableDeclaration(decl) => {
                p.line("[VariableDeclaration]");
                p.nested(|p| {
                    p.line(format_args!("kind: {}", decl.kind));
                    p.child("declarations", |p| {
                        for declarator in &decl.declarations {
                            p.line("[VariableDeclarator]");
                            p.nested(|p| {
                                p.child("id", |p| declarator.id.print_into(p));
                                if let Some(init) = &declarator.init {
                                    p.child("init", |p| init.print_into(p));
                                }
                            });
                        }
                    });
                });
            }
            Statement::FunctionDeclaration(func) => {
                p.line("[FunctionDeclaration]");
                p.nested(|p| {
                    p.child("id", |p| print_identifier(&func.id, p));
                    if !func.params.is_empty() {
                        p.child("params", |p| {
                            for param in &func.params {
                                print_identifier(param, p);
                            }
                        });
                    }
                    p.child("body", |p| {
                        p.line("[BlockStatement]");
                        p.nested(|p| p.child("body", |p| print_statements(&func.body.body, p)));
                    });
                    p.line(format_args!("async: {}", flag(func.is_async)));
                    p.line(format_args!("expression: {}", flag(func.is_expression)));
                    p.line(format_args!("generator: {}", flag(func.is_generator)));
                });
            }
            Statement::If(stmt) => {
                p.line("[IfStatement]");
                p.nested(|p| {
                    p.child("test", |p| stmt.test.print_into(p));
                    p.child("consequent", |p| stmt.consequent.print_into(p));
                    if let Some(alternate) = &stmt.alternate {
                        p.child("alternate", |p| alternate.print_into(p));
                    }
                });
            }
            Statement::Return(stmt) => {
                p.line("[ReturnStatement]");
                if let Some(argument) = &stmt.argument {
                    p.nested(|p| p.child("argument", |p| argument.print_into(p)));
                }
            }
        }
    }
}

fn print_identifier(id: &Identifier, p: &mut Printer) {
    p.line("[Identifier]");
    p.nested(|p| p.line(format_args!("name: {}", id.name)));
}

impl Expression {
    pub fn print(&self, indent: usize) -> String {
        let mut p = Printer::new(indent);
        self.print_into(&mut p);
        p.out
    }

    fn print_into(&self, p: &mut Printer) {
        match self {
            Expression::Identifier(id) => print_identifier(id, p),
            Expression::Literal(lit) => {
                p.line("[Literal]");
                p.nested(|p| p.line(format_args!("value: {}", literal_text(&lit.value))));
            }
            Expression::Call(call) => {
                p.line("[CallExpression]");
                p.nested(|p| {
                    p.child("callee", |p| call.callee.print_into(p));
                    if !call.arguments.is_empty() {
                        p.child("arguments", |p| {
                            for arg in &call.arguments {
                                arg.print_into(p);
                            }
                        });
                    }
                });
            }
            Expression::Binary(bin) => {
                p.line("[BinaryExpression]");
                p.nested(|p| {
                    p.line(format_args!("operator: {}", bin.operator));
                    p.child("left", |p| bin.left.print_into(p));
                    p.child("right", |p| bin.right.print_into(p));
                });
            }
            Expression::Assignment(assign) => {
                p.line("[AssignmentExpression]");
                p.nested(|p| {
                    p.line(format_args!("operator: {}", assign.operator));
                    p.child("left", |p| assign.left.print_into(p));
                    p.child("right", |p| assign.right.print_into(p));
                });
            }
            Expression::Member(member) => {
                p.line("[MemberExpression]");
                p.nested(|p| {
                    p.child("object", |p| member.object.print_into(p));
                    p.child("property", |p| print_identifier(&member.property, p));
                });
            }
        }
    }
}
