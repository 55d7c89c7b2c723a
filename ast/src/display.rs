//! Razor-like surface rendering of segment trees, used in diagnostics.

use std::fmt::{self, Display, Formatter};

use crate::*;

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{separator}")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Wraps compound operands in parentheses so the rendering stays unambiguous.
struct Operand<'a>(&'a Expression);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::Binary(_) | Expression::Ternary(_) => write!(f, "({})", self.0),
            e => write!(f, "{e}"),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Literal { token }) => write!(f, "{token}"),
            Expression::VariableAccess(access) => write!(f, "{access}"),
            Expression::ArrayAccess(ArrayAccess { target, index }) => {
                write!(f, "{}[{index}]", Operand(target))
            }
            Expression::MethodCall(MethodCall {
                target,
                method,
                arguments,
            }) => {
                write!(f, "{}.{method}(", Operand(target))?;
                write_list(f, arguments, ", ")?;
                write!(f, ")")
            }
            Expression::Unary(UnaryExpression { operand, operator }) => {
                write!(f, "{operator}{}", Operand(operand))
            }
            Expression::Binary(BinaryExpression {
                left,
                operator,
                right,
            }) => write!(f, "{} {operator} {}", Operand(left), Operand(right)),
            Expression::Ternary(TernaryExpression {
                condition,
                if_true,
                if_false,
            }) => write!(
                f,
                "{} ? {} : {}",
                Operand(condition),
                Operand(if_true),
                Operand(if_false)
            ),
        }
    }
}

impl Display for VariableAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}.{}", Operand(parent), self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::VariableAssignment(VariableAssignment { target, value }) => {
                if target.is_bare() {
                    write!(f, "var {target} = {value}")
                } else {
                    write!(f, "{target} = {value}")
                }
            }
            Statement::If(IfStatement {
                condition,
                body,
                else_body,
            }) => {
                write!(f, "if ({condition}) {body}")?;
                if let Some(else_body) = else_body {
                    write!(f, " else {else_body}")?;
                }
                Ok(())
            }
            Statement::For(ForLoop {
                initializer,
                condition,
                increment,
                body,
            }) => {
                let increment: &dyn Display = match increment.as_ref() {
                    Segment::Expression(e) => e,
                    segment => segment,
                };
                write!(f, "for ({initializer}; {condition}; {increment}) {body}")
            }
            Statement::ForEach(ForEachLoop {
                variable,
                collection,
                body,
            }) => write!(f, "foreach (var {variable} in {collection}) {body}"),
            Statement::Switch(SwitchStatement { subject, body }) => {
                write!(f, "switch ({subject}) {body}")
            }
            Statement::Label(LabelStatement { label, condition }) => match condition {
                Some(condition) => write!(f, "{label} when {condition}:"),
                None => write!(f, "{label}:"),
            },
        }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{ ")?;
        write_list(f, &self.segments, " ")?;
        write!(f, " }}")
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }
        write!(f, "{}", self.whitespace)?;
        if self.self_closing {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        write_list(f, &self.children, "")?;
        write!(f, "</{}>", self.name)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(value) = &self.value {
            write!(f, "=\"")?;
            write_list(f, value, "")?;
            write!(f, "\"")?;
        }
        Ok(())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Expression(e) => write!(f, "@{}", Operand(e)),
            Segment::Statement(s) => write!(f, "@{s}"),
            Segment::Block(b) => write!(f, "@{b}"),
            Segment::Text(t) => write!(f, "{t}"),
            Segment::Element(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_chain_and_index() {
        let expression = Expression::var("model")
            .member("d")
            .index(Expression::var("i"));
        assert_eq!(expression.to_string(), "model.d[i]");
    }

    #[test]
    fn nested_operators_are_parenthesized() {
        let expression = Expression::var("a")
            .binary("+", Expression::literal(1))
            .binary("*", Expression::literal(2));
        assert_eq!(expression.to_string(), "(a + 1) * 2");

        let call = Expression::var("name").call("substring", vec![Expression::literal(0)]);
        assert_eq!(call.unary("!").to_string(), "!name.substring(0)");
    }

    #[test]
    fn for_loop() {
        let statement = Statement::for_loop(
            Statement::assign(VariableAccess::new("i"), Expression::literal(0)),
            Expression::var("i").binary("<", Expression::literal(2)),
            Expression::var("i").unary("++"),
            Block::new(vec![Element::new("div")
                .with_whitespace(" ")
                .self_closing()
                .into()]),
        );
        assert_eq!(
            statement.to_string(),
            "for (var i = 0; i < 2; ++i) { <div /> }"
        );
    }

    #[test]
    fn element_with_attributes() {
        let element = Element::new("input")
            .with_attribute(Attribute::new(
                "value",
                vec![Expression::var("model").member("name").into()],
            ))
            .with_attribute(Attribute::flag("disabled"))
            .with_whitespace(" ")
            .self_closing();
        assert_eq!(
            element.to_string(),
            r#"<input value="@model.name" disabled />"#
        );
    }

    #[test]
    fn if_else_and_label() {
        let statement = Statement::if_else(
            Expression::var("ok"),
            Block::new(vec![Segment::text("yes")]),
            Block::default(),
        );
        assert_eq!(statement.to_string(), "if (ok) { yes } else {}");

        let label = Statement::label("case", Some(Expression::literal(3)));
        assert_eq!(label.to_string(), "case when 3:");
    }
}
