use std::fmt::Display;

use ast::{
    ArrayAccess, BinaryExpression, Element, Expression, ForEachLoop, ForLoop, IfStatement,
    LabelStatement, Literal, MethodCall, Segment, Statement, SwitchStatement, TernaryExpression,
    UnaryExpression, VariableAccess, VariableAssignment,
};
use interpreter::{Block, Expr, Local, Place, Program, Root, Step};
use log::debug;

use crate::{
    literal::parse_literal,
    operator::{self, is_identifier, Prefix},
    ScopeTracker, TranspileError,
};

type Result<T> = std::result::Result<T, TranspileError>;

fn invalid<S: Display, R: ToString>(segment: S, reason: R) -> TranspileError {
    TranspileError::invalid_segment(segment, reason)
}

fn check_identifier<S: Display>(name: &str, segment: S) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(invalid(segment, format!("`{name}` is not a valid identifier")))
    }
}

fn check_markup_name<S: Display>(name: &str, segment: S) -> Result<()> {
    let forbidden = |c: char| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\'' | '=');
    if name.is_empty() || name.contains(forbidden) {
        Err(invalid(segment, format!("`{name}` is not a valid markup name")))
    } else {
        Ok(())
    }
}

/// Steps under construction; adjacent literal writes are merged.
#[derive(Default)]
struct Steps(Vec<Step>);

impl Steps {
    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Step::Write(last)) => last.push_str(text),
            _ => self.0.push(Step::Write(text.to_string())),
        }
    }

    fn push(&mut self, step: Step) {
        self.0.push(step);
    }
}

/// Walks a segment tree and produces the compiled render program.
#[derive(Debug, Default)]
pub struct Generator {
    scope: ScopeTracker,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(mut self, segments: &[Segment]) -> Result<Program> {
        self.scope.push();
        let steps = self.segments(segments)?;
        let locals = self.scope.pop();
        debug!(
            "Generated {} top-level steps from {} segments using {} local slots",
            steps.len(),
            segments.len(),
            self.scope.slot_count()
        );
        Ok(Program::new(
            Block::new(locals, steps),
            self.scope.slot_count(),
        ))
    }

    /// Compiles a nested block in a fresh scope.
    fn block(&mut self, block: &ast::Block) -> Result<Block> {
        self.scope.push();
        let steps = self.segments(&block.segments);
        let locals = self.scope.pop();
        Ok(Block::new(locals, steps?))
    }

    fn segments(&mut self, segments: &[Segment]) -> Result<Vec<Step>> {
        let mut steps = Steps::default();
        for segment in segments {
            self.segment(segment, &mut steps)?;
        }
        Ok(steps.0)
    }

    fn segment(&mut self, segment: &Segment, steps: &mut Steps) -> Result<()> {
        match segment {
            Segment::Text(text) => steps.write(text),
            Segment::Element(element) => self.element(element, steps)?,
            Segment::Expression(expression) => {
                let expr = self.expression(expression)?;
                steps.push(Step::Emit(expr));
            }
            Segment::Statement(statement) => {
                let step = self.statement(statement)?;
                steps.push(step);
            }
            Segment::Block(block) => {
                let block = self.block(block)?;
                steps.push(Step::Block(block));
            }
        }
        Ok(())
    }

    fn element(&mut self, element: &Element, steps: &mut Steps) -> Result<()> {
        check_markup_name(&element.name, element)?;
        if !element.whitespace.chars().all(char::is_whitespace) {
            return Err(invalid(element, "trailing tag whitespace must be whitespace"));
        }

        steps.write("<");
        steps.write(&element.name);
        for attribute in &element.attributes {
            check_markup_name(&attribute.name, attribute)?;
            steps.write(" ");
            steps.write(&attribute.name);
            if let Some(value) = &attribute.value {
                steps.write("=\"");
                for segment in value {
                    self.segment(segment, steps)?;
                }
                steps.write("\"");
            }
        }
        steps.write(&element.whitespace);

        if element.self_closing {
            steps.write("/>");
            return Ok(());
        }
        steps.write(">");
        for child in &element.children {
            self.segment(child, steps)?;
        }
        steps.write("</");
        steps.write(&element.name);
        steps.write(">");
        Ok(())
    }

    fn expression(&mut self, expression: &Expression) -> Result<Expr> {
        match expression {
            Expression::Literal(Literal { token }) => parse_literal(token)
                .map(Expr::Const)
                .map_err(|reason| invalid(expression, reason)),
            Expression::VariableAccess(access) => self.variable(access),
            Expression::ArrayAccess(ArrayAccess { target, index }) => {
                let target = self.expression(target)?;
                let index = self.expression(index)?;
                Ok(Expr::Index(Box::new(target), Box::new(index)))
            }
            Expression::MethodCall(MethodCall {
                target,
                method,
                arguments,
            }) => {
                check_identifier(method, expression)?;
                let target = self.expression(target)?;
                let args = arguments
                    .iter()
                    .map(|argument| self.expression(argument))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expr::Call {
                    target: Box::new(target),
                    method: method.clone(),
                    args,
                })
            }
            Expression::Unary(UnaryExpression { operand, operator }) => {
                match operator::prefix(operator) {
                    Some(Prefix::Unary(op)) => {
                        let operand = self.expression(operand)?;
                        Ok(Expr::Unary(op, Box::new(operand)))
                    }
                    Some(Prefix::Update(op)) => {
                        let local = self.update_target(operand, expression)?;
                        Ok(Expr::Update(op, local))
                    }
                    None => Err(invalid(
                        expression,
                        format!("unsupported unary operator `{operator}`"),
                    )),
                }
            }
            Expression::Binary(BinaryExpression {
                left,
                operator,
                right,
            }) => {
                let op = operator::binary(operator).ok_or_else(|| {
                    invalid(expression, format!("unsupported binary operator `{operator}`"))
                })?;
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                Ok(Expr::Binary(Box::new(left), op, Box::new(right)))
            }
            Expression::Ternary(TernaryExpression {
                condition,
                if_true,
                if_false,
            }) => {
                let condition = self.expression(condition)?;
                let if_true = self.expression(if_true)?;
                let if_false = self.expression(if_false)?;
                Ok(Expr::Conditional(
                    Box::new(condition),
                    Box::new(if_true),
                    Box::new(if_false),
                ))
            }
        }
    }

    /// Bare names are classified here; chained names are always member reads.
    fn variable(&mut self, access: &VariableAccess) -> Result<Expr> {
        check_identifier(&access.name, access)?;
        match &access.parent {
            Some(parent) => {
                let parent = self.expression(parent)?;
                Ok(Expr::Member(Box::new(parent), access.name.clone()))
            }
            None => Ok(match self.scope.resolve(&access.name) {
                Some(local) => Expr::Local(local),
                None => Expr::Model(access.name.clone()),
            }),
        }
    }

    fn update_target(&mut self, operand: &Expression, expression: &Expression) -> Result<Local> {
        match operand {
            Expression::VariableAccess(access) if access.is_bare() => {
                check_identifier(&access.name, access)?;
                self.scope.resolve(&access.name).ok_or_else(|| {
                    invalid(
                        expression,
                        format!("`{}` is not a local variable", access.name),
                    )
                })
            }
            _ => Err(invalid(
                expression,
                "the operand of `++` and `--` must be a local variable",
            )),
        }
    }

    fn statement(&mut self, statement: &Statement) -> Result<Step> {
        match statement {
            Statement::VariableAssignment(assignment) => self.assignment(assignment, false),
            Statement::If(IfStatement {
                condition,
                body,
                else_body,
            }) => {
                let condition = self.expression(condition)?;
                let then_block = self.block(body)?;
                let else_block = match else_body {
                    Some(else_body) => Some(self.block(else_body)?),
                    None => None,
                };
                Ok(Step::If {
                    condition,
                    then_block,
                    else_block,
                })
            }
            Statement::For(for_loop) => self.for_loop(for_loop),
            Statement::ForEach(ForEachLoop {
                variable,
                collection,
                body,
            }) => {
                check_identifier(variable, statement)?;
                let collection = self.expression(collection)?;
                self.scope.push();
                let variable = self.scope.declare(variable);
                let body = self.block(body);
                self.scope.pop();
                Ok(Step::ForEach {
                    variable,
                    collection,
                    body: body?,
                })
            }
            Statement::Switch(SwitchStatement { subject, body }) => {
                let subject = self.expression(subject)?;
                let body = self.block(body)?;
                Ok(Step::Switch { subject, body })
            }
            Statement::Label(LabelStatement { label, condition }) => {
                if label.trim().is_empty() {
                    return Err(invalid(statement, "a label needs a name"));
                }
                let guard = match condition {
                    Some(condition) => Some(self.expression(condition)?),
                    None => None,
                };
                Ok(Step::Label {
                    name: label.clone(),
                    guard,
                })
            }
        }
    }

    /// `fresh` forces a new binding in the current frame, as loop
    /// initializers do.
    fn assignment(&mut self, assignment: &VariableAssignment, fresh: bool) -> Result<Step> {
        let VariableAssignment { target, value } = assignment;
        // The value is compiled before the target is registered.
        let value = self.expression(value)?;

        if !target.is_bare() {
            let place = self.place(target)?;
            return Ok(Step::Store(place, value));
        }

        check_identifier(&target.name, target)?;
        if fresh {
            return Ok(Step::Declare(self.scope.declare(&target.name), value));
        }
        match self.scope.bind(&target.name) {
            (local, true) => Ok(Step::Declare(local, value)),
            (local, false) => Ok(Step::Assign(local, value)),
        }
    }

    fn place(&mut self, target: &VariableAccess) -> Result<Place> {
        let mut names = vec![target.name.as_str()];
        let mut current = target;
        while let Some(parent) = &current.parent {
            match parent.as_ref() {
                Expression::VariableAccess(access) => {
                    names.push(access.name.as_str());
                    current = access;
                }
                other => {
                    return Err(invalid(
                        target,
                        format!(
                            "cannot assign through `{other}`; only member chains are assignable"
                        ),
                    ))
                }
            }
        }
        for name in &names {
            check_identifier(name, target)?;
        }

        names.reverse();
        let (root, path) = names.split_first().ok_or_else(|| invalid(target, "empty target"))?;
        let root = match self.scope.resolve(root) {
            Some(local) => Root::Local(local),
            None => Root::Model(root.to_string()),
        };
        Ok(Place {
            root,
            path: path.iter().map(|name| name.to_string()).collect(),
        })
    }

    fn for_loop(&mut self, for_loop: &ForLoop) -> Result<Step> {
        self.scope.push();
        let header = self.for_loop_parts(for_loop);
        let locals = self.scope.pop();
        let (init, condition, update, body) = header?;
        Ok(Step::For {
            locals,
            init: Box::new(init),
            condition,
            update: Box::new(update),
            body,
        })
    }

    fn for_loop_parts(&mut self, for_loop: &ForLoop) -> Result<(Step, Expr, Step, Block)> {
        let ForLoop {
            initializer,
            condition,
            increment,
            body,
        } = for_loop;

        let init = match initializer.as_ref() {
            Statement::VariableAssignment(assignment) => self.assignment(assignment, true)?,
            other => self.statement(other)?,
        };
        let condition = self.expression(condition)?;
        let update = match increment.as_ref() {
            Segment::Expression(expression) => Step::Eval(self.expression(expression)?),
            Segment::Statement(statement) => self.statement(statement)?,
            other => {
                return Err(invalid(
                    other,
                    "a loop increment must be an expression or a statement",
                ))
            }
        };
        let body = self.block(body)?;
        Ok((init, condition, update, body))
    }
}

#[cfg(test)]
mod tests {
    use ast::{Block as Body, Element, Expression, Segment, Statement, VariableAccess};

    use super::*;

    fn generate(segments: Vec<Segment>) -> Result<Program> {
        Generator::new().generate(&segments)
    }

    fn reason(segments: Vec<Segment>) -> String {
        match generate(segments) {
            Err(TranspileError::InvalidSegment { reason, .. }) => reason,
            Ok(program) => panic!("expected an error, got:\n{program}"),
        }
    }

    #[test]
    fn adjacent_text_is_merged() {
        let program = generate(vec![
            Segment::text("a"),
            Element::new("br").self_closing().into(),
            Segment::text(""),
            Segment::text("b"),
        ])
        .unwrap();
        assert_eq!(program.body.steps, vec![Step::Write("a<br/>b".to_string())]);
    }

    #[test]
    fn slots_are_never_reused() {
        let assign = |name: &str| {
            Segment::from(Statement::assign(
                VariableAccess::new(name),
                Expression::literal(1),
            ))
        };
        let program = generate(vec![
            Body::new(vec![assign("a")]).into(),
            Body::new(vec![assign("a")]).into(),
            assign("b"),
        ])
        .unwrap();
        assert_eq!(program.slots, 3);
        assert_eq!(program.body.locals, vec![2]);
    }

    #[test]
    fn invalid_literal() {
        let error = generate(vec![Expression::literal("\"open").into()]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid segment `\"open`: unterminated string literal \"open"
        );
    }

    #[test]
    fn unsupported_operators() {
        assert_eq!(
            reason(vec![Expression::literal(1).binary("<=>", Expression::literal(2)).into()]),
            "unsupported binary operator `<=>`"
        );
        assert_eq!(
            reason(vec![Expression::literal(1).unary("~").into()]),
            "unsupported unary operator `~`"
        );
    }

    #[test]
    fn invalid_identifiers() {
        assert_eq!(
            reason(vec![Expression::var("2x").into()]),
            "`2x` is not a valid identifier"
        );
        assert_eq!(
            reason(vec![Statement::for_each(
                "a b",
                Expression::var("items"),
                Body::default()
            )
            .into()]),
            "`a b` is not a valid identifier"
        );
        assert_eq!(
            reason(vec![Expression::var("s").call("to-string", vec![]).into()]),
            "`to-string` is not a valid identifier"
        );
    }

    #[test]
    fn invalid_markup() {
        assert_eq!(
            reason(vec![Element::new("").into()]),
            "`` is not a valid markup name"
        );
        assert_eq!(
            reason(vec![Element::new("div").with_whitespace("x").into()]),
            "trailing tag whitespace must be whitespace"
        );
    }

    #[test]
    fn update_needs_a_local() {
        assert_eq!(
            reason(vec![Expression::var("count").unary("++").into()]),
            "`count` is not a local variable"
        );
        assert_eq!(
            reason(vec![Expression::var("model").member("count").unary("--").into()]),
            "the operand of `++` and `--` must be a local variable"
        );
    }

    #[test]
    fn assignment_through_index_is_rejected() {
        let target = VariableAccess::with_parent(
            "name",
            Expression::var("items").index(Expression::literal(0)),
        );
        assert_eq!(
            reason(vec![Statement::assign(target, Expression::literal(1)).into()]),
            "cannot assign through `items[0]`; only member chains are assignable"
        );
    }

    #[test]
    fn loop_increment_must_be_code() {
        let for_loop = Statement::for_loop(
            Statement::assign(VariableAccess::new("i"), Expression::literal(0)),
            Expression::literal("false"),
            Segment::text("i++"),
            Body::default(),
        );
        assert_eq!(
            reason(vec![for_loop.into()]),
            "a loop increment must be an expression or a statement"
        );
    }

    #[test]
    fn empty_label() {
        assert_eq!(
            reason(vec![Statement::label(" ", None).into()]),
            "a label needs a name"
        );
    }
}
