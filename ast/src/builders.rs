//! Shorthand constructors for assembling segment trees by hand.

use crate::*;

impl Expression {
    pub fn literal<T: ToString>(token: T) -> Self {
        Expression::Literal(Literal {
            token: token.to_string(),
        })
    }

    /// A bare identifier.
    pub fn var<N: ToString>(name: N) -> Self {
        Expression::VariableAccess(VariableAccess::new(name))
    }

    /// `self.name`
    pub fn member<N: ToString>(self, name: N) -> Self {
        Expression::VariableAccess(VariableAccess::with_parent(name, self))
    }

    /// `self[index]`
    pub fn index(self, index: Expression) -> Self {
        Expression::ArrayAccess(ArrayAccess {
            target: Box::new(self),
            index: Box::new(index),
        })
    }

    /// `self.method(arguments...)`
    pub fn call<N: ToString>(self, method: N, arguments: Vec<Expression>) -> Self {
        Expression::MethodCall(MethodCall {
            target: Box::new(self),
            method: method.to_string(),
            arguments,
        })
    }

    pub fn unary<O: ToString>(self, operator: O) -> Self {
        Expression::Unary(UnaryExpression {
            operand: Box::new(self),
            operator: operator.to_string(),
        })
    }

    pub fn binary<O: ToString>(self, operator: O, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            left: Box::new(self),
            operator: operator.to_string(),
            right: Box::new(right),
        })
    }

    pub fn ternary(condition: Expression, if_true: Expression, if_false: Expression) -> Self {
        Expression::Ternary(TernaryExpression {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }
}

impl VariableAccess {
    pub fn new<N: ToString>(name: N) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
        }
    }

    pub fn with_parent<N: ToString>(name: N, parent: Expression) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(Box::new(parent)),
        }
    }

    pub fn is_bare(&self) -> bool {
        self.parent.is_none()
    }
}

impl Statement {
    pub fn assign(target: VariableAccess, value: Expression) -> Self {
        Statement::VariableAssignment(VariableAssignment { target, value })
    }

    pub fn if_then(condition: Expression, body: Block) -> Self {
        Statement::If(IfStatement {
            condition,
            body,
            else_body: None,
        })
    }

    pub fn if_else(condition: Expression, body: Block, else_body: Block) -> Self {
        Statement::If(IfStatement {
            condition,
            body,
            else_body: Some(else_body),
        })
    }

    pub fn for_loop<S: Into<Segment>>(
        initializer: Statement,
        condition: Expression,
        increment: S,
        body: Block,
    ) -> Self {
        Statement::For(ForLoop {
            initializer: Box::new(initializer),
            condition,
            increment: Box::new(increment.into()),
            body,
        })
    }

    pub fn for_each<N: ToString>(variable: N, collection: Expression, body: Block) -> Self {
        Statement::ForEach(ForEachLoop {
            variable: variable.to_string(),
            collection,
            body,
        })
    }

    pub fn switch(subject: Expression, body: Block) -> Self {
        Statement::Switch(SwitchStatement { subject, body })
    }

    pub fn label<N: ToString>(label: N, condition: Option<Expression>) -> Self {
        Statement::Label(LabelStatement {
            label: label.to_string(),
            condition,
        })
    }
}

impl Block {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl Segment {
    pub fn text<T: ToString>(text: T) -> Self {
        Segment::Text(text.to_string())
    }
}

impl Element {
    pub fn new<N: ToString>(name: N) -> Self {
        Self {
            name: name.to_string(),
            attributes: vec![],
            whitespace: String::new(),
            self_closing: false,
            children: vec![],
        }
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    pub fn with_whitespace<W: ToString>(mut self, whitespace: W) -> Self {
        self.whitespace = whitespace.to_string();
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_children(mut self, children: Vec<Segment>) -> Self {
        self.children = children;
        self
    }
}

impl Attribute {
    pub fn new<N: ToString>(name: N, value: Vec<Segment>) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value),
        }
    }

    /// An attribute without a value, e.g. `disabled`.
    pub fn flag<N: ToString>(name: N) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }
}

impl From<Expression> for Segment {
    fn from(expression: Expression) -> Self {
        Segment::Expression(expression)
    }
}

impl From<Statement> for Segment {
    fn from(statement: Statement) -> Self {
        Segment::Statement(statement)
    }
}

impl From<Block> for Segment {
    fn from(block: Block) -> Self {
        Segment::Block(block)
    }
}

impl From<Element> for Segment {
    fn from(element: Element) -> Self {
        Segment::Element(element)
    }
}

impl From<VariableAccess> for Expression {
    fn from(access: VariableAccess) -> Self {
        Expression::VariableAccess(access)
    }
}
