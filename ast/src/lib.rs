mod builders;
mod display;

#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Expression(Expression),
    Statement(Statement),
    Block(Block),
    Text(String),
    Element(Element),
}

/// An ordered run of segments forming one lexical scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    VariableAccess(VariableAccess),
    ArrayAccess(ArrayAccess),
    MethodCall(MethodCall),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Ternary(TernaryExpression),
}

/// A literal exactly as written in the template, e.g. `"hello"`, `42` or `true`.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub token: String,
}

/// `name`, or `parent.name` when a parent is present.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableAccess {
    pub name: String,
    pub parent: Option<Box<Expression>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayAccess {
    pub target: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    pub target: Box<Expression>,
    pub method: String,
    pub arguments: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpression {
    pub operand: Box<Expression>,
    pub operator: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TernaryExpression {
    pub condition: Box<Expression>,
    pub if_true: Box<Expression>,
    pub if_false: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    VariableAssignment(VariableAssignment),
    If(IfStatement),
    For(ForLoop),
    ForEach(ForEachLoop),
    Switch(SwitchStatement),
    Label(LabelStatement),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableAssignment {
    pub target: VariableAccess,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub body: Block,
    pub else_body: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub initializer: Box<Statement>,
    pub condition: Expression,
    /// Either an expression such as `++i` or a statement such as `i = i + 2`.
    pub increment: Box<Segment>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForEachLoop {
    pub variable: String,
    pub collection: Expression,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStatement {
    pub subject: Expression,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelStatement {
    pub label: String,
    pub condition: Option<Expression>,
}

/// A literal markup element. Children and attribute values may interleave
/// text with expressions and statements.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written between the last attribute and `>` or `/>`.
    pub whitespace: String,
    pub self_closing: bool,
    pub children: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<Vec<Segment>>,
}
