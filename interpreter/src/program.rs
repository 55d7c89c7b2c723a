//! The compiled form of a view: a tree of render steps whose variable
//! references are already resolved to local slots or model fields.

use std::fmt::{self, Display, Formatter};

use crate::{BinaryOperator, UnaryOperator, UpdateOperator, Value};

/// A local binding, addressed by slot. The name is kept for listings.
#[derive(Clone, Debug, PartialEq)]
pub struct Local {
    pub slot: usize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Const(Value),
    Local(Local),
    /// A field of the view model, read at render time.
    Model(String),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Unary(UnaryOperator, Box<Expr>),
    /// `++name` / `--name`, yielding the updated value.
    Update(UpdateOperator, Local),
    Binary(Box<Expr>, BinaryOperator, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Root {
    Local(Local),
    Model(String),
}

/// The target of a member assignment such as `a.b.c = value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub root: Root,
    pub path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Write(String),
    Emit(Expr),
    Declare(Local, Expr),
    Assign(Local, Expr),
    Store(Place, Expr),
    Eval(Expr),
    Block(Block),
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    For {
        /// Slots owned by the loop header, reset before the initializer runs.
        locals: Vec<usize>,
        init: Box<Step>,
        condition: Expr,
        update: Box<Step>,
        body: Block,
    },
    ForEach {
        variable: Local,
        collection: Expr,
        body: Block,
    },
    Switch {
        subject: Expr,
        body: Block,
    },
    Label {
        name: String,
        guard: Option<Expr>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    /// Slots declared directly in this block; reset on every entry.
    pub locals: Vec<usize>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub body: Block,
    /// Total number of local slots used anywhere in the program.
    pub slots: usize,
}

impl Block {
    pub fn new(locals: Vec<usize>, steps: Vec<Step>) -> Self {
        Self { locals, steps }
    }
}

impl Program {
    pub fn new(body: Block, slots: usize) -> Self {
        Self { body, slots }
    }
}

struct Constant<'a>(&'a Value);

impl Display for Constant<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{s:?}"),
            v => write!(f, "{v}"),
        }
    }
}

struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Binary(..) | Expr::Conditional(..) => write!(f, "({})", self.0),
            e => write!(f, "{e}"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{}", Constant(value)),
            Expr::Local(local) => write!(f, "{}", local.name),
            Expr::Model(name) => write!(f, "${name}"),
            Expr::Member(target, name) => write!(f, "{}.{name}", Operand(target)),
            Expr::Index(target, index) => write!(f, "{}[{index}]", Operand(target)),
            Expr::Call {
                target,
                method,
                args,
            } => {
                write!(f, "{}.{method}(", Operand(target))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Unary(op, operand) => write!(f, "{op}{}", Operand(operand)),
            Expr::Update(op, local) => write!(f, "{op}{}", local.name),
            Expr::Binary(left, op, right) => {
                write!(f, "{} {op} {}", Operand(left), Operand(right))
            }
            Expr::Conditional(condition, if_true, if_false) => write!(
                f,
                "{} ? {} : {}",
                Operand(condition),
                Operand(if_true),
                Operand(if_false)
            ),
        }
    }
}

impl Display for Place {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.root {
            Root::Local(local) => write!(f, "{}", local.name)?,
            Root::Model(name) => write!(f, "${name}")?,
        }
        for name in &self.path {
            write!(f, ".{name}")?;
        }
        Ok(())
    }
}

fn indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 2)
}

fn write_body(f: &mut Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for step in &block.steps {
        write_step(f, step, depth + 1)?;
    }
    indent(f, depth)?;
    write!(f, "}}")
}

/// Writes the single-line form of a step, as used in `for` headers.
fn write_inline(f: &mut Formatter<'_>, step: &Step) -> fmt::Result {
    match step {
        Step::Write(text) => write!(f, "write {text:?}"),
        Step::Emit(expr) => write!(f, "emit {expr}"),
        Step::Declare(local, value) => write!(f, "let {} = {value}", local.name),
        Step::Assign(local, value) => write!(f, "{} = {value}", local.name),
        Step::Store(place, value) => write!(f, "{place} = {value}"),
        Step::Eval(expr) => write!(f, "{expr}"),
        Step::Block(_) => write!(f, "{{ .. }}"),
        Step::If { condition, .. } => write!(f, "if ({condition}) {{ .. }}"),
        Step::For { condition, .. } => write!(f, "for (..; {condition}; ..) {{ .. }}"),
        Step::ForEach {
            variable,
            collection,
            ..
        } => write!(f, "foreach ({} in {collection}) {{ .. }}", variable.name),
        Step::Switch { subject, .. } => write!(f, "switch ({subject}) {{ .. }}"),
        Step::Label { name, guard } => match guard {
            Some(guard) => write!(f, "label {name} when {guard}"),
            None => write!(f, "label {name}"),
        },
    }
}

fn write_step(f: &mut Formatter<'_>, step: &Step, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match step {
        Step::Block(block) => write_body(f, block, depth)?,
        Step::If {
            condition,
            then_block,
            else_block,
        } => {
            write!(f, "if ({condition}) ")?;
            write_body(f, then_block, depth)?;
            if let Some(else_block) = else_block {
                write!(f, " else ")?;
                write_body(f, else_block, depth)?;
            }
        }
        Step::For {
            init,
            condition,
            update,
            body,
            ..
        } => {
            write!(f, "for (")?;
            write_inline(f, init)?;
            write!(f, "; {condition}; ")?;
            write_inline(f, update)?;
            write!(f, ") ")?;
            write_body(f, body, depth)?;
        }
        Step::ForEach {
            variable,
            collection,
            body,
        } => {
            write!(f, "foreach ({} in {collection}) ", variable.name)?;
            write_body(f, body, depth)?;
        }
        Step::Switch { subject, body } => {
            write!(f, "switch ({subject}) ")?;
            write_body(f, body, depth)?;
        }
        simple => write_inline(f, simple)?,
    }
    writeln!(f)
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for step in &self.body.steps {
            write_step(f, step, 0)?;
        }
        Ok(())
    }
}
