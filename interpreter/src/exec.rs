use crate::{
    methods::call_method, Block, Expr, ModelContext, Place, Program, RenderOptions, Root,
    RuntimeError, Step, Value, MODEL_NAME,
};

/// Output fragments in the order they were written.
#[derive(Debug, Default)]
pub(crate) struct RenderBuffer {
    fragments: Vec<String>,
}

impl RenderBuffer {
    fn push(&mut self, fragment: String) {
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub(crate) fn finish(self) -> String {
        self.fragments.concat()
    }
}

/// Mutable state of a single render.
pub(crate) struct Machine<'v> {
    context: &'v ModelContext,
    options: &'v RenderOptions,
    /// Copy of the model taken on the first write through a model-bound
    /// name; the instance's model itself stays untouched.
    overlay: Option<ModelContext>,
    locals: Vec<Value>,
    iterations: u64,
    pub(crate) buffer: RenderBuffer,
}

impl<'v> Machine<'v> {
    pub(crate) fn new(
        program: &Program,
        context: &'v ModelContext,
        options: &'v RenderOptions,
    ) -> Self {
        Self {
            context,
            options,
            overlay: None,
            locals: vec![Value::Undefined; program.slots],
            iterations: 0,
            buffer: RenderBuffer::default(),
        }
    }

    fn model_field(&self, name: &str) -> Value {
        self.overlay
            .as_ref()
            .unwrap_or(self.context)
            .resolve(name)
            .cloned()
            .unwrap_or_default()
    }

    fn reset(&mut self, slots: &[usize]) {
        for slot in slots {
            self.locals[*slot] = Value::Undefined;
        }
    }

    fn tick(&mut self) -> Result<(), RuntimeError> {
        self.iterations += 1;
        match self.options.iteration_limit {
            Some(limit) if self.iterations > limit => Err(RuntimeError::IterationLimit(limit)),
            _ => Ok(()),
        }
    }

    fn emit(&mut self, value: Value) {
        let fragment = if value.is_nullish() {
            self.options.undefined_text.clone()
        } else {
            value.to_string()
        };
        self.buffer.push(fragment);
    }

    fn store(&mut self, place: &Place, value: Value) -> Result<(), RuntimeError> {
        let invalid = |message: String| RuntimeError::InvalidAssignment {
            path: place.to_string(),
            message,
        };

        let mut target = match &place.root {
            Root::Local(local) => &mut self.locals[local.slot],
            Root::Model(name) => {
                let context = self.context;
                let model = self
                    .overlay
                    .get_or_insert_with(|| context.clone())
                    .model_mut();
                if name.as_str() == MODEL_NAME {
                    model
                } else {
                    match model {
                        Value::Object(fields) => fields.entry(name.clone()).or_default(),
                        other => {
                            return Err(invalid(format!(
                                "cannot set `{name}` on {}",
                                other.type_name()
                            )))
                        }
                    }
                }
            }
        };

        let Some((last, parents)) = place.path.split_last() else {
            *target = value;
            return Ok(());
        };
        for name in parents {
            target = match target {
                Value::Object(fields) => fields
                    .get_mut(name)
                    .ok_or_else(|| invalid(format!("`{name}` is undefined")))?,
                other => {
                    return Err(invalid(format!(
                        "cannot read `{name}` of {}",
                        other.type_name()
                    )))
                }
            };
        }
        match target {
            Value::Object(fields) => {
                fields.insert(last.clone(), value);
                Ok(())
            }
            other => Err(invalid(format!(
                "cannot set `{last}` on {}",
                other.type_name()
            ))),
        }
    }
}

pub(crate) trait Interpretable {
    type Value;
    fn run(&self, machine: &mut Machine) -> Result<Self::Value, RuntimeError>;
}

impl Interpretable for Block {
    type Value = ();
    fn run(&self, machine: &mut Machine) -> Result<Self::Value, RuntimeError> {
        machine.reset(&self.locals);
        for step in &self.steps {
            step.run(machine)?;
        }
        Ok(())
    }
}

impl Interpretable for Step {
    type Value = ();
    fn run(&self, machine: &mut Machine) -> Result<Self::Value, RuntimeError> {
        match self {
            Step::Write(text) => machine.buffer.push(text.clone()),
            Step::Emit(expr) => {
                let value = expr.run(machine)?;
                machine.emit(value);
            }
            Step::Declare(local, value) | Step::Assign(local, value) => {
                let value = value.run(machine)?;
                machine.locals[local.slot] = value;
            }
            Step::Store(place, value) => {
                let value = value.run(machine)?;
                machine.store(place, value)?;
            }
            Step::Eval(expr) => {
                expr.run(machine)?;
            }
            Step::Block(block) => block.run(machine)?,
            Step::If {
                condition,
                then_block,
                else_block,
            } => {
                if condition.run(machine)?.is_truthy() {
                    then_block.run(machine)?;
                } else if let Some(else_block) = else_block {
                    else_block.run(machine)?;
                }
            }
            Step::For {
                locals,
                init,
                condition,
                update,
                body,
            } => {
                machine.reset(locals);
                init.run(machine)?;
                while condition.run(machine)?.is_truthy() {
                    machine.tick()?;
                    body.run(machine)?;
                    update.run(machine)?;
                }
            }
            Step::ForEach {
                variable,
                collection,
                body,
            } => {
                let items: Vec<Value> = match collection.run(machine)? {
                    Value::Undefined | Value::Null => vec![],
                    Value::Array(items) => items,
                    Value::Object(fields) => fields.into_values().collect(),
                    Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
                    other => return Err(RuntimeError::NotIterable(other.type_name())),
                };
                for item in items {
                    machine.tick()?;
                    machine.locals[variable.slot] = item;
                    body.run(machine)?;
                }
            }
            Step::Switch { subject, body } => {
                subject.run(machine)?;
                body.run(machine)?;
            }
            Step::Label { guard, .. } => {
                if let Some(guard) = guard {
                    guard.run(machine)?;
                }
            }
        }
        Ok(())
    }
}

impl Interpretable for Expr {
    type Value = Value;

    fn run(&self, machine: &mut Machine) -> Result<Self::Value, RuntimeError> {
        match self {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Local(local) => Ok(machine.locals[local.slot].clone()),
            Expr::Model(name) => Ok(machine.model_field(name)),
            Expr::Member(target, name) => Ok(target.run(machine)?.member(name)),
            Expr::Index(target, index) => {
                let target = target.run(machine)?;
                let index = index.run(machine)?;
                Ok(target.index(&index))
            }
            Expr::Call {
                target,
                method,
                args,
            } => {
                let target = target.run(machine)?;
                let args = args
                    .iter()
                    .map(|arg| arg.run(machine))
                    .collect::<Result<Vec<_>, _>>()?;
                call_method(&target, method, &args)
            }
            Expr::Unary(op, operand) => op.apply(operand.run(machine)?),
            Expr::Update(op, local) => {
                let current = &machine.locals[local.slot];
                let updated = op.apply(current).ok_or_else(|| RuntimeError::InvalidUpdate {
                    operator: op.symbol(),
                    name: local.name.clone(),
                    found: current.type_name(),
                })?;
                machine.locals[local.slot] = updated.clone();
                Ok(updated)
            }
            Expr::Binary(left, op, right) => {
                let left = left.run(machine)?;
                if op.is_short_circuit() && !op.needs_right(&left) {
                    return Ok(left);
                }
                let right = right.run(machine)?;
                op.apply(left, right)
            }
            Expr::Conditional(condition, if_true, if_false) => {
                if condition.run(machine)?.is_truthy() {
                    if_true.run(machine)
                } else {
                    if_false.run(machine)
                }
            }
        }
    }
}
