use std::sync::Arc;

use log::trace;
use serde::Deserialize;

use crate::{
    exec::{Interpretable, Machine},
    ModelContext, Program, RuntimeError, Value,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Written in place of `undefined` and `null` values.
    pub undefined_text: String,
    /// Upper bound on loop iterations within a single render.
    pub iteration_limit: Option<u64>,
}

/// A compiled view. Instantiate it once per model.
#[derive(Clone, Debug)]
pub struct ViewType {
    program: Arc<Program>,
    options: RenderOptions,
}

impl ViewType {
    pub fn new(program: Program, options: RenderOptions) -> Self {
        Self {
            program: Arc::new(program),
            options,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn instantiate(&self, model: Option<Value>) -> View {
        View {
            view: self.clone(),
            context: ModelContext::new(model),
        }
    }
}

/// A view bound to a model.
#[derive(Clone, Debug)]
pub struct View {
    view: ViewType,
    context: ModelContext,
}

impl View {
    pub fn model(&self) -> &Value {
        self.context.model()
    }

    pub fn render(&self) -> Result<String, RuntimeError> {
        let program = self.view.program();
        trace!("Rendering view with {} local slots", program.slots);
        let mut machine = Machine::new(program, &self.context, self.view.options());
        program.body.run(&mut machine)?;
        Ok(machine.buffer.finish())
    }
}
