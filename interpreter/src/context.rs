use crate::Value;

/// The bare name under which a view exposes its whole model.
pub const MODEL_NAME: &str = "model";

/// The ambient state of a view instance: what model-bound names read from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelContext {
    model: Value,
}

impl ModelContext {
    pub fn new(model: Option<Value>) -> Self {
        Self {
            model: model.unwrap_or_default(),
        }
    }

    pub fn model(&self) -> &Value {
        &self.model
    }

    pub(crate) fn model_mut(&mut self) -> &mut Value {
        &mut self.model
    }

    /// Resolves a model-bound name. `model` is the model itself, any other
    /// name is a field of the model object.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        if name == MODEL_NAME {
            return Some(&self.model);
        }
        match &self.model {
            Value::Object(fields) => fields.get(name),
            _ => None,
        }
    }
}
