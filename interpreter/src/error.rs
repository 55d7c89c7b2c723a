#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Cannot apply `{operator}` to {left} and {right}")]
    InvalidOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("Cannot call `{method}` on {target}")]
    CallOnNullish {
        method: String,
        target: &'static str,
    },

    #[error("{target} has no method `{method}`")]
    UnknownMethod {
        method: String,
        target: &'static str,
    },

    #[error("Invalid argument to `{method}`: {message}")]
    InvalidArgument { method: String, message: String },

    #[error("Cannot iterate over {0}")]
    NotIterable(&'static str),

    #[error("Cannot assign `{path}`: {message}")]
    InvalidAssignment { path: String, message: String },

    #[error("Cannot apply `{operator}` to `{name}` holding {found}")]
    InvalidUpdate {
        operator: &'static str,
        name: String,
        found: &'static str,
    },

    #[error("Render exceeded the limit of {0} loop iterations")]
    IterationLimit(u64),
}

impl RuntimeError {
    pub(crate) fn argument<M: ToString, S: ToString>(method: M, message: S) -> Self {
        Self::InvalidArgument {
            method: method.to_string(),
            message: message.to_string(),
        }
    }
}
