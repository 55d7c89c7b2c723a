mod context;
mod error;
mod exec;
mod methods;
mod ops;
mod program;
mod value;
mod view;

pub use context::*;
pub use error::*;
pub use methods::call_method;
pub use ops::*;
pub use program::*;
pub use value::Value;
pub use view::*;
