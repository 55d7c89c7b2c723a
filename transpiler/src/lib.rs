use ast::{Block, Segment};
use interpreter::{RenderOptions, ViewType};
use log::debug;

mod codegen;
mod error;
mod literal;
mod operator;
mod scope;

pub use codegen::Generator;
pub use error::*;
pub use literal::parse_literal;
pub use scope::ScopeTracker;

/// Supplies the top-level segments of a template. How the template text
/// was turned into segments is up to the implementation.
pub trait Parser {
    fn parse(&self) -> Vec<Segment>;
}

impl Parser for Vec<Segment> {
    fn parse(&self) -> Vec<Segment> {
        self.clone()
    }
}

impl Parser for Block {
    fn parse(&self) -> Vec<Segment> {
        self.segments.clone()
    }
}

impl<P: Parser + ?Sized> Parser for &P {
    fn parse(&self) -> Vec<Segment> {
        (**self).parse()
    }
}

pub struct Transpiler<P> {
    parser: P,
    options: RenderOptions,
}

impl<P: Parser> Transpiler<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn transpile(&self) -> Result<ViewType, TranspileError> {
        let segments = self.parser.parse();
        compile(&segments, self.options.clone())
    }
}

/// Transpiles segments with the default render options.
pub fn transpile(segments: &[Segment]) -> Result<ViewType, TranspileError> {
    compile(segments, RenderOptions::default())
}

fn compile(segments: &[Segment], options: RenderOptions) -> Result<ViewType, TranspileError> {
    let program = Generator::new().generate(segments)?;
    debug!("Transpiled view:\n{program}");
    Ok(ViewType::new(program, options))
}
