//! Script trees: the node model and the loader that produces it.

pub mod node;
pub mod parser;

pub use node::{Node, Value};
pub use parser::{parse, LambdaParser, ScriptLoader};
