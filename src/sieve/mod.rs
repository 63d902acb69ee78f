pub mod lexer;
pub mod parse_tree;
pub mod parser;
pub mod transform;

use crate::error::SieveError;
use crate::model::script::Commands;

/// Lex, parse and transform script text into its domain model.
pub fn compile(input: &str) -> Result<Commands, SieveError> {
    let tree = parser::parse(input)?;
    transform::transform(&tree)
}
