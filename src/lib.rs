//! A one-line expression language checked by syntax-directed translation.
//!
//! A line is scanned, parsed into a [`ast::SyntaxNode`] and evaluated
//! bottom-up into a [`Value`]. Every call is independent: no variable
//! bindings survive between lines.

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod repl;
pub mod scanner;

pub use error::{Error, ErrorKind, SemanticError, SyntaxError};
pub use evaluator::value::Value;

/// Parse and evaluate one line.
///
/// Errors carry the line as source code so they render as miette diagnostics.
pub fn evaluate(line: &str) -> Result<Value, Error> {
    let tree =
        parser::parse(line).map_err(|e| Error::from(e).with_source_code("input", line))?;
    evaluator::Evaluator::new()
        .evaluate(&tree)
        .map_err(|e| Error::from(e).with_source_code("input", line))
}
