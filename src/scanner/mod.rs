pub mod lexer;
pub mod token;

use crate::error::SyntaxError;
use token::Token;

/// Scan one source line into a list of tokens ending with `Eof`.
pub fn scan(source: &str) -> Result<Vec<Token>, SyntaxError> {
    lexer::scan_all(source)
}
