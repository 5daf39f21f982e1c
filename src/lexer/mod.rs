//! Lexer module for tokenizing trc source code.

mod token;
mod scanner;

pub use token::{lookup_keyword, lookup_type, Token, TokenKind, Type};
pub use scanner::Scanner;
