//! Source text front end
//!
//! A trivia-preserving lexer and a recursive descent parser. Parsing is
//! the only way to obtain a tree whose buffers mirror an existing
//! document; trees built programmatically get their buffers from the
//! template renderer instead.

pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{LexResult, LexerError, lex_with_trivia};
pub use parser::{ParsedSource, parse_source};
pub use token::{Token, TokenKind};
