//! Vellum Core
//!
//! Formatting preserving round trip engine. This crate parses a
//! document into a property tree with per node token buffers, lets
//! callers edit the tree through a small API, and reprints the result
//! with the minimal textual change: untouched regions keep their exact
//! spelling, new material is laid out by per kind syntax templates.

pub mod ast;
pub mod csm; // Concrete syntax model (templates, calculation, rendering)
pub mod error;
pub mod lexical; // Token buffers, diffing, and the editing facade
pub mod result;
pub mod syntax;

// Re-export commonly used types
pub use ast::{AstNode, Modifier, NodeBuilder, NodeId, NodeKind, Property, PropertyValue, SyntaxTree};
pub use csm::{
    CalculatedElement, CalculatedModel, Condition, CsmElement, calculate, calculate_with_change,
    ensure_node_text, template_for,
};
pub use error::{ErrorKind, VellumError};
pub use lexical::{
    Change, DifferenceElement, LexicalEditor, LineEnding, NodeText, TextAtom, apply,
    calculate_difference, text_of,
};
pub use result::Result;
pub use syntax::{LexerError, ParsedSource, Token, TokenKind, lex_with_trivia, parse_source};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vellum=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
