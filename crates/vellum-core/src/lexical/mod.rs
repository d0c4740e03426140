//! Lexical preservation engine
//!
//! Everything needed to round trip a document through edits without
//! disturbing its formatting. [`node_text`] stores per node token
//! buffers, [`change`] describes pending mutations, [`difference`]
//! aligns the before and after syntax models, [`applier`] merges the
//! resulting script into a buffer, and [`editor`] drives the whole
//! pipeline behind a small API.

pub mod applier;
pub mod change;
pub mod difference;
pub mod editor;
pub mod node_text;

pub use applier::apply;
pub use change::Change;
pub use difference::{calculate as calculate_difference, edit_cost, DifferenceElement};
pub use editor::LexicalEditor;
pub use node_text::{text_of, LineEnding, NodeText, TextAtom};
