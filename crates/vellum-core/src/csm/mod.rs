//! Concrete syntax model
//!
//! Each node kind has a frozen template describing how it prints. The
//! calculator folds a template into the flat model of one node (child
//! nodes stay opaque references, recursion happens through buffers, not
//! here), and the renderer folds the same template into fresh text for
//! nodes without lexical memory.
//!
//! ## Architecture
//!
//! - [`element`]: the template element catalog and its builder API
//! - [`registry`]: one frozen template per node kind
//! - [`calculator`]: template + node + optional pending change → flat model
//! - [`renderer`]: template + node → fresh token buffer, indentation applied

pub mod calculator;
pub mod element;
pub mod registry;
pub mod renderer;

pub use calculator::{CalculatedElement, CalculatedModel, calculate, calculate_with_change};
pub use element::{Condition, CsmElement};
pub use registry::template_for;
pub use renderer::ensure_node_text;
