//! Abstract syntax tree model
//!
//! The tree is an arena of nodes addressed by [`NodeId`] handles. Every
//! edge and every scalar datum of a node is a [`Property`] holding a
//! [`PropertyValue`]; the node kinds and properties form a closed
//! catalog that the syntax templates in [`crate::csm`] are written
//! against.
//!
//! Nodes optionally carry a token buffer (their lexical memory). Buffers
//! are created by the parser or on demand by the renderer, and are only
//! rewritten through the recalculation pipeline in [`crate::lexical`].

pub mod arena;
pub mod kind;
pub mod property;

pub use arena::{AstNode, NodeBuilder, NodeId, SyntaxTree};
pub use kind::NodeKind;
pub use property::{Modifier, Property, PropertyValue};
