//! Error types for lexical preservation operations

use biome_text_size::TextRange;
use thiserror::Error;

use crate::ast::{NodeId, NodeKind, Property};

/// Main error type for lexical preservation operations
///
/// Every fallible operation in this crate reports failures through this
/// type. Recalculation errors are raised before any buffer is replaced,
/// so the tree and its stored text are never left half-updated.
#[derive(Debug, Error)]
pub enum VellumError {
    /// Lexing or parsing failures in source text
    #[error("Parse error: {message} at {span:?}")]
    ParseError { message: String, span: TextRange },

    /// A syntax template expected a differently shaped property value
    #[error(
        "Model mismatch on {node:?}.{property}: expected {expected}, found {found}"
    )]
    ModelMismatch {
        node: NodeKind,
        property: Property,
        expected: &'static str,
        found: &'static str,
    },

    /// An attribute value has no corresponding token form
    #[error("Attribute '{property}' does not correspond to any expected token. Value: {value}")]
    UnsupportedAtom { property: Property, value: String },

    /// A list change referenced an index outside the current bounds
    #[error("Index {index} out of range for list '{property}' of length {len}")]
    IndexOutOfRange {
        property: Property,
        index: usize,
        len: usize,
    },

    /// A node handle that the target tree never issued
    #[error("Unknown node {id:?}")]
    UnknownNode { id: NodeId },

    /// An edit would attach a node where its buffer cannot serialize
    #[error("Cannot attach node {id:?} under {target:?}: {reason}")]
    InvalidAttachment {
        id: NodeId,
        target: NodeId,
        reason: &'static str,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Model,
    Attribute,
    Bounds,
    Tree,
    Internal,
}

impl VellumError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VellumError::ParseError { .. } => ErrorKind::Parse,
            VellumError::ModelMismatch { .. } => ErrorKind::Model,
            VellumError::UnsupportedAtom { .. } => ErrorKind::Attribute,
            VellumError::IndexOutOfRange { .. } => ErrorKind::Bounds,
            VellumError::UnknownNode { .. } => ErrorKind::Tree,
            VellumError::InvalidAttachment { .. } => ErrorKind::Tree,
            VellumError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the tree and its buffers are intact)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Internal)
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>, span: TextRange) -> Self {
        Self::ParseError {
            message: message.into(),
            span,
        }
    }

    /// Create a model mismatch error
    pub fn model_mismatch(
        node: NodeKind,
        property: Property,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::ModelMismatch {
            node,
            property,
            expected,
            found,
        }
    }

    /// Create an unsupported atom error
    pub fn unsupported_atom(property: Property, value: impl Into<String>) -> Self {
        Self::UnsupportedAtom {
            property,
            value: value.into(),
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(property: Property, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            property,
            index,
            len,
        }
    }

    /// Create an unknown node error
    pub fn unknown_node(id: NodeId) -> Self {
        Self::UnknownNode { id }
    }

    /// Create an invalid attachment error
    pub fn invalid_attachment(id: NodeId, target: NodeId, reason: &'static str) -> Self {
        Self::InvalidAttachment { id, target, reason }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
