//! Properties and property values attached to syntax tree nodes

use std::fmt;

use crate::ast::NodeId;
use crate::syntax::TokenKind;

/// Identifier of a node property
///
/// Properties are the only edges in the tree model: a node owns its
/// children exclusively through node-valued properties, and owns its
/// scalar data (names, literal values, modifier keywords) through
/// scalar-valued ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Type declarations of a compilation unit
    Types,
    /// Modifier keywords of a declaration
    Modifiers,
    /// Declared or referenced name
    Name,
    /// Types named in an `extends` clause
    ExtendedTypes,
    /// Member declarations of a class body
    Members,
    /// Declared type of a field
    FieldType,
    /// Optional initializer expression of a field
    Initializer,
    /// Literal value of an expression
    Value,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Types => "types",
            Property::Modifiers => "modifiers",
            Property::Name => "name",
            Property::ExtendedTypes => "extendedTypes",
            Property::Members => "members",
            Property::FieldType => "fieldType",
            Property::Initializer => "initializer",
            Property::Value => "value",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier keyword of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    /// Source text of the keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }

    /// Token kind this modifier lexes as
    pub fn token_kind(&self) -> TokenKind {
        match self {
            Modifier::Public => TokenKind::PublicKw,
            Modifier::Protected => TokenKind::ProtectedKw,
            Modifier::Private => TokenKind::PrivateKw,
            Modifier::Static => TokenKind::StaticKw,
            Modifier::Final => TokenKind::FinalKw,
            Modifier::Abstract => TokenKind::AbstractKw,
        }
    }

    pub fn from_keyword(text: &str) -> Option<Modifier> {
        match text {
            "public" => Some(Modifier::Public),
            "protected" => Some(Modifier::Protected),
            "private" => Some(Modifier::Private),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            "abstract" => Some(Modifier::Abstract),
            _ => None,
        }
    }

    pub fn from_token_kind(kind: TokenKind) -> Option<Modifier> {
        match kind {
            TokenKind::PublicKw => Some(Modifier::Public),
            TokenKind::ProtectedKw => Some(Modifier::Protected),
            TokenKind::PrivateKw => Some(Modifier::Private),
            TokenKind::StaticKw => Some(Modifier::Static),
            TokenKind::FinalKw => Some(Modifier::Final),
            TokenKind::AbstractKw => Some(Modifier::Abstract),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Value stored under a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Absent optional property
    None,
    /// Identifier text
    Ident(String),
    /// String content, without delimiters
    Str(String),
    /// Integer value; the grammar has no sign prefix, so only values
    /// zero and above have a token form
    Int(i64),
    /// Single modifier keyword
    Modifier(Modifier),
    /// Single child node
    Node(NodeId),
    /// List of child nodes
    Nodes(Vec<NodeId>),
    /// List of modifier keywords
    Modifiers(Vec<Modifier>),
}

impl PropertyValue {
    pub fn ident(text: impl Into<String>) -> PropertyValue {
        PropertyValue::Ident(text.into())
    }

    pub fn string(text: impl Into<String>) -> PropertyValue {
        PropertyValue::Str(text.into())
    }

    /// Short value-shape name used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            PropertyValue::None => "none",
            PropertyValue::Ident(_) => "identifier",
            PropertyValue::Str(_) => "string",
            PropertyValue::Int(_) => "integer",
            PropertyValue::Modifier(_) => "modifier",
            PropertyValue::Node(_) => "node",
            PropertyValue::Nodes(_) => "node list",
            PropertyValue::Modifiers(_) => "modifier list",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PropertyValue::None)
    }

    /// Whether a conditional `IsPresent` test passes for this value
    pub fn is_present(&self) -> bool {
        !self.is_none()
    }

    /// Length of a list value, or `None` for scalar values
    ///
    /// An absent property counts as an empty list so that optional lists
    /// behave like empty ones.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            PropertyValue::None => Some(0),
            PropertyValue::Nodes(nodes) => Some(nodes.len()),
            PropertyValue::Modifiers(modifiers) => Some(modifiers.len()),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            PropertyValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[NodeId]> {
        match self {
            PropertyValue::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_modifiers(&self) -> Option<&[Modifier]> {
        match self {
            PropertyValue::Modifiers(modifiers) => Some(modifiers),
            _ => None,
        }
    }
}

impl From<NodeId> for PropertyValue {
    fn from(id: NodeId) -> Self {
        PropertyValue::Node(id)
    }
}

impl From<Modifier> for PropertyValue {
    fn from(modifier: Modifier) -> Self {
        PropertyValue::Modifier(modifier)
    }
}
