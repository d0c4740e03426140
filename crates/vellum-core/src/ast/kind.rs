//! Node kinds of the supported language

use std::fmt;

/// Kind of a syntax tree node
///
/// The catalog is closed: every kind has exactly one syntax template in
/// the template registry, and the parser only ever produces these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level source file, a list of type declarations
    CompilationUnit,
    /// Class declaration with modifiers, name, extends clause and members
    ClassDecl,
    /// Field declaration inside a class body
    FieldDecl,
    /// Reference to a type by name
    TypeRef,
    /// Reference to a value by name
    NameExpr,
    /// Integer literal expression
    IntLit,
    /// Single-line string literal expression
    StringLit,
    /// Multi-line text block expression, delimited by triple quotes
    TextBlock,
}

impl NodeKind {
    /// All node kinds, in registry order
    pub const ALL: [NodeKind; 8] = [
        NodeKind::CompilationUnit,
        NodeKind::ClassDecl,
        NodeKind::FieldDecl,
        NodeKind::TypeRef,
        NodeKind::NameExpr,
        NodeKind::IntLit,
        NodeKind::StringLit,
        NodeKind::TextBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "CompilationUnit",
            NodeKind::ClassDecl => "ClassDecl",
            NodeKind::FieldDecl => "FieldDecl",
            NodeKind::TypeRef => "TypeRef",
            NodeKind::NameExpr => "NameExpr",
            NodeKind::IntLit => "IntLit",
            NodeKind::StringLit => "StringLit",
            NodeKind::TextBlock => "TextBlock",
        }
    }

    /// Whether a literal of this kind is written with triple-quote delimiters
    pub fn uses_triple_quotes(&self) -> bool {
        matches!(self, NodeKind::TextBlock)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
