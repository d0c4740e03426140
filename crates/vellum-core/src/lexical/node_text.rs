//! Per-node token buffers
//!
//! A buffer ([`NodeText`]) is a flat sequence of atoms: literal tokens
//! and references to child nodes. Recursively expanding the root
//! buffer yields the document text. Buffers are replaced wholesale by
//! the recalculation pipeline after a successful merge; nothing edits
//! one in place.

use crate::ast::{NodeId, SyntaxTree};
use crate::csm::renderer;
use crate::result::Result;
use crate::syntax::TokenKind;

/// Line ending convention of a document
///
/// Detected from the first line break at parse time. Synthesized line
/// breaks always follow the document convention, never a hard coded
/// `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Classify the text of a newline token
    pub fn of(text: &str) -> LineEnding {
        match text {
            "\r\n" => LineEnding::Crlf,
            "\r" => LineEnding::Cr,
            _ => LineEnding::Lf,
        }
    }
}

/// One element of a token buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAtom {
    /// A literal token with its exact source text
    Token { kind: TokenKind, text: String },
    /// Reference to a child node, expanded in place
    Child(NodeId),
}

impl TextAtom {
    pub fn token(kind: TokenKind, text: impl Into<String>) -> TextAtom {
        TextAtom::Token {
            kind,
            text: text.into(),
        }
    }

    pub fn child(id: NodeId) -> TextAtom {
        TextAtom::Child(id)
    }

    pub fn is_child(&self) -> bool {
        matches!(self, TextAtom::Child(_))
    }

    /// Whitespace or line break token
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TextAtom::Token { kind, .. } if kind.is_whitespace())
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TextAtom::Token { kind, .. } if kind.is_comment())
    }

    pub fn is_trivia(&self) -> bool {
        self.is_whitespace() || self.is_comment()
    }
}

/// Token buffer of a single node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeText {
    atoms: Vec<TextAtom>,
}

impl NodeText {
    pub fn new(atoms: Vec<TextAtom>) -> NodeText {
        NodeText { atoms }
    }

    pub fn atoms(&self) -> &[TextAtom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Expand a node to text, buffer first
///
/// A node without a buffer (built programmatically and never printed
/// before) is rendered from its syntax template. Children inside a
/// rendered region that do carry buffers keep their stored formatting,
/// so mixing parsed and fresh nodes works in either direction.
pub fn text_of(tree: &SyntaxTree, node: NodeId) -> Result<String> {
    let mut out = String::new();
    expand_into(tree, node, &mut out)?;
    Ok(out)
}

pub(crate) fn expand_into(tree: &SyntaxTree, node: NodeId, out: &mut String) -> Result<()> {
    match tree.node_text(node) {
        Some(buffer) => {
            for atom in buffer.atoms() {
                match atom {
                    TextAtom::Token { text, .. } => out.push_str(text),
                    TextAtom::Child(child) => expand_into(tree, *child, out)?,
                }
            }
            Ok(())
        }
        None => renderer::render_into(tree, node, out),
    }
}
