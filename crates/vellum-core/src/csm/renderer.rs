//! Non-incremental template renderer
//!
//! Prints a node straight from its template, with four spaces of
//! indentation per level and the document's line ending. This is the
//! path for nodes that have no buffer yet: a fresh subtree woven into
//! an existing document gets a rendered buffer on the way in, and a
//! tree built entirely in memory can be printed without ever parsing.

use crate::ast::{NodeId, NodeKind, Property, PropertyValue, SyntaxTree};
use crate::csm::calculator::{quoted_token, scalar_token};
use crate::csm::element::{Condition, CsmElement};
use crate::csm::registry::template_for;
use crate::error::VellumError;
use crate::lexical::node_text::{self, LineEnding, NodeText, TextAtom};
use crate::result::Result;
use crate::syntax::TokenKind;

const INDENT: &str = "    ";

/// Build and store a buffer for `node` if it has none, recursively
/// covering buffer-less children
///
/// Children that already carry a buffer keep it; only the gaps are
/// filled in. Rendering never touches an existing buffer.
pub fn ensure_node_text(tree: &mut SyntaxTree, node: NodeId) -> Result<()> {
    if tree.has_node_text(node) {
        return Ok(());
    }
    let rendered = render_atoms(tree, node)?;
    for atom in &rendered {
        if let TextAtom::Child(child) = atom {
            ensure_node_text(tree, *child)?;
        }
    }
    tree.set_node_text(node, NodeText::new(rendered));
    Ok(())
}

/// Render `node` to text without storing anything
///
/// Children with buffers are expanded from them, so stored formatting
/// survives inside freshly rendered regions.
pub(crate) fn render_into(tree: &SyntaxTree, node: NodeId, out: &mut String) -> Result<()> {
    for atom in render_atoms(tree, node)? {
        match atom {
            TextAtom::Token { text, .. } => out.push_str(&text),
            TextAtom::Child(child) => node_text::expand_into(tree, child, out)?,
        }
    }
    Ok(())
}

fn render_atoms(tree: &SyntaxTree, node: NodeId) -> Result<Vec<TextAtom>> {
    let kind = tree
        .kind(node)
        .ok_or_else(|| VellumError::unknown_node(node))?;
    let mut state = RenderState {
        atoms: Vec::new(),
        indent: 0,
        line_ending: tree.line_ending(),
    };
    walk(tree, node, kind, template_for(kind), &mut state)?;
    Ok(state.atoms)
}

struct RenderState {
    atoms: Vec<TextAtom>,
    indent: usize,
    line_ending: LineEnding,
}

impl RenderState {
    fn push_newline(&mut self) {
        self.atoms
            .push(TextAtom::token(TokenKind::Newline, self.line_ending.as_str()));
        if self.indent > 0 {
            self.atoms
                .push(TextAtom::token(TokenKind::Whitespace, INDENT.repeat(self.indent)));
        }
    }
}

fn walk(
    tree: &SyntaxTree,
    node: NodeId,
    kind: NodeKind,
    element: &CsmElement,
    state: &mut RenderState,
) -> Result<()> {
    match element {
        CsmElement::None => Ok(()),

        CsmElement::Indent => {
            state.indent += 1;
            Ok(())
        }

        CsmElement::Unindent => {
            state.indent = state.indent.saturating_sub(1);
            Ok(())
        }

        CsmElement::Newline => {
            state.push_newline();
            Ok(())
        }

        CsmElement::Token(token_kind) => {
            let text = token_kind.fixed_text().ok_or_else(|| {
                VellumError::internal_error(format!(
                    "template token {token_kind:?} has no canonical text"
                ))
            })?;
            state.atoms.push(TextAtom::token(*token_kind, text));
            Ok(())
        }

        CsmElement::Attribute(property) => {
            let value = current(tree, node, *property);
            let (token_kind, text) = scalar_token(*property, &value)?;
            state.atoms.push(TextAtom::token(token_kind, text));
            Ok(())
        }

        CsmElement::StringLiteral(property) => {
            let value = current(tree, node, *property);
            let (token_kind, text) = quoted_token(kind, *property, &value)?;
            state.atoms.push(TextAtom::token(token_kind, text));
            Ok(())
        }

        CsmElement::Child(property) => {
            match current(tree, node, *property) {
                PropertyValue::Node(child) => {
                    state.atoms.push(TextAtom::child(child));
                    Ok(())
                }
                PropertyValue::None => Ok(()),
                other => Err(VellumError::model_mismatch(
                    kind,
                    *property,
                    "node",
                    other.shape(),
                )),
            }
        }

        CsmElement::Sequence(elements) => {
            for inner in elements {
                walk(tree, node, kind, inner, state)?;
            }
            Ok(())
        }

        CsmElement::Conditional {
            property,
            condition,
            then_element,
            else_element,
        } => {
            let value = current(tree, node, *property);
            let taken = match condition {
                Condition::IsPresent => value.is_present(),
                Condition::IsEmpty | Condition::IsNotEmpty => {
                    let len = value.list_len().ok_or_else(|| {
                        VellumError::model_mismatch(kind, *property, "list value", value.shape())
                    })?;
                    match condition {
                        Condition::IsEmpty => len == 0,
                        _ => len > 0,
                    }
                }
            };
            let branch = if taken { then_element } else { else_element };
            walk(tree, node, kind, branch, state)
        }

        CsmElement::List {
            property,
            separator_pre,
            separator_post,
            preceding,
            following,
        } => {
            let value = current(tree, node, *property);
            let len = match &value {
                PropertyValue::Nodes(children) => children.len(),
                PropertyValue::Modifiers(modifiers) => modifiers.len(),
                PropertyValue::None => 0,
                other => {
                    return Err(VellumError::model_mismatch(
                        kind,
                        *property,
                        "list value",
                        other.shape(),
                    ));
                }
            };
            if len == 0 {
                return Ok(());
            }
            walk(tree, node, kind, preceding, state)?;
            for i in 0..len {
                if i != 0 {
                    walk(tree, node, kind, separator_pre, state)?;
                }
                match &value {
                    PropertyValue::Nodes(children) => {
                        state.atoms.push(TextAtom::child(children[i]));
                    }
                    PropertyValue::Modifiers(modifiers) => {
                        let m = modifiers[i];
                        state
                            .atoms
                            .push(TextAtom::token(m.token_kind(), m.keyword()));
                    }
                    _ => {}
                }
                if i != len - 1 {
                    walk(tree, node, kind, separator_post, state)?;
                }
            }
            walk(tree, node, kind, following, state)
        }
    }
}

fn current(tree: &SyntaxTree, node: NodeId, property: Property) -> PropertyValue {
    tree.value(node, property)
        .cloned()
        .unwrap_or(PropertyValue::None)
}
