//! Syntax model calculator
//!
//! Folds a node's template into its flat calculated model: literal
//! tokens and child references in print order. Indentation markers do
//! not materialize, line breaks do. With a pending change the fold sees
//! the post-change property values while the tree still holds the
//! pre-change state, so the same code computes both sides of a diff.

use tracing::trace;

use crate::ast::{NodeId, NodeKind, Property, PropertyValue, SyntaxTree};
use crate::csm::element::{Condition, CsmElement};
use crate::csm::registry::template_for;
use crate::error::VellumError;
use crate::lexical::Change;
use crate::result::Result;
use crate::syntax::TokenKind;

/// Flat print-order model of a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatedModel {
    elements: Vec<CalculatedElement>,
}

impl CalculatedModel {
    pub fn elements(&self) -> &[CalculatedElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One atom of a calculated model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatedElement {
    /// Literal token with its exact text
    Token { kind: TokenKind, text: String },
    /// Child node, printed through its own buffer
    Child(NodeId),
}

impl CalculatedElement {
    pub fn token(kind: TokenKind, text: impl Into<String>) -> CalculatedElement {
        CalculatedElement::Token {
            kind,
            text: text.into(),
        }
    }

    pub fn child(id: NodeId) -> CalculatedElement {
        CalculatedElement::Child(id)
    }

    /// Whitespace or line break token
    pub fn is_whitespace(&self) -> bool {
        matches!(self, CalculatedElement::Token { kind, .. } if kind.is_whitespace())
    }
}

/// Calculate the model of `node` as the tree currently stands
pub fn calculate(tree: &SyntaxTree, node: NodeId) -> Result<CalculatedModel> {
    calculate_with_change(tree, node, &Change::None)
}

/// Calculate the model of `node` with `change` applied hypothetically
pub fn calculate_with_change(
    tree: &SyntaxTree,
    node: NodeId,
    change: &Change,
) -> Result<CalculatedModel> {
    let kind = tree
        .kind(node)
        .ok_or_else(|| VellumError::unknown_node(node))?;
    let mut elements = Vec::new();
    fold(tree, node, kind, change, template_for(kind), &mut elements)?;
    trace!(node = ?node, kind = %kind, atoms = elements.len(), "calculated syntax model");
    Ok(CalculatedModel { elements })
}

fn fold(
    tree: &SyntaxTree,
    node: NodeId,
    kind: NodeKind,
    change: &Change,
    element: &CsmElement,
    out: &mut Vec<CalculatedElement>,
) -> Result<()> {
    match element {
        // Indentation only shapes rendered output, never the model
        CsmElement::None | CsmElement::Indent | CsmElement::Unindent => Ok(()),

        CsmElement::Newline => {
            out.push(CalculatedElement::token(TokenKind::Newline, "\n"));
            Ok(())
        }

        CsmElement::Token(token_kind) => {
            let text = token_kind.fixed_text().ok_or_else(|| {
                VellumError::internal_error(format!(
                    "template token {token_kind:?} has no canonical text"
                ))
            })?;
            out.push(CalculatedElement::token(*token_kind, text));
            Ok(())
        }

        CsmElement::Attribute(property) => {
            let value = effective(tree, node, kind, change, *property)?;
            let (token_kind, text) = scalar_token(*property, &value)?;
            out.push(CalculatedElement::token(token_kind, text));
            Ok(())
        }

        CsmElement::StringLiteral(property) => {
            let value = effective(tree, node, kind, change, *property)?;
            let (token_kind, text) = quoted_token(kind, *property, &value)?;
            out.push(CalculatedElement::token(token_kind, text));
            Ok(())
        }

        CsmElement::Child(property) => {
            let value = effective(tree, node, kind, change, *property)?;
            match value {
                PropertyValue::Node(child) => {
                    out.push(CalculatedElement::child(child));
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
                fold(tree, node, kind, change, inner, out)?;
            }
            Ok(())
        }

        CsmElement::Conditional {
            property,
            condition,
            then_element,
            else_element,
        } => {
            let value = effective(tree, node, kind, change, *property)?;
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
            fold(tree, node, kind, change, branch, out)
        }

        CsmElement::List {
            property,
            separator_pre,
            separator_post,
            preceding,
            following,
        } => {
            let value = effective(tree, node, kind, change, *property)?;
            let parts = ListParts {
                separator_pre: separator_pre.as_ref(),
                separator_post: separator_post.as_ref(),
                preceding: preceding.as_ref(),
                following: following.as_ref(),
            };
            match &value {
                PropertyValue::Nodes(children) => fold_list(
                    tree,
                    node,
                    kind,
                    change,
                    parts,
                    children.len(),
                    |i, out| {
                        out.push(CalculatedElement::child(children[i]));
                        Ok(())
                    },
                    out,
                ),
                PropertyValue::Modifiers(modifiers) => fold_list(
                    tree,
                    node,
                    kind,
                    change,
                    parts,
                    modifiers.len(),
                    |i, out| {
                        let m = modifiers[i];
                        out.push(CalculatedElement::token(m.token_kind(), m.keyword()));
                        Ok(())
                    },
                    out,
                ),
                // An absent optional list behaves like an empty one
                PropertyValue::None => Ok(()),
                other => Err(VellumError::model_mismatch(
                    kind,
                    *property,
                    "list value",
                    other.shape(),
                )),
            }
        }
    }
}

struct ListParts<'a> {
    separator_pre: &'a CsmElement,
    separator_post: &'a CsmElement,
    preceding: &'a CsmElement,
    following: &'a CsmElement,
}

/// Shared list layout: wrappers around a non-empty list, `separator_pre`
/// before every element but the first, `separator_post` after every
/// element but the last
#[allow(clippy::too_many_arguments)]
fn fold_list(
    tree: &SyntaxTree,
    node: NodeId,
    kind: NodeKind,
    change: &Change,
    parts: ListParts<'_>,
    len: usize,
    mut emit: impl FnMut(usize, &mut Vec<CalculatedElement>) -> Result<()>,
    out: &mut Vec<CalculatedElement>,
) -> Result<()> {
    if len == 0 {
        return Ok(());
    }
    fold(tree, node, kind, change, parts.preceding, out)?;
    for i in 0..len {
        if i != 0 {
            fold(tree, node, kind, change, parts.separator_pre, out)?;
        }
        emit(i, out)?;
        if i != len - 1 {
            fold(tree, node, kind, change, parts.separator_post, out)?;
        }
    }
    fold(tree, node, kind, change, parts.following, out)
}

fn effective(
    tree: &SyntaxTree,
    node: NodeId,
    kind: NodeKind,
    change: &Change,
    property: Property,
) -> Result<PropertyValue> {
    let current = tree
        .value(node, property)
        .cloned()
        .unwrap_or(PropertyValue::None);
    change.effective_value(kind, property, &current)
}

/// Derive the token form of a scalar attribute value
pub(crate) fn scalar_token(
    property: Property,
    value: &PropertyValue,
) -> Result<(TokenKind, String)> {
    match value {
        PropertyValue::Ident(text) => Ok((TokenKind::Ident, text.clone())),
        // A sign prefix never lexes, so negative values have no token form
        PropertyValue::Int(v) if *v >= 0 => Ok((TokenKind::IntLiteral, v.to_string())),
        PropertyValue::Modifier(m) => Ok((m.token_kind(), m.keyword().to_string())),
        other => Err(VellumError::unsupported_atom(property, describe_value(other))),
    }
}

/// Derive the quoted token form of a string value, delimiters chosen by
/// the node kind
pub(crate) fn quoted_token(
    kind: NodeKind,
    property: Property,
    value: &PropertyValue,
) -> Result<(TokenKind, String)> {
    match value {
        PropertyValue::Str(content) => {
            if kind.uses_triple_quotes() {
                Ok((
                    TokenKind::TextBlockLiteral,
                    format!("\"\"\"{content}\"\"\""),
                ))
            } else {
                Ok((TokenKind::StringLiteral, format!("\"{content}\"")))
            }
        }
        other => Err(VellumError::unsupported_atom(property, describe_value(other))),
    }
}

fn describe_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Str(s) => s.clone(),
        PropertyValue::Ident(s) => s.clone(),
        PropertyValue::Int(v) => v.to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Modifier;
    use crate::syntax::parse_source;

    fn token_texts(model: &CalculatedModel) -> Vec<String> {
        model
            .elements()
            .iter()
            .map(|e| match e {
                CalculatedElement::Token { text, .. } => text.clone(),
                CalculatedElement::Child(id) => format!("<{id:?}>"),
            })
            .collect()
    }

    #[test]
    fn plain_class_model() {
        let parsed = parse_source("class A{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let model = calculate(&parsed.tree, class).unwrap();
        assert_eq!(token_texts(&model), vec!["class", " ", "A", "{", "}"]);
    }

    #[test]
    fn modifier_list_adds_keyword_and_separator() {
        let parsed = parse_source("class A{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let change = Change::ListAdd {
            property: Property::Modifiers,
            index: 0,
            element: PropertyValue::Modifier(Modifier::Public),
        };
        let model = calculate_with_change(&parsed.tree, class, &change).unwrap();
        assert_eq!(
            token_texts(&model),
            vec!["public", " ", "class", " ", "A", "{", "}"]
        );
    }

    #[test]
    fn extends_clause_materializes_for_one_element() {
        let parsed = parse_source("class A extends B{ }").unwrap();
        let tree = &parsed.tree;
        let class = tree.children(parsed.root, Property::Types)[0];
        let model = calculate(tree, class).unwrap();

        let texts = token_texts(&model);
        assert_eq!(texts[..6], ["class", " ", "A", " ", "extends", " "]);
        assert!(matches!(
            model.elements()[6],
            CalculatedElement::Child(_)
        ));
        assert_eq!(texts[7..], ["{", "}"]);
    }

    #[test]
    fn removing_the_only_extended_type_drops_the_clause() {
        let parsed = parse_source("class A extends B{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let change = Change::ListRemove {
            property: Property::ExtendedTypes,
            index: 0,
        };
        let model = calculate_with_change(&parsed.tree, class, &change).unwrap();
        assert_eq!(token_texts(&model), vec!["class", " ", "A", "{", "}"]);
    }

    #[test]
    fn conditional_initializer_region() {
        let parsed = parse_source("class A{ int x; int y = 2; }").unwrap();
        let tree = &parsed.tree;
        let class = tree.children(parsed.root, Property::Types)[0];
        let members = tree.children(class, Property::Members);

        let bare = calculate(tree, members[0]).unwrap();
        assert!(!token_texts(&bare).contains(&"=".to_string()));

        let initialized = calculate(tree, members[1]).unwrap();
        assert!(token_texts(&initialized).contains(&"=".to_string()));
    }

    #[test]
    fn string_and_text_block_delimiters() {
        let parsed = parse_source("class A{ String s = \"hi\"; String t = \"\"\"big\"\"\"; }").unwrap();
        let tree = &parsed.tree;
        let class = tree.children(parsed.root, Property::Types)[0];
        let members = tree.children(class, Property::Members);

        let s_init = tree.child(members[0], Property::Initializer).unwrap();
        let s_model = calculate(tree, s_init).unwrap();
        assert_eq!(token_texts(&s_model), vec!["\"hi\""]);

        let t_init = tree.child(members[1], Property::Initializer).unwrap();
        let t_model = calculate(tree, t_init).unwrap();
        assert_eq!(token_texts(&t_model), vec!["\"\"\"big\"\"\""]);
    }

    #[test]
    fn value_without_token_form_is_rejected() {
        let parsed = parse_source("class A{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let change = Change::Property {
            property: Property::Name,
            old: PropertyValue::ident("A"),
            new: PropertyValue::string("class B"),
        };
        let err = calculate_with_change(&parsed.tree, class, &change).unwrap_err();
        match err {
            VellumError::UnsupportedAtom { property, value } => {
                assert_eq!(property, Property::Name);
                assert_eq!(value, "class B");
            }
            other => panic!("Expected UnsupportedAtom, got {other}"),
        }
    }

    #[test]
    fn negative_int_has_no_token_form() {
        let parsed = parse_source("class A{ int x = 1; }").unwrap();
        let tree = &parsed.tree;
        let class = tree.children(parsed.root, Property::Types)[0];
        let field = tree.children(class, Property::Members)[0];
        let init = tree.child(field, Property::Initializer).unwrap();

        let change = Change::Property {
            property: Property::Value,
            old: PropertyValue::Int(1),
            new: PropertyValue::Int(-5),
        };
        let err = calculate_with_change(tree, init, &change).unwrap_err();
        match err {
            VellumError::UnsupportedAtom { property, value } => {
                assert_eq!(property, Property::Value);
                assert_eq!(value, "-5");
            }
            other => panic!("Expected UnsupportedAtom, got {other}"),
        }
    }

    #[test]
    fn empty_list_contributes_nothing() {
        let parsed = parse_source("class A{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let model = calculate(&parsed.tree, class).unwrap();
        // No separators or wrappers from the empty extends and members lists
        assert_eq!(model.len(), 5);
    }
}
