//! Syntax template elements
//!
//! Templates describe the concrete syntax of each node kind as a tree
//! of elements. They are data, not code: the calculator folds a
//! template against a node (and an optional pending change) into the
//! flat calculated model, and the renderer folds the same template into
//! fresh text. One frozen template exists per node kind, see
//! [`crate::csm::registry`].

use crate::ast::Property;
use crate::syntax::TokenKind;

/// Template element describing one piece of a node's concrete syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsmElement {
    /// Fixed token that always prints the same way
    ///
    /// Restricted to kinds with a canonical text; a `Whitespace` token
    /// prints one space, a `Newline` one is written as [`Newline`]
    /// instead so that indentation can follow it.
    ///
    /// [`Newline`]: CsmElement::Newline
    Token(TokenKind),

    /// Token whose kind and text derive from a scalar property value
    ///
    /// Identifiers, integer literals and modifier keywords have such a
    /// derivation; values without one fail the calculation.
    Attribute(Property),

    /// Quoted literal derived from a string property
    ///
    /// The delimiter is chosen by the node kind: text blocks print
    /// triple quotes, everything else a single double quote.
    StringLiteral(Property),

    /// Single child node from a node-valued property
    ///
    /// An absent optional child prints nothing.
    Child(Property),

    /// List property with optional separators and wrappers
    ///
    /// `preceding` and `following` print around a non-empty list;
    /// `separator_pre` prints before every element but the first and
    /// `separator_post` after every element but the last. An empty list
    /// prints nothing at all, wrappers included. The same positions
    /// apply in calculation and rendering.
    List {
        property: Property,
        separator_pre: Box<CsmElement>,
        separator_post: Box<CsmElement>,
        preceding: Box<CsmElement>,
        following: Box<CsmElement>,
    },

    /// Raise the indentation level of subsequently rendered lines
    Indent,

    /// Lower the indentation level again
    Unindent,

    /// Line break, printed with the document's line ending
    Newline,

    /// Branch on a property condition
    Conditional {
        property: Property,
        condition: Condition,
        then_element: Box<CsmElement>,
        else_element: Box<CsmElement>,
    },

    /// Contributes nothing
    None,

    /// Fixed ordered sequence of elements
    Sequence(Vec<CsmElement>),
}

impl CsmElement {
    pub fn is_none(&self) -> bool {
        matches!(self, CsmElement::None)
    }
}

/// Condition evaluated against a property value
///
/// Conditions see the value a pending change would produce, so a
/// conditional region appears and disappears in the same recalculation
/// that sets or clears its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The value is present (not an absent optional)
    IsPresent,
    /// The list value has no elements
    IsEmpty,
    /// The list value has at least one element
    IsNotEmpty,
}

/// Builder API: fixed token element
///
/// # Panics
///
/// In debug builds, panics if `kind` has no canonical text (use
/// `attribute` or `string_literal` for value-derived tokens, and
/// `newline` for line breaks).
pub fn token(kind: TokenKind) -> CsmElement {
    debug_assert!(
        kind.fixed_text().is_some(),
        "Template token must have a canonical text, got: {:?}",
        kind
    );
    debug_assert!(
        kind != TokenKind::Newline,
        "Use newline() so indentation can follow the break"
    );
    CsmElement::Token(kind)
}

/// Builder API: single space
pub fn space() -> CsmElement {
    CsmElement::Token(TokenKind::Whitespace)
}

/// Builder API: line break in the document's line ending
pub fn newline() -> CsmElement {
    CsmElement::Newline
}

/// Builder API: raise the indentation level
pub fn indent() -> CsmElement {
    CsmElement::Indent
}

/// Builder API: lower the indentation level
pub fn unindent() -> CsmElement {
    CsmElement::Unindent
}

/// Builder API: token derived from a scalar property
pub fn attribute(property: Property) -> CsmElement {
    CsmElement::Attribute(property)
}

/// Builder API: quoted literal derived from a string property
pub fn string_literal(property: Property) -> CsmElement {
    CsmElement::StringLiteral(property)
}

/// Builder API: single child node
pub fn child(property: Property) -> CsmElement {
    CsmElement::Child(property)
}

/// Builder API: list without separators or wrappers
pub fn list(property: Property) -> CsmElement {
    separated_list(property, none(), none(), none(), none())
}

/// Builder API: list with separators and wrappers
pub fn separated_list(
    property: Property,
    separator_pre: CsmElement,
    separator_post: CsmElement,
    preceding: CsmElement,
    following: CsmElement,
) -> CsmElement {
    CsmElement::List {
        property,
        separator_pre: Box::new(separator_pre),
        separator_post: Box::new(separator_post),
        preceding: Box::new(preceding),
        following: Box::new(following),
    }
}

/// Builder API: conditional region with an empty else branch
pub fn conditional(property: Property, condition: Condition, then_element: CsmElement) -> CsmElement {
    conditional_else(property, condition, then_element, none())
}

/// Builder API: conditional region with both branches
pub fn conditional_else(
    property: Property,
    condition: Condition,
    then_element: CsmElement,
    else_element: CsmElement,
) -> CsmElement {
    CsmElement::Conditional {
        property,
        condition,
        then_element: Box::new(then_element),
        else_element: Box::new(else_element),
    }
}

/// Builder API: element that contributes nothing
pub fn none() -> CsmElement {
    CsmElement::None
}

/// Builder API: ordered sequence
pub fn sequence(elements: Vec<CsmElement>) -> CsmElement {
    CsmElement::Sequence(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_creation() {
        assert_eq!(token(TokenKind::ClassKw), CsmElement::Token(TokenKind::ClassKw));
        assert_eq!(space(), CsmElement::Token(TokenKind::Whitespace));
    }

    #[test]
    #[should_panic(expected = "canonical text")]
    fn token_rejects_value_derived_kinds() {
        token(TokenKind::Ident);
    }

    #[test]
    #[should_panic(expected = "newline")]
    fn token_rejects_newline_kind() {
        token(TokenKind::Newline);
    }

    #[test]
    fn builder_api() {
        let element = sequence(vec![
            token(TokenKind::ClassKw),
            space(),
            attribute(Property::Name),
            token(TokenKind::LBrace),
            token(TokenKind::RBrace),
        ]);
        match element {
            CsmElement::Sequence(elements) => assert_eq!(elements.len(), 5),
            other => panic!("Expected Sequence, got {other:?}"),
        }
    }

    #[test]
    fn bare_list_has_no_separators() {
        match list(Property::Types) {
            CsmElement::List {
                separator_pre,
                separator_post,
                preceding,
                following,
                ..
            } => {
                assert!(separator_pre.is_none());
                assert!(separator_post.is_none());
                assert!(preceding.is_none());
                assert!(following.is_none());
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }
}
