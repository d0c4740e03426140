//! Frozen template registry
//!
//! One template per node kind, built once on first use and shared by
//! all readers. Templates never change at runtime; recalculation for
//! different trees may read the registry concurrently.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{NodeKind, Property};
use crate::csm::element::{self, Condition, CsmElement};
use crate::syntax::TokenKind;

static REGISTRY: LazyLock<HashMap<NodeKind, CsmElement>> = LazyLock::new(build_registry);

/// Template describing the concrete syntax of `kind`
pub fn template_for(kind: NodeKind) -> &'static CsmElement {
    REGISTRY
        .get(&kind)
        .expect("template registry covers every node kind")
}

fn build_registry() -> HashMap<NodeKind, CsmElement> {
    let mut templates = HashMap::new();
    templates.insert(NodeKind::CompilationUnit, compilation_unit());
    templates.insert(NodeKind::ClassDecl, class_decl());
    templates.insert(NodeKind::FieldDecl, field_decl());
    templates.insert(NodeKind::TypeRef, element::attribute(Property::Name));
    templates.insert(NodeKind::NameExpr, element::attribute(Property::Name));
    templates.insert(NodeKind::IntLit, element::attribute(Property::Value));
    templates.insert(NodeKind::StringLit, element::string_literal(Property::Value));
    templates.insert(NodeKind::TextBlock, element::string_literal(Property::Value));
    templates
}

fn compilation_unit() -> CsmElement {
    element::separated_list(
        Property::Types,
        element::none(),
        element::newline(),
        element::none(),
        element::none(),
    )
}

fn class_decl() -> CsmElement {
    element::sequence(vec![
        modifiers(),
        element::token(TokenKind::ClassKw),
        element::space(),
        element::attribute(Property::Name),
        element::separated_list(
            Property::ExtendedTypes,
            element::none(),
            element::sequence(vec![element::token(TokenKind::Comma), element::space()]),
            element::sequence(vec![
                element::space(),
                element::token(TokenKind::ExtendsKw),
                element::space(),
            ]),
            element::none(),
        ),
        element::token(TokenKind::LBrace),
        element::separated_list(
            Property::Members,
            element::none(),
            element::newline(),
            element::sequence(vec![element::indent(), element::newline()]),
            element::sequence(vec![element::unindent(), element::newline()]),
        ),
        element::token(TokenKind::RBrace),
    ])
}

fn field_decl() -> CsmElement {
    element::sequence(vec![
        modifiers(),
        element::child(Property::FieldType),
        element::space(),
        element::attribute(Property::Name),
        element::conditional(
            Property::Initializer,
            Condition::IsPresent,
            element::sequence(vec![
                element::space(),
                element::token(TokenKind::Eq),
                element::space(),
                element::child(Property::Initializer),
            ]),
        ),
        element::token(TokenKind::Semicolon),
    ])
}

/// Modifier keywords separated by spaces, with a trailing space when
/// any are present
fn modifiers() -> CsmElement {
    element::separated_list(
        Property::Modifiers,
        element::none(),
        element::space(),
        element::none(),
        element::space(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_template() {
        for kind in NodeKind::ALL {
            let _ = template_for(kind);
        }
    }

    #[test]
    fn expressions_are_single_attributes() {
        assert_eq!(
            template_for(NodeKind::TypeRef),
            &element::attribute(Property::Name)
        );
        assert_eq!(
            template_for(NodeKind::IntLit),
            &element::attribute(Property::Value)
        );
    }

    #[test]
    fn class_template_opens_with_modifiers() {
        match template_for(NodeKind::ClassDecl) {
            CsmElement::Sequence(elements) => {
                assert!(matches!(
                    elements[0],
                    CsmElement::List { property: Property::Modifiers, .. }
                ));
                assert!(matches!(
                    elements.last(),
                    Some(CsmElement::Token(TokenKind::RBrace))
                ));
            }
            other => panic!("Expected Sequence, got {other:?}"),
        }
    }
}
