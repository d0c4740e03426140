//! Change descriptions threaded through model calculation
//!
//! A change is an intent, not an effect. The calculator consumes it to
//! produce the post-change model of a node while the tree still holds
//! the pre-change state; only after the merge succeeds does the editor
//! commit the same change to the tree. One change always targets one
//! property of one node.

use crate::ast::{NodeKind, Property, PropertyValue};
use crate::error::VellumError;
use crate::result::Result;

/// A pending mutation of a single node property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Identity change: calculate the current state
    None,
    /// Replace the value of a scalar or single-child property
    Property {
        property: Property,
        old: PropertyValue,
        new: PropertyValue,
    },
    /// Insert an element into a list property
    ListAdd {
        property: Property,
        index: usize,
        element: PropertyValue,
    },
    /// Remove the element at `index` of a list property
    ListRemove { property: Property, index: usize },
    /// Replace the element at `index` of a list property
    ListReplace {
        property: Property,
        index: usize,
        element: PropertyValue,
    },
}

impl Change {
    /// Property this change affects, if any
    pub fn property(&self) -> Option<Property> {
        match self {
            Change::None => None,
            Change::Property { property, .. }
            | Change::ListAdd { property, .. }
            | Change::ListRemove { property, .. }
            | Change::ListReplace { property, .. } => Some(*property),
        }
    }

    pub fn targets(&self, property: Property) -> bool {
        self.property() == Some(property)
    }

    /// Value of `property` as this change would leave it
    ///
    /// Untouched properties keep their current value. List changes are
    /// simulated on a copy; the tree itself is never mutated here, which
    /// is what lets the calculator see the future while the applier
    /// still reads the past.
    pub fn effective_value(
        &self,
        node: NodeKind,
        property: Property,
        current: &PropertyValue,
    ) -> Result<PropertyValue> {
        if !self.targets(property) {
            return Ok(current.clone());
        }
        match self {
            Change::None => Ok(current.clone()),
            Change::Property { new, .. } => Ok(new.clone()),
            Change::ListAdd { index, element, .. } => {
                simulate_add(node, property, current, *index, element)
            }
            Change::ListRemove { index, .. } => simulate_remove(node, property, current, *index),
            Change::ListReplace { index, element, .. } => {
                simulate_replace(node, property, current, *index, element)
            }
        }
    }
}

fn list_error(
    node: NodeKind,
    property: Property,
    current: &PropertyValue,
) -> VellumError {
    VellumError::model_mismatch(node, property, "list value", current.shape())
}

fn simulate_add(
    node: NodeKind,
    property: Property,
    current: &PropertyValue,
    index: usize,
    element: &PropertyValue,
) -> Result<PropertyValue> {
    let len = current
        .list_len()
        .ok_or_else(|| list_error(node, property, current))?;
    if index > len {
        return Err(VellumError::index_out_of_range(property, index, len));
    }
    match (current, element) {
        (PropertyValue::Nodes(nodes), PropertyValue::Node(id)) => {
            let mut next = nodes.clone();
            next.insert(index, *id);
            Ok(PropertyValue::Nodes(next))
        }
        (PropertyValue::Modifiers(modifiers), PropertyValue::Modifier(m)) => {
            let mut next = modifiers.clone();
            next.insert(index, *m);
            Ok(PropertyValue::Modifiers(next))
        }
        // An absent optional list grows into whichever flavor the element has
        (PropertyValue::None, PropertyValue::Node(id)) => Ok(PropertyValue::Nodes(vec![*id])),
        (PropertyValue::None, PropertyValue::Modifier(m)) => {
            Ok(PropertyValue::Modifiers(vec![*m]))
        }
        _ => Err(VellumError::model_mismatch(
            node,
            property,
            "matching list element",
            element.shape(),
        )),
    }
}

fn simulate_remove(
    node: NodeKind,
    property: Property,
    current: &PropertyValue,
    index: usize,
) -> Result<PropertyValue> {
    let len = current
        .list_len()
        .ok_or_else(|| list_error(node, property, current))?;
    if index >= len {
        return Err(VellumError::index_out_of_range(property, index, len));
    }
    match current {
        PropertyValue::Nodes(nodes) => {
            let mut next = nodes.clone();
            next.remove(index);
            Ok(PropertyValue::Nodes(next))
        }
        PropertyValue::Modifiers(modifiers) => {
            let mut next = modifiers.clone();
            next.remove(index);
            Ok(PropertyValue::Modifiers(next))
        }
        _ => Err(list_error(node, property, current)),
    }
}

fn simulate_replace(
    node: NodeKind,
    property: Property,
    current: &PropertyValue,
    index: usize,
    element: &PropertyValue,
) -> Result<PropertyValue> {
    let len = current
        .list_len()
        .ok_or_else(|| list_error(node, property, current))?;
    if index >= len {
        return Err(VellumError::index_out_of_range(property, index, len));
    }
    match (current, element) {
        (PropertyValue::Nodes(nodes), PropertyValue::Node(id)) => {
            let mut next = nodes.clone();
            next[index] = *id;
            Ok(PropertyValue::Nodes(next))
        }
        (PropertyValue::Modifiers(modifiers), PropertyValue::Modifier(m)) => {
            let mut next = modifiers.clone();
            next[index] = *m;
            Ok(PropertyValue::Modifiers(next))
        }
        _ => Err(VellumError::model_mismatch(
            node,
            property,
            "matching list element",
            element.shape(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Modifier, NodeId, SyntaxTree};

    fn node_ids(tree: &mut SyntaxTree, count: usize) -> Vec<NodeId> {
        (0..count).map(|_| tree.new_node(NodeKind::TypeRef)).collect()
    }

    #[test]
    fn untouched_properties_keep_their_value() {
        let change = Change::Property {
            property: Property::Name,
            old: PropertyValue::ident("A"),
            new: PropertyValue::ident("B"),
        };
        let current = PropertyValue::Int(3);
        assert_eq!(
            change
                .effective_value(NodeKind::ClassDecl, Property::Value, &current)
                .unwrap(),
            current
        );
    }

    #[test]
    fn list_add_simulates_without_mutating() {
        let mut tree = SyntaxTree::new();
        let ids = node_ids(&mut tree, 3);
        let current = PropertyValue::Nodes(vec![ids[0], ids[1]]);
        let change = Change::ListAdd {
            property: Property::Members,
            index: 1,
            element: PropertyValue::Node(ids[2]),
        };
        let next = change
            .effective_value(NodeKind::ClassDecl, Property::Members, &current)
            .unwrap();
        assert_eq!(next, PropertyValue::Nodes(vec![ids[0], ids[2], ids[1]]));
        assert_eq!(current, PropertyValue::Nodes(vec![ids[0], ids[1]]));
    }

    #[test]
    fn list_add_to_absent_list() {
        let change = Change::ListAdd {
            property: Property::Modifiers,
            index: 0,
            element: PropertyValue::Modifier(Modifier::Public),
        };
        let next = change
            .effective_value(NodeKind::ClassDecl, Property::Modifiers, &PropertyValue::None)
            .unwrap();
        assert_eq!(next, PropertyValue::Modifiers(vec![Modifier::Public]));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let change = Change::ListRemove {
            property: Property::Members,
            index: 2,
        };
        let err = change
            .effective_value(
                NodeKind::ClassDecl,
                Property::Members,
                &PropertyValue::Nodes(vec![]),
            )
            .unwrap_err();
        assert!(matches!(err, VellumError::IndexOutOfRange { index: 2, len: 0, .. }));
    }

    #[test]
    fn scalar_value_under_list_change_is_a_mismatch() {
        let change = Change::ListAdd {
            property: Property::Members,
            index: 0,
            element: PropertyValue::Modifier(Modifier::Final),
        };
        let err = change
            .effective_value(
                NodeKind::ClassDecl,
                Property::Members,
                &PropertyValue::Ident("x".into()),
            )
            .unwrap_err();
        assert!(matches!(err, VellumError::ModelMismatch { .. }));
    }

    #[test]
    fn replace_swaps_one_element() {
        let mut tree = SyntaxTree::new();
        let ids = node_ids(&mut tree, 3);
        let change = Change::ListReplace {
            property: Property::ExtendedTypes,
            index: 0,
            element: PropertyValue::Node(ids[2]),
        };
        let next = change
            .effective_value(
                NodeKind::ClassDecl,
                Property::ExtendedTypes,
                &PropertyValue::Nodes(vec![ids[0], ids[1]]),
            )
            .unwrap();
        assert_eq!(next, PropertyValue::Nodes(vec![ids[2], ids[1]]));
    }
}
