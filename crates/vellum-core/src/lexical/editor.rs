//! The editing facade
//!
//! [`LexicalEditor`] owns a syntax tree and keeps every node's token
//! buffer consistent with its properties. Each mutation runs the full
//! recalculation pipeline: validate the change, compute the before and
//! after models, diff them, merge the script into the stored buffer,
//! and only then commit the new buffer together with the new value. An
//! error anywhere along the way leaves the document text untouched.

use std::collections::HashSet;

use tracing::debug;

use crate::ast::{NodeBuilder, NodeId, NodeKind, Property, PropertyValue, SyntaxTree};
use crate::csm::{self, ensure_node_text};
use crate::error::VellumError;
use crate::lexical::applier;
use crate::lexical::change::Change;
use crate::lexical::difference;
use crate::lexical::node_text::text_of;
use crate::result::Result;
use crate::syntax::{parse_source, ParsedSource};

/// Formatting preserving editor over one document
#[derive(Debug)]
pub struct LexicalEditor {
    tree: SyntaxTree,
    root: NodeId,
}

impl LexicalEditor {
    /// Parse `source` and take ownership of the resulting tree
    pub fn parse(source: &str) -> Result<LexicalEditor> {
        let ParsedSource { tree, root } = parse_source(source)?;
        Ok(LexicalEditor { tree, root })
    }

    /// Wrap an existing tree rooted at `root`
    ///
    /// Nodes without buffers print from their syntax templates, so a
    /// tree assembled entirely in memory works as well as a parsed one.
    pub fn from_tree(tree: SyntaxTree, root: NodeId) -> Result<LexicalEditor> {
        if !tree.contains(root) {
            return Err(VellumError::unknown_node(root));
        }
        Ok(LexicalEditor { tree, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Start a fresh node that can be woven into the document later
    pub fn build(&mut self, kind: NodeKind) -> NodeBuilder<'_> {
        self.tree.build(kind)
    }

    /// Current document text
    pub fn text(&self) -> Result<String> {
        self.text_of(self.root)
    }

    /// Current text of a single node
    pub fn text_of(&self, node: NodeId) -> Result<String> {
        if !self.tree.contains(node) {
            return Err(VellumError::unknown_node(node));
        }
        text_of(&self.tree, node)
    }

    /// Set a scalar or single-child property
    pub fn set_property(
        &mut self,
        node: NodeId,
        property: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let old = self.current(node, property)?;
        self.recalculate(
            node,
            Change::Property {
                property,
                old,
                new: value.into(),
            },
        )
    }

    /// Reset a property to an absent value
    pub fn clear_property(&mut self, node: NodeId, property: Property) -> Result<()> {
        let old = self.current(node, property)?;
        self.recalculate(
            node,
            Change::Property {
                property,
                old,
                new: PropertyValue::None,
            },
        )
    }

    /// Insert into a list property at `index`
    pub fn list_insert(
        &mut self,
        node: NodeId,
        property: Property,
        index: usize,
        element: impl Into<PropertyValue>,
    ) -> Result<()> {
        self.recalculate(
            node,
            Change::ListAdd {
                property,
                index,
                element: element.into(),
            },
        )
    }

    /// Append to the end of a list property
    pub fn list_push(
        &mut self,
        node: NodeId,
        property: Property,
        element: impl Into<PropertyValue>,
    ) -> Result<()> {
        let len = self.current(node, property)?.list_len().unwrap_or(0);
        self.list_insert(node, property, len, element)
    }

    /// Remove the element at `index` of a list property
    ///
    /// The removed node stays in the arena with its buffer intact, so
    /// reinserting it elsewhere brings its formatting back along.
    pub fn list_remove(&mut self, node: NodeId, property: Property, index: usize) -> Result<()> {
        self.recalculate(node, Change::ListRemove { property, index })
    }

    /// Replace the element at `index` of a list property
    pub fn list_replace(
        &mut self,
        node: NodeId,
        property: Property,
        index: usize,
        element: impl Into<PropertyValue>,
    ) -> Result<()> {
        self.recalculate(
            node,
            Change::ListReplace {
                property,
                index,
                element: element.into(),
            },
        )
    }

    fn current(&self, node: NodeId, property: Property) -> Result<PropertyValue> {
        if !self.tree.contains(node) {
            return Err(VellumError::unknown_node(node));
        }
        Ok(self
            .tree
            .value(node, property)
            .cloned()
            .unwrap_or(PropertyValue::None))
    }

    /// Run one change through the recalculation pipeline
    ///
    /// The committed value is derived up front so that bounds and shape
    /// problems surface before any model work happens. The buffer swap
    /// and the value write are the last two steps; everything before
    /// them is free of side effects on this node.
    fn recalculate(&mut self, node: NodeId, change: Change) -> Result<()> {
        let kind = self
            .tree
            .kind(node)
            .ok_or_else(|| VellumError::unknown_node(node))?;
        let Some(property) = change.property() else {
            return Ok(());
        };
        let current = self
            .tree
            .value(node, property)
            .cloned()
            .unwrap_or(PropertyValue::None);
        let committed = change.effective_value(kind, property, &current)?;
        self.validate_attachments(node, &change, &current)?;

        ensure_node_text(&mut self.tree, node)?;
        let before = csm::calculate(&self.tree, node)?;
        let after = csm::calculate_with_change(&self.tree, node, &change)?;
        let script = difference::calculate(&before, &after);
        let merged = applier::apply(&mut self.tree, node, &script)?;

        self.tree.set_node_text(node, merged);
        self.tree.set_value_raw(node, property, committed);
        debug!(node = ?node, property = %property, steps = script.len(), "recalculated node text");
        Ok(())
    }

    /// Reject attachments whose buffers could never serialize
    ///
    /// A node woven into its own subtree would expand without end, and
    /// a node attached in two places would print twice. Occupants the
    /// change itself displaces do not count as attached, so removing a
    /// node and reinserting it stays legal.
    fn validate_attachments(
        &self,
        node: NodeId,
        change: &Change,
        current: &PropertyValue,
    ) -> Result<()> {
        let candidates = match change {
            Change::Property { new, .. } => attached_ids(new),
            Change::ListAdd { element, .. } | Change::ListReplace { element, .. } => {
                attached_ids(element)
            }
            Change::None | Change::ListRemove { .. } => Vec::new(),
        };
        if candidates.is_empty() {
            return Ok(());
        }
        let displaced = match change {
            Change::Property { .. } => attached_ids(current),
            Change::ListReplace { index, .. } => match current.as_nodes() {
                Some(nodes) => nodes.get(*index).copied().into_iter().collect(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        for (i, &candidate) in candidates.iter().enumerate() {
            if !self.tree.contains(candidate) {
                return Err(VellumError::unknown_node(candidate));
            }
            if self.subtree_contains(candidate, node) {
                return Err(VellumError::invalid_attachment(
                    candidate,
                    node,
                    "it would contain itself",
                ));
            }
            let attached = self.parent_of(candidate).is_some() && !displaced.contains(&candidate);
            if attached || candidates[..i].contains(&candidate) {
                return Err(VellumError::invalid_attachment(
                    candidate,
                    node,
                    "it is already attached",
                ));
            }
        }
        Ok(())
    }

    /// Whether `goal` sits inside the subtree rooted at `from`
    fn subtree_contains(&self, from: NodeId, goal: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(next) = stack.pop() {
            if next == goal {
                return true;
            }
            if !seen.insert(next) {
                continue;
            }
            let Some(ast_node) = self.tree.get(next) else {
                continue;
            };
            for (_, value) in ast_node.properties() {
                match value {
                    PropertyValue::Node(child) => stack.push(*child),
                    PropertyValue::Nodes(children) => stack.extend_from_slice(children),
                    _ => {}
                }
            }
        }
        false
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.tree.node_ids().find(|&parent| {
            self.tree.get(parent).is_some_and(|ast_node| {
                ast_node
                    .properties()
                    .iter()
                    .any(|(_, value)| refers_to(value, id))
            })
        })
    }
}

fn attached_ids(value: &PropertyValue) -> Vec<NodeId> {
    match value {
        PropertyValue::Node(id) => vec![*id],
        PropertyValue::Nodes(ids) => ids.clone(),
        _ => Vec::new(),
    }
}

fn refers_to(value: &PropertyValue, id: NodeId) -> bool {
    match value {
        PropertyValue::Node(child) => *child == id,
        PropertyValue::Nodes(children) => children.contains(&id),
        _ => false,
    }
}
