//! Arena-backed syntax tree
//!
//! Nodes live in a flat arena and refer to each other through [`NodeId`]
//! handles. Handles stay valid for the lifetime of the tree: removing a
//! node from a property detaches it but never frees its slot, so child
//! references inside stored token buffers cannot dangle. A detached node
//! keeps its buffer and can be re-inserted elsewhere with its original
//! formatting intact.

use crate::ast::{Modifier, NodeKind, Property, PropertyValue};
use crate::lexical::{LineEnding, NodeText};

/// Handle to a node in a [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node in the arena
#[derive(Debug, Clone)]
pub struct AstNode {
    kind: NodeKind,
    properties: Vec<(Property, PropertyValue)>,
    text: Option<NodeText>,
}

impl AstNode {
    fn new(kind: NodeKind) -> AstNode {
        AstNode {
            kind,
            properties: Vec::new(),
            text: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Value of a property, if the node carries it
    pub fn value(&self, property: Property) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    /// All properties in insertion order
    pub fn properties(&self) -> &[(Property, PropertyValue)] {
        &self.properties
    }

    /// Stored token buffer, if this node has lexical memory
    pub fn text(&self) -> Option<&NodeText> {
        self.text.as_ref()
    }

    fn set_value(&mut self, property: Property, value: PropertyValue) {
        match self.properties.iter_mut().find(|(p, _)| *p == property) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((property, value)),
        }
    }
}

/// Arena of nodes plus document-level state
///
/// The tree records the line ending convention of the document it was
/// parsed from; newly synthesized line breaks follow that convention.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<AstNode>,
    root: Option<NodeId>,
    line_ending: LineEnding,
}

impl SyntaxTree {
    pub fn new() -> SyntaxTree {
        SyntaxTree::default()
    }

    /// Root node of the document, once one has been designated
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a bare node with no properties
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(AstNode::new(kind));
        id
    }

    /// Allocate a node and initialize its properties fluently
    pub fn build(&mut self, kind: NodeKind) -> NodeBuilder<'_> {
        let id = self.new_node(kind);
        NodeBuilder { tree: self, id }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    // Ids are only minted by this arena and slots are never freed, so
    // internal lookups index directly.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }

    /// All node ids this arena has issued, in allocation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(AstNode::kind)
    }

    pub fn value(&self, id: NodeId, property: Property) -> Option<&PropertyValue> {
        self.get(id).and_then(|node| node.value(property))
    }

    /// Single child stored under a node-valued property
    pub fn child(&self, id: NodeId, property: Property) -> Option<NodeId> {
        self.value(id, property).and_then(PropertyValue::as_node)
    }

    /// Children stored under a node-list property, empty for anything else
    pub fn children(&self, id: NodeId, property: Property) -> &[NodeId] {
        match self.value(id, property) {
            Some(PropertyValue::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    /// Modifiers stored under a modifier-list property, empty for anything else
    pub fn modifiers(&self, id: NodeId, property: Property) -> &[Modifier] {
        match self.value(id, property) {
            Some(PropertyValue::Modifiers(modifiers)) => modifiers,
            _ => &[],
        }
    }

    /// Stored token buffer of a node, if it has one
    pub fn node_text(&self, id: NodeId) -> Option<&NodeText> {
        self.get(id).and_then(AstNode::text)
    }

    pub fn has_node_text(&self, id: NodeId) -> bool {
        self.node_text(id).is_some()
    }

    pub(crate) fn set_node_text(&mut self, id: NodeId, text: NodeText) {
        self.node_mut(id).text = Some(text);
    }

    pub(crate) fn set_value_raw(&mut self, id: NodeId, property: Property, value: PropertyValue) {
        self.node_mut(id).set_value(property, value);
    }
}

/// Builder for initializing a node's properties before it is attached
///
/// Attached nodes must only be mutated through the lexical editor; the
/// builder covers the construction phase, where no buffer exists yet and
/// nothing has to be preserved.
pub struct NodeBuilder<'a> {
    tree: &'a mut SyntaxTree,
    id: NodeId,
}

impl NodeBuilder<'_> {
    pub fn property(self, property: Property, value: impl Into<PropertyValue>) -> Self {
        let value = value.into();
        self.tree.node_mut(self.id).set_value(property, value);
        self
    }

    pub fn finish(self) -> NodeId {
        self.id
    }
}
