//! Recursive descent parser that seeds lexical memory
//!
//! Parsing produces the tree and every node's token buffer in one pass.
//! Each node records the token range it covers; buffers are built by
//! walking that range and substituting child ranges with child atoms.
//! Trivia between a node's own tokens belongs to that node, trivia
//! around a child belongs to the parent.

use std::collections::HashMap;
use std::ops::Range;

use biome_text_size::TextRange;
use tracing::debug;

use crate::ast::{Modifier, NodeId, NodeKind, Property, PropertyValue, SyntaxTree};
use crate::error::VellumError;
use crate::lexical::{LineEnding, NodeText, TextAtom};
use crate::result::Result;
use crate::syntax::lexer::lex_with_trivia;
use crate::syntax::token::{Token, TokenKind};

/// Result of parsing a source document
#[derive(Debug)]
pub struct ParsedSource {
    pub tree: SyntaxTree,
    pub root: NodeId,
}

/// Parse a complete source document
///
/// On success every node in the returned tree carries a token buffer
/// whose recursive expansion reproduces `source` byte for byte. The
/// tree also records the document's line ending convention.
pub fn parse_source(source: &str) -> Result<ParsedSource> {
    let (tokens, errors) = lex_with_trivia(source);
    if let Some(error) = errors.into_iter().next() {
        return Err(VellumError::parse_error(error.message, error.span));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        tree: SyntaxTree::new(),
        spans: Vec::new(),
    };
    let root = parser.parse_compilation_unit()?;
    let Parser { mut tree, spans, .. } = parser;

    seed_node_texts(&mut tree, &tokens, &spans);
    tree.set_line_ending(detect_line_ending(&tokens));
    tree.set_root(root);

    debug!(nodes = tree.len(), "parsed source document");
    Ok(ParsedSource { tree, root })
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    tree: SyntaxTree,
    /// Token index range covered by each node, children included
    spans: Vec<(NodeId, Range<usize>)>,
}

impl<'t> Parser<'t> {
    fn skip_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.pos += 1;
        }
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump_significant(&mut self) -> Option<&'t Token> {
        self.skip_trivia();
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'t Token> {
        match self.bump_significant() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(VellumError::parse_error(
                format!(
                    "Expected {}, found {}",
                    kind.describe(),
                    token.kind.describe()
                ),
                token.span,
            )),
            None => Err(VellumError::parse_error(
                format!("Expected {}, found end of input", kind.describe()),
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> TextRange {
        let end = self
            .tokens
            .last()
            .map(|t| t.span.end())
            .unwrap_or_default();
        TextRange::new(end, end)
    }

    fn parse_compilation_unit(&mut self) -> Result<NodeId> {
        let mut types = Vec::new();
        while self.peek_kind().is_some() {
            types.push(self.parse_class()?);
        }
        // The root covers the whole stream, trailing trivia included
        self.pos = self.tokens.len();
        let id = self
            .tree
            .build(NodeKind::CompilationUnit)
            .property(Property::Types, PropertyValue::Nodes(types))
            .finish();
        self.spans.push((id, 0..self.tokens.len()));
        Ok(id)
    }

    fn parse_class(&mut self) -> Result<NodeId> {
        self.skip_trivia();
        let start = self.pos;

        let modifiers = self.parse_modifiers();
        self.expect(TokenKind::ClassKw)?;
        let name = self.expect(TokenKind::Ident)?.text.clone();

        let mut extended = Vec::new();
        if self.at(TokenKind::ExtendsKw) {
            self.bump_significant();
            loop {
                extended.push(self.parse_type_ref()?);
                if self.at(TokenKind::Comma) {
                    self.bump_significant();
                } else {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && self.peek_kind().is_some() {
            members.push(self.parse_member()?);
        }
        self.expect(TokenKind::RBrace)?;
        let end = self.pos;

        let id = self
            .tree
            .build(NodeKind::ClassDecl)
            .property(Property::Modifiers, PropertyValue::Modifiers(modifiers))
            .property(Property::Name, PropertyValue::Ident(name))
            .property(Property::ExtendedTypes, PropertyValue::Nodes(extended))
            .property(Property::Members, PropertyValue::Nodes(members))
            .finish();
        self.spans.push((id, start..end));
        Ok(id)
    }

    fn parse_member(&mut self) -> Result<NodeId> {
        if self.next_is_class() {
            self.parse_class()
        } else {
            self.parse_field()
        }
    }

    /// Look past modifiers to decide between a nested class and a field
    fn next_is_class(&self) -> bool {
        for token in self.tokens[self.pos..].iter().filter(|t| !t.kind.is_trivia()) {
            if Modifier::from_token_kind(token.kind).is_some() {
                continue;
            }
            return token.kind == TokenKind::ClassKw;
        }
        false
    }

    fn parse_field(&mut self) -> Result<NodeId> {
        self.skip_trivia();
        let start = self.pos;

        let modifiers = self.parse_modifiers();
        let field_type = self.parse_type_ref()?;
        let name = self.expect(TokenKind::Ident)?.text.clone();
        let initializer = if self.at(TokenKind::Eq) {
            self.bump_significant();
            PropertyValue::Node(self.parse_initializer()?)
        } else {
            PropertyValue::None
        };
        self.expect(TokenKind::Semicolon)?;
        let end = self.pos;

        let id = self
            .tree
            .build(NodeKind::FieldDecl)
            .property(Property::Modifiers, PropertyValue::Modifiers(modifiers))
            .property(Property::FieldType, field_type)
            .property(Property::Name, PropertyValue::Ident(name))
            .property(Property::Initializer, initializer)
            .finish();
        self.spans.push((id, start..end));
        Ok(id)
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while let Some(modifier) = self.peek_kind().and_then(Modifier::from_token_kind) {
            self.bump_significant();
            modifiers.push(modifier);
        }
        modifiers
    }

    fn parse_type_ref(&mut self) -> Result<NodeId> {
        self.skip_trivia();
        let start = self.pos;
        let name = self.expect(TokenKind::Ident)?.text.clone();
        let end = self.pos;

        let id = self
            .tree
            .build(NodeKind::TypeRef)
            .property(Property::Name, PropertyValue::Ident(name))
            .finish();
        self.spans.push((id, start..end));
        Ok(id)
    }

    fn parse_initializer(&mut self) -> Result<NodeId> {
        self.skip_trivia();
        let start = self.pos;
        let Some(token) = self.bump_significant() else {
            return Err(VellumError::parse_error(
                "Expected initializer expression, found end of input",
                self.eof_span(),
            ));
        };
        let end = self.pos;

        let id = match token.kind {
            TokenKind::IntLiteral => {
                let value: i64 = token.text.parse().map_err(|_| {
                    VellumError::parse_error("Integer literal out of range", token.span)
                })?;
                self.tree
                    .build(NodeKind::IntLit)
                    .property(Property::Value, PropertyValue::Int(value))
                    .finish()
            }
            TokenKind::StringLiteral => self
                .tree
                .build(NodeKind::StringLit)
                .property(Property::Value, PropertyValue::Str(unquote(&token.text, 1)))
                .finish(),
            TokenKind::TextBlockLiteral => self
                .tree
                .build(NodeKind::TextBlock)
                .property(Property::Value, PropertyValue::Str(unquote(&token.text, 3)))
                .finish(),
            TokenKind::Ident => self
                .tree
                .build(NodeKind::NameExpr)
                .property(Property::Name, PropertyValue::Ident(token.text.clone()))
                .finish(),
            other => {
                return Err(VellumError::parse_error(
                    format!(
                        "Expected initializer expression, found {}",
                        other.describe()
                    ),
                    token.span,
                ));
            }
        };
        self.spans.push((id, start..end));
        Ok(id)
    }
}

/// Strip `width` delimiter characters from each end of a literal
fn unquote(text: &str, width: usize) -> String {
    let inner_start = width.min(text.len());
    let inner_end = text.len().saturating_sub(width).max(inner_start);
    text[inner_start..inner_end].to_string()
}

/// Build every node's token buffer from the recorded token ranges
fn seed_node_texts(tree: &mut SyntaxTree, tokens: &[Token], spans: &[(NodeId, Range<usize>)]) {
    let index: HashMap<NodeId, Range<usize>> = spans
        .iter()
        .map(|(id, range)| (*id, range.clone()))
        .collect();

    for (id, range) in spans {
        let mut child_ranges: Vec<(Range<usize>, NodeId)> = child_nodes(tree, *id)
            .into_iter()
            .filter_map(|child| index.get(&child).map(|r| (r.clone(), child)))
            .collect();
        child_ranges.sort_by_key(|(r, _)| r.start);

        let mut atoms = Vec::new();
        let mut next_child = 0usize;
        let mut i = range.start;
        while i < range.end {
            match child_ranges.get(next_child) {
                Some((child_range, child)) if child_range.start == i => {
                    atoms.push(TextAtom::child(*child));
                    i = child_range.end;
                    next_child += 1;
                }
                _ => {
                    let token = &tokens[i];
                    atoms.push(TextAtom::token(token.kind, token.text.clone()));
                    i += 1;
                }
            }
        }
        tree.set_node_text(*id, NodeText::new(atoms));
    }
}

fn child_nodes(tree: &SyntaxTree, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    if let Some(node) = tree.get(id) {
        for (_, value) in node.properties() {
            match value {
                PropertyValue::Node(child) => out.push(*child),
                PropertyValue::Nodes(children) => out.extend_from_slice(children),
                _ => {}
            }
        }
    }
    out
}

fn detect_line_ending(tokens: &[Token]) -> LineEnding {
    tokens
        .iter()
        .find(|t| t.kind == TokenKind::Newline)
        .map(|t| LineEnding::of(&t.text))
        .unwrap_or_default()
}
