//! Difference application
//!
//! Merges an edit script against the stored token buffer of a node.
//! Kept steps copy buffer atoms so the original spelling of whitespace
//! survives, removals excise atoms without touching neighbouring
//! comments, and additions are synthesized from the calculated model.
//! The result is a fresh buffer; committing it is the caller's job.

use tracing::trace;

use crate::ast::{NodeId, SyntaxTree};
use crate::csm::{ensure_node_text, CalculatedElement};
use crate::error::VellumError;
use crate::lexical::difference::DifferenceElement;
use crate::lexical::node_text::{LineEnding, NodeText, TextAtom};
use crate::result::Result;
use crate::syntax::TokenKind;

/// Merge `script` into the buffer of `node`, producing its next buffer
///
/// The tree is only touched to render buffers for children that appear
/// as additions. Nothing is committed here, so a failed merge leaves
/// the document exactly as it was.
pub fn apply(
    tree: &mut SyntaxTree,
    node: NodeId,
    script: &[DifferenceElement],
) -> Result<NodeText> {
    // Children joining the buffer need text of their own first
    for step in script {
        if let DifferenceElement::Added(CalculatedElement::Child(child)) = step {
            ensure_node_text(tree, *child)?;
        }
    }

    let old = tree
        .node_text(node)
        .ok_or_else(|| {
            VellumError::internal_error(format!("node {node:?} has no token buffer to merge into"))
        })?
        .atoms()
        .to_vec();

    let mut merge = Merge {
        old: &old,
        pos: 0,
        out: Vec::with_capacity(old.len()),
        pending: Vec::new(),
        splice: false,
        line_ending: tree.line_ending(),
    };
    for step in script {
        match step {
            DifferenceElement::Kept(element) => merge.keep(element)?,
            DifferenceElement::Removed(element) => merge.remove(element)?,
            DifferenceElement::Added(element) => merge.add(element),
        }
    }
    let atoms = merge.finish();
    trace!(node = ?node, steps = script.len(), atoms = atoms.len(), "merged difference script");
    Ok(NodeText::new(atoms))
}

/// Walks the old buffer and the script in lockstep
///
/// `pending` holds additions waiting for an anchor: with no preceding
/// removal an addition lands inside the trivia run of the next kept
/// atom, after its comments but before its line-leading indentation.
/// `splice` is set while removals are being processed so that
/// replacements slot into the vacated position instead.
struct Merge<'a> {
    old: &'a [TextAtom],
    pos: usize,
    out: Vec<TextAtom>,
    pending: Vec<TextAtom>,
    splice: bool,
    line_ending: LineEnding,
}

impl Merge<'_> {
    fn keep(&mut self, element: &CalculatedElement) -> Result<()> {
        self.splice = false;
        if element.is_whitespace() {
            self.flush_pending();
            self.copy_comments();
            if self.at_whitespace() {
                self.copy_current();
            }
            // A separator the source never wrote stays unwritten
            return Ok(());
        }
        self.copy_trivia_run();
        if self.current_matches(element) {
            self.copy_current();
            Ok(())
        } else {
            Err(self.desync(element))
        }
    }

    fn remove(&mut self, element: &CalculatedElement) -> Result<()> {
        self.splice = true;
        if element.is_whitespace() {
            self.copy_comments();
            if self.at_whitespace() {
                self.pos += 1;
            }
            return Ok(());
        }
        // Comments inside the excised region are kept, whitespace goes
        loop {
            match self.old.get(self.pos) {
                Some(atom) if atom.is_comment() => self.copy_current(),
                Some(atom) if atom.is_whitespace() => self.pos += 1,
                _ => break,
            }
        }
        if self.current_matches(element) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.desync(element))
        }
    }

    fn add(&mut self, element: &CalculatedElement) {
        let atom = self.synthesize(element);
        if self.splice {
            self.out.push(atom);
        } else {
            self.pending.push(atom);
        }
    }

    fn finish(mut self) -> Vec<TextAtom> {
        self.flush_pending();
        self.out.extend_from_slice(&self.old[self.pos..]);
        self.out
    }

    fn synthesize(&self, element: &CalculatedElement) -> TextAtom {
        match element {
            CalculatedElement::Token {
                kind: TokenKind::Newline,
                ..
            } => TextAtom::token(TokenKind::Newline, self.line_ending.as_str()),
            CalculatedElement::Token { kind, text } => TextAtom::token(*kind, text.clone()),
            CalculatedElement::Child(id) => TextAtom::child(*id),
        }
    }

    fn current_matches(&self, element: &CalculatedElement) -> bool {
        match (element, self.old.get(self.pos)) {
            (CalculatedElement::Child(id), Some(TextAtom::Child(found))) => id == found,
            (
                CalculatedElement::Token { kind, text },
                Some(TextAtom::Token {
                    kind: found,
                    text: found_text,
                }),
            ) => {
                if kind.is_whitespace() && found.is_whitespace() {
                    // Any spelling of whitespace satisfies a model separator
                    true
                } else if *kind == TokenKind::IntLiteral && *found == TokenKind::IntLiteral {
                    // Leading zeros spell the same literal; on a keep the
                    // buffer's spelling wins
                    same_int_literal(text, found_text)
                } else {
                    kind == found && text == found_text
                }
            }
            _ => false,
        }
    }

    fn at_whitespace(&self) -> bool {
        self.old.get(self.pos).is_some_and(TextAtom::is_whitespace)
    }

    fn copy_current(&mut self) {
        if let Some(atom) = self.old.get(self.pos) {
            self.out.push(atom.clone());
            self.pos += 1;
        }
    }

    fn copy_comments(&mut self) {
        while self.old.get(self.pos).is_some_and(TextAtom::is_comment) {
            self.copy_current();
        }
    }

    /// Copy the trivia run ahead of a kept atom, then land any pending
    /// additions
    ///
    /// Comments and the line breaks that close them stay ahead of the
    /// additions; line-leading indentation flushes first, so it keeps
    /// belonging to the atom it indents.
    fn copy_trivia_run(&mut self) {
        while let Some(atom) = self.old.get(self.pos) {
            if !atom.is_trivia() {
                break;
            }
            if !self.pending.is_empty() && self.at_line_start() && is_indent(atom) {
                self.flush_pending();
            }
            self.copy_current();
        }
        self.flush_pending();
    }

    /// The next copied atom would start a fresh line
    fn at_line_start(&self) -> bool {
        match self.out.last() {
            Some(TextAtom::Token { kind, .. }) => *kind == TokenKind::Newline,
            Some(TextAtom::Child(_)) => false,
            None => true,
        }
    }

    fn flush_pending(&mut self) {
        self.out.append(&mut self.pending);
    }

    fn desync(&self, element: &CalculatedElement) -> VellumError {
        let found = match self.old.get(self.pos) {
            Some(TextAtom::Token { kind, text }) => format!("{} `{text}`", kind.describe()),
            Some(TextAtom::Child(id)) => format!("child node {id:?}"),
            None => "end of buffer".to_string(),
        };
        VellumError::internal_error(format!(
            "difference application out of sync with token buffer: expected {}, found {found}",
            describe_element(element),
        ))
    }
}

fn is_indent(atom: &TextAtom) -> bool {
    matches!(
        atom,
        TextAtom::Token {
            kind: TokenKind::Whitespace,
            ..
        }
    )
}

fn same_int_literal(a: &str, b: &str) -> bool {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(left), Ok(right)) => left == right,
        _ => a == b,
    }
}

fn describe_element(element: &CalculatedElement) -> String {
    match element {
        CalculatedElement::Token { kind, text } => format!("{} `{text}`", kind.describe()),
        CalculatedElement::Child(id) => format!("child node {id:?}"),
    }
}
