// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Concrete syntax tree nodes.
//!
//! A [`SyntaxNode`] owns an ordered list of [`SyntaxElement`]s: child nodes
//! interleaved with the leaf tokens (trivia included) that belong to it
//! directly. Every token of the input appears exactly once in the tree, so
//! the concatenated text of a file's root reproduces the source.
//!
//! Nodes are immutable after parsing. Child order matches source order and
//! child spans never overlap.

mod kind;

use std::fmt::{self, Write as _};

use ktwalk_core::Span;
use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

pub use kind::NodeKind;

// ============================================================================
// Node Identity
// ============================================================================

/// Pre-order node identifier, assigned by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out sequential [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u32 {
        self.next
    }
}

// ============================================================================
// Tree Elements
// ============================================================================

/// A child of a [`SyntaxNode`]: either a nested node or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement<'a> {
    Node(SyntaxNode<'a>),
    Token(Token<'a>),
}

impl<'a> SyntaxElement<'a> {
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(node) => node.span(),
            SyntaxElement::Token(token) => token.span,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode<'a>> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token<'a>> {
        match self {
            SyntaxElement::Node(_) => None,
            SyntaxElement::Token(token) => Some(token),
        }
    }
}

/// A node in the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode<'a> {
    kind: NodeKind,
    span: Span,
    name: Option<&'a str>,
    children: Vec<SyntaxElement<'a>>,
}

impl<'a> SyntaxNode<'a> {
    pub(crate) fn new(
        kind: NodeKind,
        span: Span,
        name: Option<&'a str>,
        children: Vec<SyntaxElement<'a>>,
    ) -> Self {
        debug_assert!(name.is_none() || kind.has_name());
        SyntaxNode {
            kind,
            span,
            name,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Byte range covered by this node, trivia between its first and last
    /// token included.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Declared or referenced name, for kinds where
    /// [`NodeKind::has_name`] holds.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// Direct children in source order.
    pub fn children(&self) -> &[SyntaxElement<'a>] {
        &self.children
    }

    /// Direct child nodes, skipping leaf tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode<'a>> + '_ {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Direct leaf tokens, trivia included.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token<'a>> + '_ {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// Direct child nodes of the given kind.
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode<'a>> + '_ {
        self.child_nodes().filter(move |node| node.kind == kind)
    }

    pub fn first_child_of_kind(&self, kind: NodeKind) -> Option<&SyntaxNode<'a>> {
        self.children_of_kind(kind).next()
    }

    pub fn is_error(&self) -> bool {
        self.kind == NodeKind::Error
    }

    /// This node and all nodes below it, in pre-order.
    pub fn descendants(&self) -> Descendants<'_, 'a> {
        Descendants { stack: vec![self] }
    }

    /// Every leaf token below this node, in source order.
    pub fn tokens(&self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut stack = vec![self.children.iter()];
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(SyntaxElement::Token(token)) => tokens.push(*token),
                Some(SyntaxElement::Node(node)) => stack.push(node.children.iter()),
                None => {
                    stack.pop();
                }
            }
        }
        tokens
    }

    /// Leaf tokens below this node that are not trivia.
    pub fn significant_tokens(&self) -> Vec<Token<'a>> {
        self.tokens().into_iter().filter(|t| !t.is_trivia()).collect()
    }

    /// Exact source text of this node, rebuilt from its tokens.
    pub fn text(&self) -> String {
        self.tokens().iter().map(|t| t.text).collect()
    }

    /// Source text of this node, sliced from the original input.
    pub fn text_in<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.span.slice(source)
    }

    /// The body of a function-like node: its block, or the expression after
    /// `=` for single-expression functions.
    pub fn body(&self) -> Option<&SyntaxNode<'a>> {
        match self.kind {
            NodeKind::FunctionDeclaration
            | NodeKind::AnonymousFunction
            | NodeKind::PropertyAccessor => self
                .child_nodes()
                .last()
                .filter(|node| node.kind.is_expression()),
            NodeKind::ClassDeclaration | NodeKind::ObjectDeclaration | NodeKind::EnumEntry => {
                self.first_child_of_kind(NodeKind::ClassBody)
            }
            NodeKind::SecondaryConstructor
            | NodeKind::Initializer
            | NodeKind::FinallyClause
            | NodeKind::CatchClause => self.first_child_of_kind(NodeKind::Block),
            _ => None,
        }
    }

    /// Parameters declared directly on this node.
    pub fn parameters(&self) -> impl Iterator<Item = &SyntaxNode<'a>> + '_ {
        self.children_of_kind(NodeKind::Parameter)
    }

    /// Indented outline of the subtree: one line per node with its kind,
    /// span and name. Tokens are omitted.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(&SyntaxNode<'a>, usize)> = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            let _ = write!(out, "{:indent$}{} {}", "", node.kind, node.span, indent = depth * 2);
            if let Some(name) = node.name {
                let _ = write!(out, " {name}");
            }
            out.push('\n');
            let children: Vec<_> = node.child_nodes().collect();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

// Operator chains nest one node per link, so dropping recursively could
// exhaust the stack on long inputs.
impl Drop for SyntaxNode<'_> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(element) = pending.pop() {
            if let SyntaxElement::Node(mut node) = element {
                pending.append(&mut node.children);
            }
        }
    }
}

/// Pre-order iterator over a subtree; see [`SyntaxNode::descendants`].
pub struct Descendants<'t, 'a> {
    stack: Vec<&'t SyntaxNode<'a>>,
}

impl<'t, 'a> Iterator for Descendants<'t, 'a> {
    type Item = &'t SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children: Vec<_> = node.child_nodes().collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}
