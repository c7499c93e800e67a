// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Bottom-up tree construction.
//!
//! The parser opens a node, pushes tokens and finished child nodes into it,
//! then closes it. A [`Checkpoint`] marks a position in the open node so a
//! later decision (`a` turning out to be the left operand of `a + b`) can
//! retroactively wrap the children produced since then.

use ktwalk_core::Span;

use crate::nodes::{NodeKind, SyntaxElement, SyntaxNode};
use crate::tokenizer::Token;

#[derive(Debug)]
struct Frame<'a> {
    kind: NodeKind,
    name: Option<&'a str>,
    children: Vec<SyntaxElement<'a>>,
}

/// A position among the children of the currently open node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    depth: usize,
    index: usize,
}

#[derive(Debug, Default)]
pub(crate) struct TreeBuilder<'a> {
    stack: Vec<Frame<'a>>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start_node(&mut self, kind: NodeKind) {
        self.stack.push(Frame {
            kind,
            name: None,
            children: Vec::new(),
        });
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.stack.len(),
            index: self.stack.last().map_or(0, |frame| frame.children.len()),
        }
    }

    /// Open a node that adopts every child added to the current node since
    /// `checkpoint` was taken.
    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        debug_assert_eq!(checkpoint.depth, self.stack.len(), "stale checkpoint");
        let children = match self.stack.last_mut() {
            Some(frame) if checkpoint.index <= frame.children.len() => {
                frame.children.split_off(checkpoint.index)
            }
            _ => Vec::new(),
        };
        self.stack.push(Frame {
            kind,
            name: None,
            children,
        });
    }

    /// Name the open node, unless it already has a name.
    pub(crate) fn set_name(&mut self, name: &'a str) {
        if let Some(frame) = self.stack.last_mut() {
            if frame.kind.has_name() && frame.name.is_none() {
                frame.name = Some(name);
            }
        }
    }

    pub(crate) fn token(&mut self, token: Token<'a>) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(SyntaxElement::Token(token));
        }
    }

    /// Close the open node. A node without children gets an empty span at
    /// `offset`.
    pub(crate) fn finish_node(&mut self, offset: usize) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let span = match (frame.children.first(), frame.children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::empty_at(offset),
        };
        let node = SyntaxNode::new(frame.kind, span, frame.name, frame.children);
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(SyntaxElement::Node(node)),
            None => self.root = Some(node),
        }
    }

    /// Close every open node and return the root.
    pub(crate) fn finish(mut self, offset: usize) -> SyntaxNode<'a> {
        while !self.stack.is_empty() {
            self.finish_node(offset);
        }
        self.root
            .unwrap_or_else(|| SyntaxNode::new(NodeKind::File, Span::empty_at(offset), None, Vec::new()))
    }
}
