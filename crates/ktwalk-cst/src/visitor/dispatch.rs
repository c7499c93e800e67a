// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for CST traversal.
//!
//! Traversal is pre-order and in source order: a node's handler runs before
//! any of its children, and children are visited left to right. The walk
//! keeps an explicit stack, so tree depth never turns into call depth.
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children, continue with the next sibling
//! - `VisitResult::Stop` - halt traversal immediately

use std::convert::Infallible;

use crate::nodes::SyntaxNode;

use super::traits::{dispatch, VisitResult, Visitor};

/// Whether a walk starts with the root itself or with its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkMode {
    #[default]
    IncludeSelf,
    ChildrenOnly,
}

/// Walk `root` with `visitor`, dispatching each node to its kind handler.
///
/// Returns [`VisitResult::Stop`] if a handler stopped the walk, and
/// [`VisitResult::Continue`] otherwise.
pub fn walk<'a, V>(root: &SyntaxNode<'a>, visitor: &mut V, mode: WalkMode) -> VisitResult
where
    V: Visitor<'a> + ?Sized,
{
    let result: Result<VisitResult, Infallible> =
        try_walk(root, mode, |node| Ok(dispatch(&mut *visitor, node)));
    match result {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Walk `root` with a fallible callback.
///
/// The first `Err` ends the walk and is returned unchanged.
pub fn try_walk<'a, E, F>(root: &SyntaxNode<'a>, mode: WalkMode, mut f: F) -> Result<VisitResult, E>
where
    F: FnMut(&SyntaxNode<'a>) -> Result<VisitResult, E>,
{
    let mut stack: Vec<&SyntaxNode<'a>> = match mode {
        WalkMode::IncludeSelf => vec![root],
        WalkMode::ChildrenOnly => root.child_nodes().collect(),
    };
    stack.reverse();

    while let Some(node) = stack.pop() {
        match f(node)? {
            VisitResult::Continue => {
                let mark = stack.len();
                stack.extend(node.child_nodes());
                stack[mark..].reverse();
            }
            VisitResult::SkipChildren => {}
            VisitResult::Stop => return Ok(VisitResult::Stop),
        }
    }
    Ok(VisitResult::Continue)
}

/// Visit `node` itself, then its descendants.
pub fn accept<'a, V>(node: &SyntaxNode<'a>, visitor: &mut V) -> VisitResult
where
    V: Visitor<'a> + ?Sized,
{
    walk(node, visitor, WalkMode::IncludeSelf)
}

/// Visit the descendants of `node`, but not `node` itself.
pub fn accept_children<'a, V>(node: &SyntaxNode<'a>, visitor: &mut V) -> VisitResult
where
    V: Visitor<'a> + ?Sized,
{
    walk(node, visitor, WalkMode::ChildrenOnly)
}

impl<'a> SyntaxNode<'a> {
    /// Method form of [`accept`].
    pub fn accept<V>(&self, visitor: &mut V) -> VisitResult
    where
        V: Visitor<'a> + ?Sized,
    {
        accept(self, visitor)
    }

    /// Method form of [`accept_children`].
    pub fn accept_children<V>(&self, visitor: &mut V) -> VisitResult
    where
        V: Visitor<'a> + ?Sized,
    {
        accept_children(self, visitor)
    }
}
