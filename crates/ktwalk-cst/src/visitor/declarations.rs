// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! DeclarationCollector visitor for enumerating declarations.
//!
//! Collects every declaration in a tree (see [`NodeKind::is_declaration`])
//! in pre-order, with its nesting depth and the id of the enclosing
//! declaration.
//!
//! # Example
//!
//! ```
//! use ktwalk_cst::{parse_file, DeclarationCollector, NodeKind};
//!
//! let parsed = parse_file("class Foo { fun bar() {} }");
//! let decls = DeclarationCollector::collect(&parsed.root);
//!
//! assert_eq!(decls.len(), 2);
//! assert_eq!(decls[0].kind, NodeKind::ClassDeclaration);
//! assert_eq!(decls[1].name, Some("bar"));
//! assert_eq!(decls[1].parent, Some(decls[0].id));
//! ```

use ktwalk_core::Span;
use serde::Serialize;

use crate::nodes::{NodeId, NodeIdGenerator, NodeKind, SyntaxNode};

use super::traits::{VisitResult, Visitor};

/// A declaration found in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration<'a> {
    /// Pre-order id among the collected declarations.
    pub id: NodeId,
    pub kind: NodeKind,
    /// Declared name, `None` for anonymous objects and destructuring.
    pub name: Option<&'a str>,
    pub span: Span,
    /// Number of enclosing declarations.
    pub depth: usize,
    /// Id of the innermost enclosing declaration.
    pub parent: Option<NodeId>,
}

/// Visitor that collects declarations.
#[derive(Debug, Default)]
pub struct DeclarationCollector<'a> {
    ids: NodeIdGenerator,
    declarations: Vec<Declaration<'a>>,
    /// Enclosing declarations as (id, span), innermost last.
    open: Vec<(NodeId, Span)>,
}

impl<'a> DeclarationCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the declarations below `root`.
    pub fn collect(root: &SyntaxNode<'a>) -> Vec<Declaration<'a>> {
        let mut collector = DeclarationCollector::new();
        root.accept(&mut collector);
        collector.into_declarations()
    }

    pub fn declarations(&self) -> &[Declaration<'a>] {
        &self.declarations
    }

    pub fn into_declarations(self) -> Vec<Declaration<'a>> {
        self.declarations
    }
}

impl<'a> Visitor<'a> for DeclarationCollector<'a> {
    fn visit_element(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        if !node.kind().is_declaration() {
            return VisitResult::Continue;
        }
        let span = node.span();
        while let Some((_, outer)) = self.open.last() {
            if outer.contains(&span) {
                break;
            }
            self.open.pop();
        }
        let id = self.ids.next();
        self.declarations.push(Declaration {
            id,
            kind: node.kind(),
            name: node.name(),
            span,
            depth: self.open.len(),
            parent: self.open.last().map(|(id, _)| *id),
        });
        self.open.push((id, span));
        VisitResult::Continue
    }
}
