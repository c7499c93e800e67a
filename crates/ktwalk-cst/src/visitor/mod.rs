// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for CST traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order**: a node's `visit_*` runs before its children
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! # Visitor Pattern
//!
//! The [`Visitor`] trait has a catch-all [`Visitor::visit_element`] and one
//! handler per [`NodeKind`](crate::NodeKind). Unoverridden handlers fall
//! through to `visit_element`:
//!
//! ```
//! use ktwalk_cst::{parse_file, SyntaxNode, VisitResult, Visitor};
//!
//! struct CallCounter {
//!     count: usize,
//! }
//!
//! impl<'a> Visitor<'a> for CallCounter {
//!     fn visit_call(&mut self, _node: &SyntaxNode<'a>) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//!
//! let parsed = parse_file("fun main() { println(listOf(1).map { it * 2 }) }");
//! let mut counter = CallCounter { count: 0 };
//! parsed.root.accept_children(&mut counter);
//! assert_eq!(counter.count, 3);
//! ```

mod declarations;
mod dispatch;
mod printer;
mod traits;

pub use declarations::{Declaration, DeclarationCollector};
pub use dispatch::{accept, accept_children, try_walk, walk, WalkMode};
pub use printer::{ElementPrinter, PrintStyle};
pub use traits::{dispatch, VisitResult, Visitor};
