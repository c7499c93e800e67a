// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Kotlin-subset parser and Concrete Syntax Tree (CST) library.
//!
//! This crate lexes Kotlin-subset source into a lossless token stream, builds
//! a concrete syntax tree in which every token (trivia included) has exactly
//! one place, and walks that tree with per-kind visitors.
//!
//! # Overview
//!
//! - **Lexing**: [`tokenize`] returns a lazy token iterator.
//! - **Parsing**: [`parse_file`] or [`parse_file_with_options`] build a
//!   [`SyntaxNode`] tree. Parsing never fails; problems are collected as
//!   [`Diagnostic`]s next to a best-effort tree.
//! - **Traversal**: implement [`Visitor`] and call [`SyntaxNode::accept`] or
//!   [`SyntaxNode::accept_children`].
//!
//! # Quick Start
//!
//! ```
//! use ktwalk_cst::{parse_file, NodeKind};
//!
//! let source = "fun add(a: Int, b: Int): Int { return a + b }";
//! let parsed = parse_file(source);
//! assert!(parsed.diagnostics.is_empty());
//!
//! // Lossless: the tree reproduces the input
//! assert_eq!(parsed.root.text(), source);
//!
//! let function = parsed.root.first_child_of_kind(NodeKind::FunctionDeclaration).unwrap();
//! assert_eq!(function.name(), Some("add"));
//! assert_eq!(function.parameters().count(), 2);
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Parser configuration.
pub mod options;
pub use options::ParseOptions;

/// Tokenizer for Kotlin-subset source code.
pub mod tokenizer;
pub use tokenizer::{tokenize, LexError, LexErrorKind, Token, TokenIterator, TokenKind};

/// Visitor infrastructure for CST traversal.
pub mod visitor;
pub use visitor::{
    accept, accept_children, dispatch, try_walk, walk, Declaration, DeclarationCollector,
    ElementPrinter, PrintStyle, VisitResult, Visitor, WalkMode,
};

mod nodes;
pub use nodes::{Descendants, NodeId, NodeIdGenerator, NodeKind, SyntaxElement, SyntaxNode};

mod parser;
pub use parser::{parse, parse_with_options, Diagnostic, ParseError, Parsed};

use ktwalk_core::text::span_to_line_range;
use ktwalk_core::Span;

// ============================================================================
// Parsing functions
// ============================================================================

/// Parses a source file with default options.
///
/// # Example
///
/// ```
/// use ktwalk_cst::parse_file;
///
/// let parsed = parse_file("class Foo { fun bar() {} }");
/// assert!(!parsed.has_errors());
/// assert_eq!(parsed.root.span().end, 26);
/// ```
pub fn parse_file(source: &str) -> Parsed<'_> {
    parse_file_with_options(source, ParseOptions::default())
}

/// Parses a source file with explicit [`ParseOptions`].
pub fn parse_file_with_options(source: &str, options: ParseOptions) -> Parsed<'_> {
    parse_with_options(tokenize(source), options)
}

// ============================================================================
// Error formatting
// ============================================================================

/// Returns the byte offset of the beginning of line `n` (1-indexed).
fn bol_offset(source: &str, n: u32) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth((n - 2) as usize)
        .map(|(index, _)| index + 1)
        .unwrap_or(source.len())
}

/// Formats a diagnostic into a human-readable string with source context.
///
/// One line of context is shown above and below the offending span. Empty
/// spans (missing tokens) are widened to the next character so the marker
/// stays visible.
///
/// # Example
///
/// ```
/// use ktwalk_cst::{parse_file, prettify_diagnostic};
///
/// let source = "fun main() {\n    println(\"hi\"\n}\n";
/// let parsed = parse_file(source);
/// let rendered = prettify_diagnostic(&parsed.diagnostics[0], source, "main.kt");
/// assert!(rendered.contains("main.kt"));
/// assert!(rendered.contains("expected `)`"));
/// ```
pub fn prettify_diagnostic(diagnostic: &Diagnostic, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let span = diagnostic.span();
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let (start_line, end_line) = span_to_line_range(source, &Span::new(start, end));

    let context = 1;
    let line_start = start_line.saturating_sub(context).max(1);
    let start_offset = bol_offset(source, line_start);
    let end_offset = bol_offset(source, end_line + context + 1);
    let snippet = &source[start_offset..end_offset];

    let start = start - start_offset;
    let end = if end - start_offset == start {
        let width = snippet[start..].chars().next().map_or(1, char::len_utf8);
        start + width
    } else {
        end - start_offset
    };

    let title = diagnostic.to_string();
    let message = diagnostic.message();
    let rendered = Renderer::plain()
        .render(
            Level::Error.title(&title).snippet(
                Snippet::source(snippet)
                    .origin(label)
                    .line_start(line_start as usize)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

// ============================================================================
// Tests
// ============================================================================
