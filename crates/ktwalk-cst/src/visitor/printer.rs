// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! ElementPrinter visitor for line-oriented tree dumps.
//!
//! Prints one line per visited node to any [`io::Write`]. Two styles are
//! available:
//!
//! - [`PrintStyle::Text`]: `Element: <text>` for every node, with the root
//!   printed as `File: <text>`.
//! - [`PrintStyle::Kinds`]: `Element: <Kind> -> <text>` for every node, with
//!   `Class: <name>` and `Method: <name>` printed ahead of the element line
//!   for class and function declarations.
//!
//! The first write error stops the walk and is kept for the caller; see
//! [`ElementPrinter::finish`].
//!
//! # Example
//!
//! ```
//! use ktwalk_cst::{parse_file, ElementPrinter, PrintStyle};
//!
//! let parsed = parse_file("class Foo { fun bar() {} }");
//! let mut printer = ElementPrinter::new(Vec::new(), PrintStyle::Kinds).declarations_only(true);
//! parsed.root.accept_children(&mut printer);
//! let out = printer.finish().unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "Class: Foo\nMethod: bar\n");
//! ```

use std::io::{self, Write};

use crate::nodes::SyntaxNode;

use super::traits::{VisitResult, Visitor};

/// Line format used by [`ElementPrinter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintStyle {
    /// `Element: <text>`, and `File: <text>` for the root.
    #[default]
    Text,
    /// `Element: <Kind> -> <text>`, plus `Class:` and `Method:` lines.
    Kinds,
}

/// Visitor that prints each visited node as a line.
pub struct ElementPrinter<W: Write> {
    out: W,
    style: PrintStyle,
    recursive: bool,
    show_text: bool,
    declarations_only: bool,
    max_text_width: Option<usize>,
    lines: usize,
    error: Option<io::Error>,
}

impl<W: Write> ElementPrinter<W> {
    pub fn new(out: W, style: PrintStyle) -> Self {
        ElementPrinter {
            out,
            style,
            recursive: true,
            show_text: true,
            declarations_only: false,
            max_text_width: None,
            lines: 0,
            error: None,
        }
    }

    /// Descend into children (default `true`). When off, only the nodes the
    /// walk starts from are printed.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Include node text in element lines (default `true`).
    pub fn show_text(mut self, show_text: bool) -> Self {
        self.show_text = show_text;
        self
    }

    /// Print only `Class:` and `Method:` lines.
    pub fn declarations_only(mut self, declarations_only: bool) -> Self {
        self.declarations_only = declarations_only;
        self
    }

    /// Truncate node text to this many characters, marking the cut with `...`.
    pub fn max_text_width(mut self, width: Option<usize>) -> Self {
        self.max_text_width = width;
        self
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Return the writer, or the first write error hit during the walk.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn clip(&self, text: String) -> String {
        match self.max_text_width {
            Some(width) if text.chars().count() > width => {
                let mut clipped: String = text.chars().take(width).collect();
                clipped.push_str("...");
                clipped
            }
            _ => text,
        }
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{args}") {
            Ok(()) => self.lines += 1,
            Err(err) => self.error = Some(err),
        }
    }

    fn descend(&self) -> VisitResult {
        if self.error.is_some() {
            VisitResult::Stop
        } else if self.recursive {
            VisitResult::Continue
        } else {
            VisitResult::SkipChildren
        }
    }

    fn print_element(&mut self, label: &str, node: &SyntaxNode<'_>) {
        if self.declarations_only {
            return;
        }
        let text = if self.show_text {
            Some(self.clip(node.text()))
        } else {
            None
        };
        match (self.style, text) {
            (PrintStyle::Text, Some(text)) => self.line(format_args!("{label}: {text}")),
            (PrintStyle::Text, None) => self.line(format_args!("{label}: {}", node.kind())),
            (PrintStyle::Kinds, Some(text)) => {
                self.line(format_args!("{label}: {} -> {text}", node.kind()))
            }
            (PrintStyle::Kinds, None) => self.line(format_args!("{label}: {}", node.kind())),
        }
    }

    fn print_declaration(&mut self, label: &str, node: &SyntaxNode<'_>) {
        if self.style == PrintStyle::Kinds {
            let name = node.name().unwrap_or("<anonymous>");
            self.line(format_args!("{label}: {name}"));
        }
    }
}

impl<'a, W: Write> Visitor<'a> for ElementPrinter<W> {
    fn visit_element(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        self.print_element("Element", node);
        self.descend()
    }

    fn visit_file(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        match self.style {
            PrintStyle::Text => self.print_element("File", node),
            PrintStyle::Kinds => self.print_element("Element", node),
        }
        self.descend()
    }

    fn visit_class(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        self.print_declaration("Class", node);
        self.visit_element(node)
    }

    fn visit_function(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
        self.print_declaration("Method", node);
        self.visit_element(node)
    }
}
