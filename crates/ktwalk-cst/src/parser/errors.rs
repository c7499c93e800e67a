// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use ktwalk_core::Span;
use thiserror::Error;

use crate::nodes::SyntaxNode;
use crate::tokenizer::LexError;

/// An unexpected token or a missing construct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    /// The offending token, or an empty span where a token is missing.
    pub span: Span,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    pub fn new(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ParseError {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Anything reported while turning source text into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("parser error: {0}")]
    Parse(#[from] ParseError),
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::Lex(err) => err.span,
            Diagnostic::Parse(err) => err.span,
        }
    }

    /// Message without the lexer/parser prefix.
    pub fn message(&self) -> String {
        match self {
            Diagnostic::Lex(err) => err.message(),
            Diagnostic::Parse(err) => err.to_string(),
        }
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, Diagnostic::Lex(_))
    }

    /// Short stable name of the diagnostic category.
    pub fn category(&self) -> &'static str {
        match self {
            Diagnostic::Lex(_) => "lex",
            Diagnostic::Parse(_) => "parse",
        }
    }
}

/// The result of parsing: a tree (always present) plus every diagnostic,
/// sorted by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<'a> {
    pub root: SyntaxNode<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Parsed<'a> {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn lex_errors(&self) -> impl Iterator<Item = &LexError> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Lex(err) => Some(err),
            Diagnostic::Parse(_) => None,
        })
    }

    pub fn parse_errors(&self) -> impl Iterator<Item = &ParseError> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Parse(err) => Some(err),
            Diagnostic::Lex(_) => None,
        })
    }
}
