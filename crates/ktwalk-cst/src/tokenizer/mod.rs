// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for Kotlin-subset source code.
//!
//! The tokenizer is lossless: every byte of the input belongs to exactly one
//! token, trivia (whitespace, newlines, comments) included, and the stream
//! always ends with a single [`TokenKind::EndOfFile`] token. Concatenating
//! the text of every token reproduces the input.
//!
//! Malformed regions (an unterminated string, an unterminated block comment,
//! a stray character) become [`TokenKind::Error`] tokens and lexing carries
//! on after them. The error is recoverable from the token itself with
//! [`LexError::from_token`], so the iterator needs no side channel.

mod core;


use std::fmt;

use ktwalk_core::Span;
use serde::Serialize;
use thiserror::Error;

pub use self::core::TokenIterator;

/// Keywords that can never be identifiers.
///
/// Modifiers and other soft keywords (`import`, `by`, `init`, `data`,
/// `override`, ...) are lexed as identifiers and recognized by the parser in
/// context.
pub const HARD_KEYWORDS: &[&str] = &[
    "as",
    "break",
    "class",
    "continue",
    "do",
    "else",
    "false",
    "for",
    "fun",
    "if",
    "in",
    "interface",
    "is",
    "null",
    "object",
    "package",
    "return",
    "super",
    "this",
    "throw",
    "true",
    "try",
    "typealias",
    "val",
    "var",
    "when",
    "while",
];

/// Returns true if `text` is a hard keyword.
pub fn is_hard_keyword(text: &str) -> bool {
    HARD_KEYWORDS.contains(&text)
}

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    /// A malformed region; the payload says what went wrong.
    Error(LexErrorKind),
    EndOfFile,
}

impl TokenKind {
    /// Trivia does not affect program structure.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// Literal token kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }

    /// Stable display name.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Operator => "Operator",
            TokenKind::IntegerLiteral => "IntegerLiteral",
            TokenKind::FloatLiteral => "FloatLiteral",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::CharLiteral => "CharLiteral",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Newline => "Newline",
            TokenKind::LineComment => "LineComment",
            TokenKind::BlockComment => "BlockComment",
            TokenKind::Error(_) => "Error",
            TokenKind::EndOfFile => "EndOfFile",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexed token. Immutable once produced; `text` borrows the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, span: Span, text: &'a str) -> Self {
        Token { kind, span, text }
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }

    /// Hard keyword with the given text.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    /// Operator or punctuation with the given text.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Identifier with the given text (used for soft keywords).
    pub fn is_soft_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfFile => f.write_str("end of file"),
            TokenKind::Newline => f.write_str("newline"),
            kind => write!(f, "{} `{}`", kind, self.text.escape_debug()),
        }
    }
}

/// What made a region of input unlexable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated backtick identifier")]
    UnterminatedBacktick,
    #[error("unexpected character")]
    UnexpectedCharacter,
}

/// A lexer diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

impl LexError {
    /// Recover the error carried by an error token.
    pub fn from_token(token: &Token<'_>) -> Option<LexError> {
        match token.kind {
            TokenKind::Error(kind) => Some(LexError {
                span: token.span,
                kind,
            }),
            _ => None,
        }
    }

    /// Byte offset where the malformed region starts.
    pub fn position(&self) -> usize {
        self.span.start
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Tokenizes source text into a lazy, lossless token stream.
///
/// The returned iterator is `Clone`; cloning it (or calling `tokenize` again)
/// restarts lexing independently.
pub fn tokenize(source: &str) -> TokenIterator<'_> {
    TokenIterator::new(source)
}

/// All lexer errors in `source`, in order.
pub fn lex_errors(source: &str) -> Vec<LexError> {
    tokenize(source)
        .filter_map(|token| LexError::from_token(&token))
        .collect()
}
