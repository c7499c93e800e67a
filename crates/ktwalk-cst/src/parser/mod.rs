// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser producing a lossless concrete syntax tree.
//!
//! The parser walks the significant tokens of a stream and attaches trivia to
//! whichever node is open when the next significant token is consumed, so
//! comments and whitespace in front of a declaration belong to its parent.
//! Grammar rules live in submodules by area:
//!
//! - `declarations`: classes, objects, functions, properties, parameters
//! - `statements`: blocks, loops, jumps, statement sequencing
//! - `expressions`: precedence climbing, postfix chains, primaries
//! - `types`: type references, type arguments and type parameters
//!
//! Errors never abort parsing. An unexpected token is wrapped in an `Error`
//! node and the parser resynchronizes at the next statement boundary; a
//! missing token is reported with an empty span and parsing carries on.

mod builder;
mod declarations;
mod errors;
mod expressions;
mod statements;
mod types;

#[cfg(test)]
mod tests;

use ktwalk_core::Span;
use tracing::{debug, debug_span, trace};

use crate::nodes::NodeKind;
use crate::options::ParseOptions;
use crate::tokenizer::{LexError, Token, TokenKind};

use self::builder::{Checkpoint, TreeBuilder};

pub use self::errors::{Diagnostic, ParseError, Parsed};

/// Keywords that start a declaration.
const DECLARATION_KEYWORDS: &[&str] = &["class", "interface", "fun", "val", "var", "object", "typealias"];

/// Soft keywords accepted in modifier position.
const MODIFIERS: &[&str] = &[
    "abstract",
    "actual",
    "annotation",
    "companion",
    "const",
    "crossinline",
    "data",
    "enum",
    "expect",
    "external",
    "final",
    "infix",
    "inline",
    "inner",
    "internal",
    "lateinit",
    "noinline",
    "open",
    "operator",
    "out",
    "override",
    "private",
    "protected",
    "public",
    "reified",
    "sealed",
    "suspend",
    "tailrec",
    "value",
    "vararg",
];

/// Parse a token stream with default options.
///
/// The stream should come from [`tokenize`](crate::tokenize); anything after
/// its first end-of-file token is ignored, and a missing end-of-file token is
/// supplied.
pub fn parse<'a, I>(tokens: I) -> Parsed<'a>
where
    I: IntoIterator<Item = Token<'a>>,
{
    parse_with_options(tokens, ParseOptions::default())
}

/// Parse a token stream with explicit options.
pub fn parse_with_options<'a, I>(tokens: I, options: ParseOptions) -> Parsed<'a>
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut tokens: Vec<Token<'a>> = tokens.into_iter().collect();
    if let Some(eof) = tokens.iter().position(Token::is_eof) {
        tokens.truncate(eof + 1);
    } else {
        let end = tokens.last().map_or(0, |t| t.span.end);
        tokens.push(Token::new(TokenKind::EndOfFile, Span::empty_at(end), ""));
    }

    let _span = debug_span!("parse", tokens = tokens.len(), max_depth = options.max_depth).entered();
    let mut parser = Parser::new(tokens, options);
    parser.parse_file();
    let parsed = parser.finish();
    debug!(diagnostics = parsed.diagnostics.len(), "parse finished");
    parsed
}

/// Strip the backticks from a quoted identifier.
fn identifier_name(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(text)
}

pub(crate) struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    /// Index of the first raw token not yet added to the tree.
    pos: usize,
    /// End offset of the last significant token consumed.
    last_end: usize,
    builder: TreeBuilder<'a>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
    max_depth: usize,
    /// Inside parentheses and brackets newlines do not end expressions.
    ignore_newlines: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token<'a>>, options: ParseOptions) -> Self {
        Parser {
            tokens,
            pos: 0,
            last_end: 0,
            builder: TreeBuilder::new(),
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: options.max_depth.max(1),
            ignore_newlines: false,
        }
    }

    fn finish(self) -> Parsed<'a> {
        let end = self.tokens.last().map_or(0, |t| t.span.end);
        let mut diagnostics: Vec<Diagnostic> = self
            .tokens
            .iter()
            .filter_map(LexError::from_token)
            .map(Diagnostic::Lex)
            .collect();
        diagnostics.extend(self.diagnostics);
        diagnostics.sort_by_key(|d| d.span().start);
        Parsed {
            root: self.builder.finish(end),
            diagnostics,
        }
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    /// Raw index of the `n`th significant token from the cursor. Saturates
    /// at the end-of-file token.
    fn nth_index(&self, n: usize) -> usize {
        let mut remaining = n;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if token.is_trivia() {
                continue;
            }
            if remaining == 0 || token.is_eof() {
                return i;
            }
            remaining -= 1;
        }
        self.tokens.len() - 1
    }

    fn nth(&self, n: usize) -> Token<'a> {
        self.tokens[self.nth_index(n)]
    }

    fn current(&self) -> Token<'a> {
        self.nth(0)
    }

    fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn at_op(&self, op: &str) -> bool {
        self.current().is_op(op)
    }

    fn nth_op(&self, n: usize, op: &str) -> bool {
        self.nth(n).is_op(op)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.current().is_keyword(keyword)
    }

    fn at_soft(&self, word: &str) -> bool {
        self.current().is_soft_keyword(word)
    }

    fn at_identifier(&self) -> bool {
        self.current().is_identifier()
    }

    /// True if a newline separates the `n`th significant token from the one
    /// before it, and newlines are significant here.
    fn newline_before_nth(&self, n: usize) -> bool {
        if self.ignore_newlines {
            return false;
        }
        let end = self.nth_index(n);
        let start = if n == 0 {
            self.pos
        } else {
            self.nth_index(n - 1) + 1
        };
        self.tokens[start.min(end)..end]
            .iter()
            .any(|t| t.kind == TokenKind::Newline)
    }

    fn newline_before(&self) -> bool {
        self.newline_before_nth(0)
    }

    /// No trivia between the previous token and the current one.
    fn adjacent(&self) -> bool {
        self.nth_index(0) == self.pos
    }

    fn at_closing_or_separator(&self) -> bool {
        let token = self.current();
        token.kind == TokenKind::Operator
            && matches!(token.text, ")" | "]" | "}" | "," | ";" | "->")
    }

    fn at_declaration_keyword(&self) -> bool {
        let token = self.current();
        token.kind == TokenKind::Keyword && DECLARATION_KEYWORDS.contains(&token.text)
    }

    fn is_modifier(token: &Token<'_>) -> bool {
        token.is_identifier() && MODIFIERS.contains(&token.text)
    }

    // ------------------------------------------------------------------
    // Consuming tokens and building nodes
    // ------------------------------------------------------------------

    /// Move trivia in front of the current token into the open node.
    fn eat_trivia(&mut self) {
        let target = self.nth_index(0);
        while self.pos < target {
            self.builder.token(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    /// Consume the current significant token. Never consumes end-of-file.
    fn bump(&mut self) {
        let index = self.nth_index(0);
        let token = self.tokens[index];
        if token.is_eof() {
            return;
        }
        self.eat_trivia();
        self.builder.token(token);
        self.last_end = token.span.end;
        self.pos = index + 1;
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.at_op(op) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: &str) -> bool {
        if self.eat_op(op) {
            true
        } else {
            self.error_missing(&format!("`{op}`"));
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            self.error_missing(&format!("`{keyword}`"));
            false
        }
    }

    /// Consume an identifier and return its name, or report `what` missing.
    fn expect_name(&mut self, what: &str) -> Option<&'a str> {
        if self.at_identifier() {
            let token = self.current();
            self.bump();
            Some(identifier_name(token.text))
        } else {
            self.error_missing(what);
            None
        }
    }

    /// Consume an identifier into the open node and name the node after it.
    fn name_node(&mut self, what: &str) {
        if let Some(name) = self.expect_name(what) {
            self.builder.set_name(name);
        }
    }

    fn start_node(&mut self, kind: NodeKind) {
        self.eat_trivia();
        self.builder.start_node(kind);
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    fn finish_node(&mut self) {
        let offset = self.current().span.start;
        self.builder.finish_node(offset);
    }

    /// A node holding just the current token.
    fn leaf(&mut self, kind: NodeKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// Run `f` with newline sensitivity switched on or off.
    fn with_newlines<R>(&mut self, ignore: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.ignore_newlines, ignore);
        let result = f(self);
        self.ignore_newlines = saved;
        result
    }

    // ------------------------------------------------------------------
    // Nesting limit
    // ------------------------------------------------------------------

    /// Enter a nested construct. Past the limit the region is skipped as an
    /// `Error` node and `false` is returned.
    fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.skip_too_deep();
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Undo `count` successful `enter` calls, one per link of an operator
    /// or postfix chain.
    fn leave_chain(&mut self, count: usize) {
        self.depth = self.depth.saturating_sub(count);
    }

    fn skip_too_deep(&mut self) {
        let token = self.current();
        let expected = format!("at most {} levels of nesting", self.max_depth);
        self.report(token.span, expected, token.to_string());
        self.start_node(NodeKind::Error);
        if !self.at_eof() && !self.at_closing_or_separator() {
            self.bump_balanced();
        }
        self.finish_node();
    }

    // ------------------------------------------------------------------
    // Diagnostics and recovery
    // ------------------------------------------------------------------

    fn report(&mut self, span: Span, expected: impl Into<String>, found: String) {
        // one diagnostic per position keeps cascades quiet
        if self
            .diagnostics
            .last()
            .is_some_and(|d| d.span().start == span.start)
        {
            return;
        }
        let error = ParseError::new(span, expected, found);
        trace!(span = %error.span, expected = %error.expected, found = %error.found, "parse error");
        self.diagnostics.push(Diagnostic::Parse(error));
    }

    /// The current token cannot appear here.
    fn error_expected(&mut self, expected: &str) {
        let token = self.current();
        if token.is_error() {
            return;
        }
        self.report(token.span, expected, token.to_string());
    }

    /// A token is missing just after the previous one.
    fn error_missing(&mut self, expected: &str) {
        let token = self.current();
        if token.is_error() {
            return;
        }
        self.report(Span::empty_at(self.last_end), expected, token.to_string());
    }

    /// Consume one token, or a whole bracketed group if it opens one.
    fn bump_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.current();
            if token.is_eof() {
                return;
            }
            if token.kind == TokenKind::Operator {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    fn at_recovery_point(&self) -> bool {
        self.at_eof()
            || self.at_op(";")
            || self.at_op("}")
            || self.newline_before()
            || self.at_declaration_keyword()
    }

    /// Report the current token and skip to the next statement boundary,
    /// wrapping everything skipped in an `Error` node.
    fn recover(&mut self, expected: &str) {
        self.error_expected(expected);
        trace!(expected, found = %self.current(), "recovering");
        self.start_node(NodeKind::Error);
        if !self.at_eof() {
            self.bump_balanced();
        }
        while !self.at_recovery_point() {
            self.bump_balanced();
        }
        self.finish_node();
    }

    /// Skip to the next `,` or `closer` inside a delimited list.
    fn recover_in_list(&mut self, expected: &str, closer: &str) {
        self.error_expected(expected);
        let at_stop = |p: &Self| {
            p.at_eof() || p.at_op(closer) || p.at_op(",") || p.at_op("}") || p.at_op(";")
        };
        if at_stop(self) {
            return;
        }
        self.start_node(NodeKind::Error);
        while !at_stop(self) {
            self.bump_balanced();
        }
        self.finish_node();
    }

    /// Parse `item (, item)* ,?` up to (not including) `closer`.
    fn parse_list(&mut self, closer: &str, what: &str, mut item: impl FnMut(&mut Self)) {
        loop {
            if self.at_op(closer) || self.at_eof() {
                break;
            }
            let before = self.nth_index(0);
            item(self);
            if self.eat_op(",") {
                continue;
            }
            if self.at_op(closer) || self.at_eof() {
                break;
            }
            if self.nth_index(0) == before {
                self.recover_in_list(what, closer);
            } else {
                self.recover_in_list(&format!("`,` or `{closer}`"), closer);
            }
            if self.nth_index(0) == before || !self.eat_op(",") {
                break;
            }
        }
    }

    /// Index (in significant tokens from `start`) just past the `>` closing
    /// the `<` at `start`, if the tokens between can form type arguments.
    fn skip_angle(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut n = start;
        loop {
            let token = self.nth(n);
            match token.kind {
                TokenKind::Operator => match token.text {
                    "<" => depth += 1,
                    ">" => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return Some(n + 1);
                        }
                    }
                    "," | "." | ":" | "?" | "*" | "(" | ")" | "->" => {}
                    _ => return None,
                },
                TokenKind::Identifier => {}
                TokenKind::Keyword if token.text == "in" => {}
                _ => return None,
            }
            n += 1;
            if n - start > 64 {
                return None;
            }
        }
    }

    // ------------------------------------------------------------------
    // File
    // ------------------------------------------------------------------

    fn parse_file(&mut self) {
        self.builder.start_node(NodeKind::File);
        if self.at_op("@") && self.nth(1).is_soft_keyword("file") {
            self.parse_modifiers();
        }
        if self.at_keyword("package") {
            self.parse_package();
        }
        while self.at_soft("import") {
            self.parse_import();
        }
        self.parse_statements(false);
        self.eat_trivia();
        let eof = self.current();
        self.builder.token(eof);
        self.builder.finish_node(eof.span.end);
    }

    fn parse_qualified_name(&mut self) {
        if self.expect_name("name").is_none() {
            return;
        }
        while self.at_op(".") && self.nth(1).is_identifier() {
            self.bump();
            self.bump();
        }
    }

    fn parse_package(&mut self) {
        self.start_node(NodeKind::PackageDirective);
        self.bump();
        self.parse_qualified_name();
        self.eat_op(";");
        self.finish_node();
    }

    fn parse_import(&mut self) {
        self.start_node(NodeKind::ImportDirective);
        self.bump();
        self.parse_qualified_name();
        if self.at_op(".") && self.nth_op(1, "*") {
            self.bump();
            self.bump();
        } else if self.at_keyword("as") {
            self.bump();
            self.expect_name("import alias");
        }
        self.eat_op(";");
        self.finish_node();
    }
}
