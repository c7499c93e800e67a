// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The scanning state machine behind [`TokenIterator`].
//!
//! Scanning is a pure function of the byte offset (`scan_at`), which keeps the
//! iterator trivially restartable and lets string templates (`"${ ... }"`)
//! reuse the main scanner to find their closing brace.

use ktwalk_core::Span;
use memchr::memchr2;

use super::{is_hard_keyword, LexErrorKind, Token, TokenKind};

/// Multi-character operators, longest first within each length.
const OPERATORS_3: &[&str] = &["===", "!==", "..<"];
const OPERATORS_2: &[&str] = &[
    "?.", "?:", "::", "->", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "..", "!!",
];
const OPERATORS_1: &[u8] = b"+-*/%=<>!(){}[],.;:?@";

/// Nested `${` template blocks deeper than this are lexed as plain string text.
const MAX_TEMPLATE_DEPTH: usize = 64;

/// Lazy iterator over the tokens of a source string.
#[derive(Debug, Clone)]
pub struct TokenIterator<'a> {
    source: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> TokenIterator<'a> {
    pub fn new(source: &'a str) -> Self {
        TokenIterator {
            source,
            pos: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for TokenIterator<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let len = self.source.len();
        if self.pos >= len {
            self.done = true;
            return Some(Token::new(TokenKind::EndOfFile, Span::empty_at(len), ""));
        }
        let start = self.pos;
        let (kind, end) = Scanner::new(self.source).scan_at(start, 0);
        debug_assert!(end > start, "scanner must make progress");
        self.pos = end;
        Some(Token::new(kind, Span::new(start, end), &self.source[start..end]))
    }
}

impl std::iter::FusedIterator for TokenIterator<'_> {}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
        }
    }

    fn byte(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn starts_with(&self, pos: usize, text: &str) -> bool {
        self.bytes[pos..].starts_with(text.as_bytes())
    }

    /// Scan one token starting at `pos` (which must be < len).
    ///
    /// Returns the token kind and its exclusive end offset. The end is always
    /// greater than `pos` and always on a char boundary.
    fn scan_at(&self, pos: usize, depth: usize) -> (TokenKind, usize) {
        let b = self.bytes[pos];
        match b {
            b' ' | b'\t' | 0x0c => {
                let mut end = pos + 1;
                while matches!(self.byte(end), Some(b' ' | b'\t' | 0x0c)) {
                    end += 1;
                }
                (TokenKind::Whitespace, end)
            }
            b'\n' => (TokenKind::Newline, pos + 1),
            b'\r' => {
                if self.byte(pos + 1) == Some(b'\n') {
                    (TokenKind::Newline, pos + 2)
                } else {
                    (TokenKind::Newline, pos + 1)
                }
            }
            b'/' if self.byte(pos + 1) == Some(b'/') => (TokenKind::LineComment, self.line_end(pos)),
            b'/' if self.byte(pos + 1) == Some(b'*') => self.scan_block_comment(pos),
            b'#' if pos == 0 && self.byte(1) == Some(b'!') => {
                (TokenKind::LineComment, self.line_end(pos))
            }
            b'"' => {
                if self.starts_with(pos, "\"\"\"") {
                    self.scan_raw_string(pos, depth)
                } else {
                    self.scan_string(pos, depth)
                }
            }
            b'\'' => self.scan_char(pos),
            b'`' => self.scan_backtick(pos),
            b'0'..=b'9' => self.scan_number(pos),
            b'.' if matches!(self.byte(pos + 1), Some(b'0'..=b'9')) => self.scan_number(pos),
            b'!' if self.is_negated_keyword(pos) => (TokenKind::Operator, pos + 3),
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.scan_identifier(pos),
            _ if b.is_ascii() => match self.operator_len(pos) {
                Some(len) => (TokenKind::Operator, pos + len),
                None => (TokenKind::Error(LexErrorKind::UnexpectedCharacter), pos + 1),
            },
            _ => self.scan_non_ascii(pos),
        }
    }

    /// Offset of the next `\n` or `\r` at or after `pos`, or the end of input.
    fn line_end(&self, pos: usize) -> usize {
        memchr2(b'\n', b'\r', &self.bytes[pos..])
            .map(|i| pos + i)
            .unwrap_or(self.bytes.len())
    }

    fn scan_block_comment(&self, pos: usize) -> (TokenKind, usize) {
        let mut depth = 0usize;
        let mut i = pos;
        while i < self.bytes.len() {
            if self.starts_with(i, "/*") {
                depth += 1;
                i += 2;
            } else if self.starts_with(i, "*/") {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return (TokenKind::BlockComment, i);
                }
            } else {
                i += 1;
            }
        }
        (
            TokenKind::Error(LexErrorKind::UnterminatedComment),
            self.bytes.len(),
        )
    }

    fn scan_string(&self, pos: usize, depth: usize) -> (TokenKind, usize) {
        let mut i = pos + 1;
        while let Some(b) = self.byte(i) {
            match b {
                b'"' => return (TokenKind::StringLiteral, i + 1),
                b'\\' => {
                    // The escaped byte may start a multi-byte char; its
                    // continuation bytes are never ASCII, so stepping one
                    // byte at a time stays correct.
                    i += if self.byte(i + 1).is_some_and(|n| n != b'\n' && n != b'\r') {
                        2
                    } else {
                        1
                    };
                }
                b'\n' | b'\r' => break,
                b'$' if self.byte(i + 1) == Some(b'{') && depth < MAX_TEMPLATE_DEPTH => {
                    match self.scan_template_block(i + 2, depth + 1, true) {
                        Ok(end) => i = end,
                        Err(end) => {
                            return (TokenKind::Error(LexErrorKind::UnterminatedString), end)
                        }
                    }
                }
                _ => i += 1,
            }
        }
        (TokenKind::Error(LexErrorKind::UnterminatedString), i)
    }

    fn scan_raw_string(&self, pos: usize, depth: usize) -> (TokenKind, usize) {
        let mut i = pos + 3;
        while i < self.bytes.len() {
            if self.starts_with(i, "\"\"\"") {
                let mut end = i + 3;
                // Extra quotes before the closing delimiter belong to the content.
                while self.byte(end) == Some(b'"') {
                    end += 1;
                }
                return (TokenKind::StringLiteral, end);
            }
            if self.starts_with(i, "${") && depth < MAX_TEMPLATE_DEPTH {
                match self.scan_template_block(i + 2, depth + 1, false) {
                    Ok(end) => {
                        i = end;
                        continue;
                    }
                    Err(_) => break,
                }
            }
            i += 1;
        }
        (
            TokenKind::Error(LexErrorKind::UnterminatedRawString),
            self.bytes.len(),
        )
    }

    /// Scan the inside of a `${ ... }` template block starting just past the
    /// `${`. Returns the offset just past the matching `}`, or the offset where
    /// scanning gave up: end of input, or for a `single_line` string the first
    /// newline outside nested brackets.
    fn scan_template_block(
        &self,
        mut pos: usize,
        depth: usize,
        single_line: bool,
    ) -> Result<usize, usize> {
        let mut braces = 1usize;
        let mut brackets = 0usize;
        while pos < self.bytes.len() {
            let (kind, end) = self.scan_at(pos, depth);
            match kind {
                TokenKind::Operator => match &self.source[pos..end] {
                    "{" => braces += 1,
                    "}" => {
                        braces -= 1;
                        if braces == 0 {
                            return Ok(end);
                        }
                    }
                    "(" | "[" => brackets += 1,
                    ")" | "]" => brackets = brackets.saturating_sub(1),
                    _ => {}
                },
                TokenKind::Newline if single_line && braces == 1 && brackets == 0 => {
                    return Err(pos);
                }
                TokenKind::Error(LexErrorKind::UnterminatedString) if single_line => {
                    return Err(end);
                }
                _ => {}
            }
            pos = end;
        }
        Err(self.bytes.len())
    }

    fn scan_char(&self, pos: usize) -> (TokenKind, usize) {
        let mut i = pos + 1;
        while let Some(b) = self.byte(i) {
            match b {
                b'\'' => return (TokenKind::CharLiteral, i + 1),
                b'\\' if self.byte(i + 1).is_some_and(|n| n != b'\n' && n != b'\r') => i += 2,
                b'\n' | b'\r' => break,
                _ => i += 1,
            }
        }
        (TokenKind::Error(LexErrorKind::UnterminatedChar), i)
    }

    fn scan_backtick(&self, pos: usize) -> (TokenKind, usize) {
        let mut i = pos + 1;
        while let Some(b) = self.byte(i) {
            match b {
                b'`' => return (TokenKind::Identifier, i + 1),
                b'\n' | b'\r' => break,
                _ => i += 1,
            }
        }
        (TokenKind::Error(LexErrorKind::UnterminatedBacktick), i)
    }

    fn scan_number(&self, pos: usize) -> (TokenKind, usize) {
        let mut i = pos;
        let mut is_float = false;

        let radix_digits = |i: usize, pred: fn(u8) -> bool| -> usize {
            let mut j = i;
            while self.byte(j).is_some_and(|b| pred(b) || b == b'_') {
                j += 1;
            }
            j
        };

        if self.byte(i) == Some(b'0') && matches!(self.byte(i + 1), Some(b'x' | b'X')) {
            i = radix_digits(i + 2, |b| b.is_ascii_hexdigit());
        } else if self.byte(i) == Some(b'0') && matches!(self.byte(i + 1), Some(b'b' | b'B')) {
            i = radix_digits(i + 2, |b| b == b'0' || b == b'1');
        } else {
            i = radix_digits(i, |b| b.is_ascii_digit());
            if self.byte(i) == Some(b'.') && matches!(self.byte(i + 1), Some(b'0'..=b'9')) {
                is_float = true;
                i = radix_digits(i + 1, |b| b.is_ascii_digit());
            }
            if matches!(self.byte(i), Some(b'e' | b'E')) {
                let mut j = i + 1;
                if matches!(self.byte(j), Some(b'+' | b'-')) {
                    j += 1;
                }
                if matches!(self.byte(j), Some(b'0'..=b'9')) {
                    is_float = true;
                    i = radix_digits(j, |b| b.is_ascii_digit());
                }
            }
            if matches!(self.byte(i), Some(b'f' | b'F')) {
                return (TokenKind::FloatLiteral, i + 1);
            }
        }

        if is_float {
            return (TokenKind::FloatLiteral, i);
        }
        match self.byte(i) {
            Some(b'L') => i += 1,
            Some(b'u' | b'U') => {
                i += 1;
                if self.byte(i) == Some(b'L') {
                    i += 1;
                }
            }
            _ => {}
        }
        (TokenKind::IntegerLiteral, i)
    }

    /// `!in` / `!is` followed by a non-identifier character.
    fn is_negated_keyword(&self, pos: usize) -> bool {
        (self.starts_with(pos, "!in") || self.starts_with(pos, "!is"))
            && !self.ident_continues_at(pos + 3)
    }

    fn ident_continues_at(&self, pos: usize) -> bool {
        match self.source.get(pos..).and_then(|rest| rest.chars().next()) {
            Some(c) => c == '_' || c.is_alphanumeric(),
            None => false,
        }
    }

    fn scan_identifier(&self, pos: usize) -> (TokenKind, usize) {
        let end = self.identifier_end(pos);
        let kind = if is_hard_keyword(&self.source[pos..end]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        (kind, end)
    }

    fn identifier_end(&self, pos: usize) -> usize {
        self.source[pos..]
            .char_indices()
            .find(|&(_, c)| !(c == '_' || c.is_alphanumeric()))
            .map(|(i, _)| pos + i)
            .unwrap_or(self.source.len())
    }

    fn operator_len(&self, pos: usize) -> Option<usize> {
        if OPERATORS_3.iter().any(|op| self.starts_with(pos, op)) {
            return Some(3);
        }
        if OPERATORS_2.iter().any(|op| self.starts_with(pos, op)) {
            return Some(2);
        }
        if OPERATORS_1.contains(&self.bytes[pos]) {
            return Some(1);
        }
        None
    }

    fn scan_non_ascii(&self, pos: usize) -> (TokenKind, usize) {
        let c = match self.source[pos..].chars().next() {
            Some(c) => c,
            None => return (TokenKind::Error(LexErrorKind::UnexpectedCharacter), pos + 1),
        };
        if c.is_alphabetic() {
            return self.scan_identifier(pos);
        }
        let end = pos + c.len_utf8();
        if c == '\u{feff}' || c.is_whitespace() {
            return (TokenKind::Whitespace, end);
        }
        (TokenKind::Error(LexErrorKind::UnexpectedCharacter), end)
    }
}
