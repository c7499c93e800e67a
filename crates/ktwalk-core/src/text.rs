//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values (chars), not bytes
//! - Line/column values of 0 are treated as 1
//!
//! A line ends at `\n`. A `\r\n` pair counts as one line break; the `\r` is
//! the last character of its line.

use crate::span::Span;

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds the content length, returns the position at the end
/// of the content. Offsets inside a multi-byte character resolve to that
/// character's column.
pub fn byte_offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, ch) in content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Convert 1-indexed line and column to a byte offset.
///
/// A column past the end of its line clamps to the line end; a line past the
/// end of the content returns the content length.
pub fn position_to_byte_offset(content: &str, line: u32, col: u32) -> usize {
    let line = line.max(1);
    let col = col.max(1);

    let line_start = match nth_line_start(content, line) {
        Some(start) => start,
        None => return content.len(),
    };

    let mut current_col = 1u32;
    for (j, c) in content[line_start..].char_indices() {
        if current_col == col || c == '\n' {
            return line_start + j;
        }
        current_col += 1;
    }
    content.len()
}

/// Byte offset of the start of 1-indexed line `line`, if the line exists.
fn nth_line_start(content: &str, line: u32) -> Option<usize> {
    if line <= 1 {
        return Some(0);
    }
    content
        .match_indices('\n')
        .nth((line - 2) as usize)
        .map(|(index, _)| index + 1)
}

/// The span of the line containing `offset`, excluding its terminating `\n`.
pub fn line_bounds(content: &str, offset: usize) -> Span {
    let offset = offset.min(content.len());
    let start = content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = content[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(content.len());
    Span::new(start, end)
}

/// Get the 1-indexed `(start_line, end_line)` range touched by a span.
///
/// An empty span reports the single line it sits on.
pub fn span_to_line_range(content: &str, span: &Span) -> (u32, u32) {
    let (start_line, _) = byte_offset_to_position(content, span.start);
    let last = if span.is_empty() {
        span.start
    } else {
        span.end - 1
    };
    let (end_line, _) = byte_offset_to_position(content, last);
    (start_line, end_line)
}

/// Precomputed line starts for repeated offset lookups over one text.
///
/// `byte_offset_to_position` is linear in the offset; collectors that map
/// many spans use this instead.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    content: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    /// Index the line starts of `content`.
    pub fn new(content: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(newline_offsets(content).map(|i| i + 1));
        LineIndex {
            content,
            line_starts,
        }
    }

    /// Number of lines (a trailing newline opens a final empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to 1-indexed line and column.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.content.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let col = self.content[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .count();
        ((line_idx + 1) as u32, (col + 1) as u32)
    }
}

fn newline_offsets(content: &str) -> impl Iterator<Item = usize> + '_ {
    content.match_indices('\n').map(|(i, _)| i)
}
