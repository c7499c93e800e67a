// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parser configuration.

use ktwalk_core::config::{ParseConfig, DEFAULT_MAX_DEPTH};

/// Configuration options for parsing.
///
/// # Example
///
/// ```
/// use ktwalk_cst::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(32);
/// let parsed = parse_file_with_options("val x = ((1))", options);
/// assert!(parsed.diagnostics.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Maximum syntactic nesting (expressions, blocks, types, class
    /// bodies). Deeper regions are reported and skipped as `Error` nodes.
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&ParseConfig> for ParseOptions {
    fn from(config: &ParseConfig) -> Self {
        ParseOptions::new().with_max_depth(config.max_depth)
    }
}
