//! Core infrastructure for ktwalk.
//!
//! This crate provides language-agnostic infrastructure:
//! - Byte spans shared by tokens, nodes, and diagnostics
//! - Text utilities for byte offset and line:column conversion
//! - Configuration loading (`ktwalk.toml`)
//! - Error types and error codes
//! - JSON output types for CLI responses

pub mod config;
pub mod error;
pub mod output;
pub mod span;
pub mod text;

pub use span::Span;
