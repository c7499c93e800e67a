//! Command implementations for the ktwalk CLI.
//!
//! Each `run_*` function reads one or more source files, parses them, and
//! writes either human-readable lines or a JSON response to the given
//! writer. `main.rs` owns argument parsing, tracing setup and error
//! reporting; everything here is callable (and tested) without a process.
//!
//! ## Error Handling
//!
//! All functions return `Result<_, KtwalkError>`. Parse problems are not
//! errors: they are reported as diagnostics next to the normal output. The
//! only exception is `check --strict`, which turns diagnostics into
//! [`KtwalkError::DiagnosticsFound`] after the report has been written.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use ktwalk_core::config::{Config, OutputFormat};
use ktwalk_core::error::KtwalkError;
use ktwalk_core::output::{emit_response, Location, SCHEMA_VERSION};
use ktwalk_core::text::LineIndex;
use ktwalk_cst::{
    parse_file_with_options, prettify_diagnostic, tokenize, walk, Declaration,
    DeclarationCollector, Diagnostic, ElementPrinter, NodeIdGenerator, NodeKind, ParseOptions,
    Parsed, PrintStyle, SyntaxNode, WalkMode,
};

// ============================================================================
// Settings
// ============================================================================

/// Settings shared by every command: the config file, with flags applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub max_depth: usize,
    pub show_text: bool,
    /// `None` prints element text untruncated.
    pub max_text_width: Option<usize>,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        let width = config.output.max_text_width;
        Settings {
            format: config.output.format,
            max_depth: config.parse.max_depth,
            show_text: config.output.show_text,
            max_text_width: (width > 0).then_some(width),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new().with_max_depth(self.max_depth)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_config(&Config::default())
    }
}

/// Load `--config` if given, else `ktwalk.toml` from `dir` (or defaults).
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, KtwalkError> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(KtwalkError::file_not_found(path.display().to_string()));
            }
            Config::load(path)
        }
        None => Config::load_from_dir(dir),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Read a source file as UTF-8.
pub fn read_source(path: &Path) -> Result<String, KtwalkError> {
    let path_display = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            KtwalkError::invalid_args(format!("{path_display} is not valid UTF-8"))
        } else {
            KtwalkError::io(path_display.clone(), e)
        }
    })?;
    debug!(file = %path_display, bytes = source.len(), "read source");
    Ok(source)
}

fn write_failed(err: io::Error) -> KtwalkError {
    KtwalkError::io("<output>", err)
}

fn parse_source<'s>(source: &'s str, file: &str, settings: &Settings) -> Parsed<'s> {
    let parsed = parse_file_with_options(source, settings.parse_options());
    if parsed.has_errors() {
        warn!(file, count = parsed.diagnostics.len(), "source has diagnostics");
    }
    parsed
}

fn location(index: &LineIndex<'_>, file: &str, start: usize, end: usize) -> Location {
    let (line, col) = index.position(start);
    Location::new(file, line, col).with_span(start, end)
}

fn ok_status(diagnostics: usize) -> String {
    if diagnostics == 0 { "ok" } else { "diagnostics" }.to_string()
}

// ============================================================================
// tokens
// ============================================================================

/// One token in a [`TokensResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct TokenEntry {
    pub kind: &'static str,
    pub text: String,
    pub location: Location,
}

/// Response for `ktwalk tokens --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub tokens: Vec<TokenEntry>,
}

/// List the tokens of a file: span, kind and quoted text per line.
pub fn run_tokens(
    path: &Path,
    include_trivia: bool,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<(), KtwalkError> {
    let source = read_source(path)?;
    let file = path.display().to_string();
    let tokens: Vec<_> = tokenize(&source)
        .filter(|token| include_trivia || !token.is_trivia())
        .collect();

    match settings.format {
        OutputFormat::Text => {
            for token in &tokens {
                writeln!(out, "{} {} {:?}", token.span, token.kind, token.text)
                    .map_err(write_failed)?;
            }
        }
        OutputFormat::Json => {
            let index = LineIndex::new(&source);
            let errors = tokens.iter().filter(|t| t.is_error()).count();
            let response = TokensResponse {
                status: ok_status(errors),
                schema_version: SCHEMA_VERSION.to_string(),
                tokens: tokens
                    .iter()
                    .map(|token| TokenEntry {
                        kind: token.kind.name(),
                        text: token.text.to_string(),
                        location: location(&index, &file, token.span.start, token.span.end),
                    })
                    .collect(),
                file,
            };
            emit_response(&response, out).map_err(write_failed)?;
        }
    }
    Ok(())
}

// ============================================================================
// tree
// ============================================================================

/// One node in a [`TreeResponse`], flattened in pre-order.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    pub depth: usize,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// Response for `ktwalk tree --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct TreeResponse {
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub diagnostics: usize,
    pub nodes: Vec<TreeNode>,
}

/// Flatten a tree into pre-order entries with parent links.
pub fn flatten_tree(root: &SyntaxNode<'_>) -> Vec<TreeNode> {
    let mut ids = NodeIdGenerator::new();
    let mut nodes = Vec::new();
    let mut stack = vec![(root, 0usize, None)];
    while let Some((node, depth, parent)) = stack.pop() {
        let id = ids.next().as_u32();
        let span = node.span();
        nodes.push(TreeNode {
            id,
            parent,
            depth,
            kind: node.kind(),
            name: node.name().map(str::to_string),
            start: span.start,
            end: span.end,
        });
        let children: Vec<_> = node.child_nodes().collect();
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1, Some(id)));
        }
    }
    nodes
}

/// Dump the tree of a file: one indented line per node.
pub fn run_tree(path: &Path, settings: &Settings, out: &mut impl Write) -> Result<(), KtwalkError> {
    let source = read_source(path)?;
    let file = path.display().to_string();
    let parsed = parse_source(&source, &file, settings);

    match settings.format {
        OutputFormat::Text => out
            .write_all(parsed.root.debug_tree().as_bytes())
            .map_err(write_failed)?,
        OutputFormat::Json => {
            let response = TreeResponse {
                status: ok_status(parsed.diagnostics.len()),
                schema_version: SCHEMA_VERSION.to_string(),
                diagnostics: parsed.diagnostics.len(),
                nodes: flatten_tree(&parsed.root),
                file,
            };
            emit_response(&response, out).map_err(write_failed)?;
        }
    }
    Ok(())
}

// ============================================================================
// walk
// ============================================================================

/// Flags of `ktwalk walk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    pub mode: WalkMode,
    pub style: PrintStyle,
    pub declarations_only: bool,
    /// Print only the nodes the walk starts from.
    pub shallow: bool,
}

/// Response for `ktwalk walk --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct WalkResponse {
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub lines: usize,
    pub output: String,
}

fn print_walk<W: Write>(
    root: &SyntaxNode<'_>,
    settings: &Settings,
    options: WalkOptions,
    out: W,
) -> Result<(W, usize), KtwalkError> {
    let mut printer = ElementPrinter::new(out, options.style)
        .recursive(!options.shallow)
        .show_text(settings.show_text)
        .declarations_only(options.declarations_only)
        .max_text_width(settings.max_text_width);
    walk(root, &mut printer, options.mode);
    let lines = printer.lines();
    let out = printer.finish().map_err(write_failed)?;
    Ok((out, lines))
}

/// Run the element printer over a file.
pub fn run_walk(
    path: &Path,
    options: WalkOptions,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<(), KtwalkError> {
    let source = read_source(path)?;
    let file = path.display().to_string();
    let parsed = parse_source(&source, &file, settings);
    debug!(?options, "walking");

    match settings.format {
        OutputFormat::Text => {
            print_walk(&parsed.root, settings, options, out)?;
        }
        OutputFormat::Json => {
            let (buffer, lines) = print_walk(&parsed.root, settings, options, Vec::new())?;
            let response = WalkResponse {
                status: ok_status(parsed.diagnostics.len()),
                schema_version: SCHEMA_VERSION.to_string(),
                file,
                lines,
                output: String::from_utf8_lossy(&buffer).into_owned(),
            };
            emit_response(&response, out).map_err(write_failed)?;
        }
    }
    Ok(())
}

// ============================================================================
// outline
// ============================================================================

/// One declaration in an [`OutlineResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct OutlineEntry {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    pub depth: usize,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: Location,
}

/// Response for `ktwalk outline --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineResponse {
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub declarations: Vec<OutlineEntry>,
}

/// Short keyword-style label for a declaration kind.
pub fn outline_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::ClassDeclaration => "class",
        NodeKind::ObjectDeclaration => "object",
        NodeKind::FunctionDeclaration => "fun",
        NodeKind::SecondaryConstructor => "constructor",
        NodeKind::PropertyDeclaration => "property",
        NodeKind::TypeAlias => "typealias",
        NodeKind::EnumEntry => "entry",
        other => other.name(),
    }
}

fn outline_line(declaration: &Declaration<'_>, index: &LineIndex<'_>) -> String {
    let (line, col) = index.position(declaration.span.start);
    format!(
        "{:indent$}{} {} ({}:{})",
        "",
        outline_label(declaration.kind),
        declaration.name.unwrap_or("<anonymous>"),
        line,
        col,
        indent = declaration.depth * 2
    )
}

/// Print the declarations of a file, indented by nesting.
pub fn run_outline(path: &Path, settings: &Settings, out: &mut impl Write) -> Result<(), KtwalkError> {
    let source = read_source(path)?;
    let file = path.display().to_string();
    let parsed = parse_source(&source, &file, settings);
    let declarations = DeclarationCollector::collect(&parsed.root);
    let index = LineIndex::new(&source);

    match settings.format {
        OutputFormat::Text => {
            for declaration in &declarations {
                writeln!(out, "{}", outline_line(declaration, &index)).map_err(write_failed)?;
            }
        }
        OutputFormat::Json => {
            let response = OutlineResponse {
                status: ok_status(parsed.diagnostics.len()),
                schema_version: SCHEMA_VERSION.to_string(),
                declarations: declarations
                    .iter()
                    .map(|d| OutlineEntry {
                        id: d.id.as_u32(),
                        parent: d.parent.map(|p| p.as_u32()),
                        depth: d.depth,
                        kind: d.kind,
                        name: d.name.map(str::to_string),
                        location: location(&index, &file, d.span.start, d.span.end),
                    })
                    .collect(),
                file,
            };
            emit_response(&response, out).map_err(write_failed)?;
        }
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

/// One diagnostic in a [`CheckResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEntry {
    pub category: &'static str,
    pub message: String,
    pub location: Location,
}

/// Diagnostics of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<DiagnosticEntry>,
}

/// Response for `ktwalk check --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub status: String,
    pub schema_version: String,
    pub total: usize,
    pub files: Vec<FileReport>,
}

fn diagnostic_entry(diagnostic: &Diagnostic, index: &LineIndex<'_>, file: &str) -> DiagnosticEntry {
    let span = diagnostic.span();
    DiagnosticEntry {
        category: diagnostic.category(),
        message: diagnostic.message(),
        location: location(index, file, span.start, span.end),
    }
}

/// Parse every file and report its diagnostics with source context.
///
/// All files are read before anything is printed, so a missing file fails
/// the command without partial output. With `strict`, any diagnostic turns
/// into [`KtwalkError::DiagnosticsFound`] once the report is written.
pub fn run_check(
    paths: &[&Path],
    strict: bool,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<(), KtwalkError> {
    let sources = paths
        .iter()
        .map(|path| Ok((path.display().to_string(), read_source(path)?)))
        .collect::<Result<Vec<_>, KtwalkError>>()?;

    let mut reports = Vec::with_capacity(sources.len());
    let mut failed: Vec<(&str, usize)> = Vec::new();
    for (file, source) in &sources {
        let parsed = parse_file_with_options(source, settings.parse_options());
        let count = parsed.diagnostics.len();
        debug!(file = %file, count, "checked");
        if count > 0 {
            failed.push((file.as_str(), count));
        }
        match settings.format {
            OutputFormat::Text => {
                for diagnostic in &parsed.diagnostics {
                    writeln!(out, "{}", prettify_diagnostic(diagnostic, source, file))
                        .map_err(write_failed)?;
                }
                match count {
                    0 => writeln!(out, "{file}: ok"),
                    n => writeln!(out, "{file}: {n} diagnostic(s)"),
                }
                .map_err(write_failed)?;
            }
            OutputFormat::Json => {
                let index = LineIndex::new(source);
                reports.push(FileReport {
                    file: file.clone(),
                    diagnostics: parsed
                        .diagnostics
                        .iter()
                        .map(|d| diagnostic_entry(d, &index, file))
                        .collect(),
                });
            }
        }
    }

    let total: usize = failed.iter().map(|(_, count)| count).sum();
    if settings.format == OutputFormat::Json {
        let response = CheckResponse {
            status: ok_status(total),
            schema_version: SCHEMA_VERSION.to_string(),
            total,
            files: reports,
        };
        emit_response(&response, out).map_err(write_failed)?;
    }

    if strict && total > 0 {
        let files: Vec<_> = failed.iter().map(|(file, _)| *file).collect();
        return Err(KtwalkError::DiagnosticsFound {
            file: files.join(", "),
            count: total,
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
