// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the ktwalk-cst parser.
//!
//! These tests verify that `parse(code).root.text() == code` and that the
//! spans of the resulting tree are well formed for every fixture in
//! `tests/fixtures/`.
//!
//! # Adding New Tests
//!
//! Drop a `.kt` file into `tests/fixtures/`. `roundtrip_all_fixtures` picks
//! it up automatically; add a `roundtrip_fixture_<name>` test when the file
//! deserves its own assertions.

use std::path::PathBuf;

use ktwalk_cst::{
    parse_file, prettify_diagnostic, DeclarationCollector, ElementPrinter, NodeKind, PrintStyle,
    SyntaxNode,
};

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn load_fixture(name: &str) -> String {
    let path = fixture_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

fn all_fixtures() -> impl Iterator<Item = (PathBuf, String)> {
    let mut paths: Vec<PathBuf> = fixture_dir()
        .read_dir()
        .expect("read_dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "kt"))
        .collect();
    paths.sort();
    paths.into_iter().map(|path| {
        let contents = std::fs::read_to_string(&path).expect("reading file");
        (path, contents)
    })
}

/// Parse without diagnostics and check losslessness and span nesting.
fn assert_roundtrip(input: &str, label: &str) {
    let parsed = parse_file(input);
    if let Some(diagnostic) = parsed.diagnostics.first() {
        panic!("{}", prettify_diagnostic(diagnostic, input, label));
    }
    assert_eq!(parsed.root.text(), input, "{label}: text differs");
    assert_eq!(parsed.root.span().end, input.len(), "{label}: root span");
    check_spans(&parsed.root, label);
}

fn check_spans(node: &SyntaxNode<'_>, label: &str) {
    let children = node.children();
    for pair in children.windows(2) {
        assert_eq!(
            pair[0].span().end,
            pair[1].span().start,
            "{label}: gap between children of {}",
            node.kind()
        );
    }
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        assert_eq!(node.span().start, first.span().start, "{label}: {}", node.kind());
        assert_eq!(node.span().end, last.span().end, "{label}: {}", node.kind());
    }
    for child in node.child_nodes() {
        assert!(node.span().contains(&child.span()));
        check_spans(child, label);
    }
}

fn print_declarations(source: &str) -> String {
    let parsed = parse_file(source);
    let mut printer = ElementPrinter::new(Vec::new(), PrintStyle::Kinds).declarations_only(true);
    parsed.root.accept_children(&mut printer);
    String::from_utf8(printer.finish().expect("write")).expect("utf8")
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_all_fixtures() {
    let mut seen = 0;
    for (path, input) in all_fixtures() {
        assert_roundtrip(&input, &path.display().to_string());
        seen += 1;
    }
    assert!(seen >= 3, "expected fixtures in {:?}", fixture_dir());
}

#[test]
fn roundtrip_fixture_lambda() {
    let source = load_fixture("lambda.kt");
    assert_roundtrip(&source, "lambda.kt");

    let parsed = parse_file(&source);
    let functions: Vec<_> = parsed
        .root
        .children_of_kind(NodeKind::FunctionDeclaration)
        .map(|f| f.name().unwrap_or(""))
        .collect();
    assert_eq!(functions, vec!["simple_lambda", "two_args_lambda", "shorthand_lambda", "main"]);

    let lambdas: Vec<_> = parsed
        .root
        .descendants()
        .filter(|n| n.kind() == NodeKind::LambdaExpression)
        .map(|n| n.parameters().count())
        .collect();
    assert_eq!(lambdas, vec![0, 2, 2, 0]);
}

#[test]
fn roundtrip_fixture_kotlin_parser() {
    let source = load_fixture("kotlin_parser.kt");
    assert_roundtrip(&source, "kotlin_parser.kt");

    let parsed = parse_file(&source);
    assert_eq!(parsed.root.children_of_kind(NodeKind::ImportDirective).count(), 10);
    let objects = parsed
        .root
        .descendants()
        .filter(|n| n.kind() == NodeKind::ObjectDeclaration)
        .count();
    assert_eq!(objects, 3);
}

#[test]
fn roundtrip_fixture_shapes() {
    let source = load_fixture("shapes.kt");
    assert_roundtrip(&source, "shapes.kt");

    let decls = DeclarationCollector::collect(&parse_file(&source).root);
    let top: Vec<_> = decls
        .iter()
        .filter(|d| d.depth == 0)
        .map(|d| d.name.unwrap_or("<anonymous>"))
        .collect();
    assert_eq!(
        top,
        vec!["Shape", "Circle", "Rect", "Unit", "Registry", "Predicate", "largest", "describe", "main"]
    );
    let entries: Vec<_> = decls
        .iter()
        .filter(|d| d.kind == NodeKind::EnumEntry)
        .filter_map(|d| d.name)
        .collect();
    assert_eq!(entries, vec!["METER", "FOOT"]);
}

// =============================================================================
// Visitor output on fixtures
// =============================================================================

#[test]
fn declarations_of_kotlin_parser() {
    let output = print_declarations(&load_fixture("kotlin_parser.kt"));
    assert_eq!(
        output,
        "\
Method: main
Method: visitKtElement
Method: visitKtFile
Method: visitKtElement
Method: visitKtFile
Method: visitElement
Method: visitClass
Method: visitNamedFunction
"
    );
}

#[test]
fn declarations_of_shapes() {
    let output = print_declarations(&load_fixture("shapes.kt"));
    let classes: Vec<_> = output.lines().filter(|l| l.starts_with("Class: ")).collect();
    assert_eq!(
        classes,
        vec!["Class: Shape", "Class: Circle", "Class: Rect", "Class: Unit"]
    );
    assert!(output.lines().any(|l| l == "Method: largest"));
}

#[test]
fn element_lines_cover_every_node() {
    let source = load_fixture("lambda.kt");
    let parsed = parse_file(&source);
    let mut printer = ElementPrinter::new(Vec::new(), PrintStyle::Text);
    parsed.root.accept(&mut printer);
    let lines = printer.lines();
    let out = String::from_utf8(printer.finish().expect("write")).expect("utf8");
    assert!(out.starts_with("File: \n\nfun simple_lambda(){"));
    assert_eq!(lines, parsed.root.descendants().count());
}
