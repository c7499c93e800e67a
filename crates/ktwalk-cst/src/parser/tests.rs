// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use ktwalk_core::Span;

use crate::nodes::{NodeKind, SyntaxElement, SyntaxNode};
use crate::options::ParseOptions;
use crate::parse_file;
use crate::tokenizer::tokenize;

use super::{parse, parse_with_options, Diagnostic, Parsed};

// ============================================================================
// Helpers
// ============================================================================

fn parse_ok(source: &str) -> Parsed<'_> {
    let parsed = parse_file(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}\n{}",
        parsed.diagnostics,
        parsed.root.debug_tree()
    );
    assert_well_formed(&parsed.root, source);
    parsed
}

fn count(node: &SyntaxNode<'_>, kind: NodeKind) -> usize {
    node.descendants().filter(|n| n.kind() == kind).count()
}

fn find<'t, 'a>(node: &'t SyntaxNode<'a>, kind: NodeKind) -> &'t SyntaxNode<'a> {
    node.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind} in\n{}", node.debug_tree()))
}

fn names(node: &SyntaxNode<'_>, kind: NodeKind) -> Vec<String> {
    node.descendants()
        .filter(|n| n.kind() == kind)
        .map(|n| n.name().unwrap_or("").to_string())
        .collect()
}

/// Spans nest, children are contiguous, and the text matches the source.
fn assert_well_formed(root: &SyntaxNode<'_>, source: &str) {
    assert_eq!(root.kind(), NodeKind::File);
    assert_eq!(root.span(), Span::new(0, source.len()));
    assert_eq!(root.text(), source);
    for node in root.descendants() {
        let children = node.children();
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            assert_eq!(node.span(), Span::new(first.span().start, last.span().end));
        } else {
            assert!(node.span().is_empty());
        }
        for pair in children.windows(2) {
            assert_eq!(pair[0].span().end, pair[1].span().start, "gap in {}", node.kind());
        }
        assert_eq!(node.text_in(source), Some(node.text().as_str()));
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_function_with_parameters() {
    let parsed = parse_ok("fun add(a: Int, b: Int): Int { return a + b }");
    let function = parsed
        .root
        .first_child_of_kind(NodeKind::FunctionDeclaration)
        .expect("function");
    assert_eq!(function.name(), Some("add"));
    let params: Vec<_> = function.parameters().map(|p| p.name()).collect();
    assert_eq!(params, vec![Some("a"), Some("b")]);
    assert_eq!(function.children_of_kind(NodeKind::TypeReference).count(), 1);
    let body = function.body().expect("body");
    assert_eq!(body.kind(), NodeKind::Block);
    let ret = find(body, NodeKind::ReturnExpression);
    assert_eq!(find(ret, NodeKind::BinaryExpression).text(), "a + b");
}

#[test]
fn test_expression_body() {
    let parsed = parse_ok("fun twice(x: Int) = x * 2");
    let function = find(&parsed.root, NodeKind::FunctionDeclaration);
    let body = function.body().expect("body");
    assert_eq!(body.kind(), NodeKind::BinaryExpression);
    assert_eq!(body.text(), "x * 2");
}

#[test]
fn test_class_contains_function() {
    let parsed = parse_ok("class Foo { fun bar() {} }");
    let class = find(&parsed.root, NodeKind::ClassDeclaration);
    assert_eq!(class.name(), Some("Foo"));
    let body = class.body().expect("class body");
    assert_eq!(body.kind(), NodeKind::ClassBody);
    let functions: Vec<_> = body.children_of_kind(NodeKind::FunctionDeclaration).collect();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name(), Some("bar"));
}

#[test]
fn test_package_and_imports() {
    let source = "package a.b\n\nimport x.y.Z\nimport x.y.*\nimport x.y.W as V\n\nfun main() {}\n";
    let parsed = parse_ok(source);
    assert_eq!(count(&parsed.root, NodeKind::PackageDirective), 1);
    let imports: Vec<_> = parsed
        .root
        .children_of_kind(NodeKind::ImportDirective)
        .map(|n| n.text())
        .collect();
    assert_eq!(imports, vec!["import x.y.Z", "import x.y.*", "import x.y.W as V"]);
}

#[test]
fn test_class_members() {
    let source = "\
data class Point(val x: Int, val y: Int = 0) : Base(), Comparable<Point> {
    init { check(x >= 0) }
    constructor(v: Int) : this(v, v)
    val sum: Int
        get() = x + y
    companion object {
        const val ZERO = 0
    }
}
";
    let parsed = parse_ok(source);
    let class = find(&parsed.root, NodeKind::ClassDeclaration);
    assert_eq!(class.name(), Some("Point"));
    assert_eq!(find(class, NodeKind::ModifierList).text(), "data");
    let params: Vec<_> = class.parameters().map(|p| p.name()).collect();
    assert_eq!(params, vec![Some("x"), Some("y")]);
    assert_eq!(count(class, NodeKind::SuperTypeList), 1);
    assert_eq!(count(class, NodeKind::Initializer), 1);
    assert_eq!(names(class, NodeKind::SecondaryConstructor), vec!["constructor"]);
    assert_eq!(names(class, NodeKind::PropertyAccessor), vec!["get"]);
    let companion = find(class, NodeKind::ObjectDeclaration);
    assert_eq!(companion.name(), None);
    assert_eq!(names(companion, NodeKind::PropertyDeclaration), vec!["ZERO"]);
}

#[test]
fn test_enum_class() {
    let source = "enum class Color(val rgb: Int) {\n    RED(0xFF0000),\n    GREEN(0x00FF00);\n\n    fun hex() = rgb\n}\n";
    let parsed = parse_ok(source);
    assert_eq!(names(&parsed.root, NodeKind::EnumEntry), vec!["RED", "GREEN"]);
    assert_eq!(names(&parsed.root, NodeKind::FunctionDeclaration), vec!["hex"]);
}

#[test]
fn test_generic_extension_function() {
    let parsed = parse_ok("fun <T> List<T>.second(): T = this[1]");
    let function = find(&parsed.root, NodeKind::FunctionDeclaration);
    assert_eq!(function.name(), Some("second"));
    assert_eq!(count(function, NodeKind::TypeParameterList), 1);
    let receiver = function
        .first_child_of_kind(NodeKind::TypeReference)
        .expect("receiver");
    assert_eq!(receiver.text(), "List<T>");
    assert_eq!(function.body().map(SyntaxNode::kind), Some(NodeKind::IndexExpression));
}

#[test]
fn test_annotation_and_modifiers() {
    let parsed = parse_ok("@Deprecated(\"old\")\nprivate inline fun old() {}");
    let function = find(&parsed.root, NodeKind::FunctionDeclaration);
    let modifiers = function
        .first_child_of_kind(NodeKind::ModifierList)
        .expect("modifiers");
    assert_eq!(modifiers.children_of_kind(NodeKind::Annotation).count(), 1);
    assert_eq!(modifiers.text(), "@Deprecated(\"old\")\nprivate inline");
}

#[test]
fn test_type_alias_and_object() {
    let parsed = parse_ok("typealias Handler = (String) -> Unit\nobject Registry : Base() {}\n");
    assert_eq!(names(&parsed.root, NodeKind::TypeAlias), vec!["Handler"]);
    assert_eq!(names(&parsed.root, NodeKind::ObjectDeclaration), vec!["Registry"]);
}

#[test]
fn test_destructuring_property() {
    let parsed = parse_ok("val (a, b) = pair");
    let property = find(&parsed.root, NodeKind::PropertyDeclaration);
    assert_eq!(property.name(), None);
    assert_eq!(names(property, NodeKind::Parameter), vec!["a", "b"]);
}

#[test]
fn test_backtick_name() {
    let parsed = parse_ok("fun `test name`() {}");
    assert_eq!(names(&parsed.root, NodeKind::FunctionDeclaration), vec!["test name"]);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    let parsed = parse_ok("val x = a + b * c");
    assert_eq!(
        parsed.root.debug_tree(),
        "\
File [0, 17)
  PropertyDeclaration [0, 17) x
    BinaryExpression [8, 17)
      NameReference [8, 9) a
      BinaryExpression [12, 17)
        NameReference [12, 13) b
        NameReference [16, 17) c
"
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let parsed = parse_ok("val x = a || b && c");
    let outer = find(&parsed.root, NodeKind::BinaryExpression);
    let operands: Vec<_> = outer.child_nodes().map(|n| n.text()).collect();
    assert_eq!(operands, vec!["a", "b && c"]);
}

#[test]
fn test_left_associative() {
    let parsed = parse_ok("val x = a - b - c");
    let outer = find(&parsed.root, NodeKind::BinaryExpression);
    let operands: Vec<_> = outer.child_nodes().map(|n| n.text()).collect();
    assert_eq!(operands, vec!["a - b", "c"]);
}

#[test]
fn test_newline_rules() {
    let source = "val x = a\n+ b\nval y = c\n    .d()\nval z = e\n    || f\n";
    let parsed = parse_ok(source);
    let kinds: Vec<_> = parsed.root.child_nodes().map(SyntaxNode::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::PropertyDeclaration,
            NodeKind::PrefixExpression,
            NodeKind::PropertyDeclaration,
            NodeKind::PropertyDeclaration,
        ]
    );
    let y = parsed.root.child_nodes().nth(2).expect("y");
    assert_eq!(find(y, NodeKind::CallExpression).text(), "c\n    .d()");
    let z = parsed.root.child_nodes().nth(3).expect("z");
    assert_eq!(find(z, NodeKind::BinaryExpression).text(), "e\n    || f");
}

#[test]
fn test_newlines_ignored_inside_parens() {
    let parsed = parse_ok("val x = (a\n    + b)\nval y = f(\n    1,\n    2\n)\n");
    assert_eq!(count(&parsed.root, NodeKind::BinaryExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::ValueArgument), 2);
}

#[test]
fn test_trailing_lambdas() {
    let parsed = parse_ok("val r = list.map { x -> x * 2 }.filter { it > 0 }");
    assert_eq!(count(&parsed.root, NodeKind::LambdaExpression), 2);
    assert_eq!(count(&parsed.root, NodeKind::CallExpression), 2);
    let first = find(&parsed.root, NodeKind::LambdaExpression);
    assert_eq!(first.text(), "{ x -> x * 2 }");
    assert_eq!(names(first, NodeKind::Parameter), vec!["x"]);
    let outer = find(&parsed.root, NodeKind::CallExpression);
    assert_eq!(outer.child_nodes().last().map(SyntaxNode::text), Some("{ it > 0 }".to_string()));
}

#[test]
fn test_call_with_arguments_and_lambda() {
    let parsed = parse_ok("val r = run(name = \"x\", *rest) { }");
    let call = find(&parsed.root, NodeKind::CallExpression);
    let kinds: Vec<_> = call.child_nodes().map(SyntaxNode::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::NameReference,
            NodeKind::ValueArgumentList,
            NodeKind::LambdaExpression,
        ]
    );
    assert_eq!(count(call, NodeKind::ValueArgument), 2);
}

#[test]
fn test_lambda_with_typed_parameters() {
    let parsed = parse_ok("val sum = { a: Int, b: Int -> a + b }");
    let lambda = find(&parsed.root, NodeKind::LambdaExpression);
    assert_eq!(names(lambda, NodeKind::Parameter), vec!["a", "b"]);
    assert_eq!(count(lambda, NodeKind::TypeReference), 2);
}

#[test]
fn test_generic_call_and_comparison() {
    let parsed = parse_ok("val l = listOf<Int>(1)\nval c = a < b\n");
    assert_eq!(count(&parsed.root, NodeKind::TypeArgumentList), 1);
    assert_eq!(count(&parsed.root, NodeKind::CallExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::BinaryExpression), 1);
}

#[test]
fn test_safe_calls_casts_and_checks() {
    let source = "val n = a?.b ?: 0\nval c = x as? String\nval d = x !is Int\nval e = y!!\n";
    let parsed = parse_ok(source);
    assert_eq!(count(&parsed.root, NodeKind::QualifiedExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::CastExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::TypeCheckExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::PostfixExpression), 1);
}

#[test]
fn test_anonymous_function_and_reference() {
    let parsed = parse_ok("val f = fun(x: Int): Int { return x }\nval r = ::println\n");
    let function = find(&parsed.root, NodeKind::AnonymousFunction);
    assert_eq!(names(function, NodeKind::Parameter), vec!["x"]);
    assert_eq!(function.body().map(SyntaxNode::kind), Some(NodeKind::Block));
    assert_eq!(find(&parsed.root, NodeKind::QualifiedExpression).text(), "::println");
}

#[test]
fn test_labeled_return() {
    let parsed = parse_ok("fun f() { list.forEach { if (it) return@forEach } }");
    assert_eq!(find(&parsed.root, NodeKind::ReturnExpression).text(), "return@forEach");
}

#[test]
fn test_assignments() {
    let parsed = parse_ok("fun f() {\n    x = 1\n    y += 2\n    a[0] = 3\n}");
    assert_eq!(count(&parsed.root, NodeKind::Assignment), 3);
}

#[test]
fn test_string_templates_are_single_nodes() {
    let parsed = parse_ok("val s = \"sum: ${a + b} and $c\"");
    assert_eq!(count(&parsed.root, NodeKind::StringTemplate), 1);
    assert_eq!(count(&parsed.root, NodeKind::BinaryExpression), 0);
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_control_flow() {
    let source = "\
fun f(x: Int): String {
    if (x > 0) return \"pos\" else if (x < 0) return \"neg\"
    for (i in 0 until 10) println(i)
    while (x > 0) { x-- }
    do { x++ } while (x < 10)
    val y = when (x) {
        1, 2 -> \"small\"
        in 3..9 -> \"medium\"
        is Int -> \"int\"
        else -> \"large\"
    }
    return try { y } catch (e: Exception) { \"err\" } finally { cleanup() }
}
";
    let parsed = parse_ok(source);
    let root = &parsed.root;
    assert_eq!(count(root, NodeKind::IfExpression), 2);
    assert_eq!(count(root, NodeKind::ForExpression), 1);
    assert_eq!(count(root, NodeKind::WhileExpression), 1);
    assert_eq!(count(root, NodeKind::DoWhileExpression), 1);
    assert_eq!(count(root, NodeKind::WhenExpression), 1);
    assert_eq!(count(root, NodeKind::WhenEntry), 4);
    assert_eq!(count(root, NodeKind::TryExpression), 1);
    let catch = find(root, NodeKind::CatchClause);
    assert_eq!(names(catch, NodeKind::Parameter), vec!["e"]);
    assert_eq!(catch.body().map(SyntaxNode::text), Some("{ \"err\" }".to_string()));
    assert_eq!(count(root, NodeKind::FinallyClause), 1);
    let for_loop = find(root, NodeKind::ForExpression);
    assert_eq!(names(for_loop, NodeKind::Parameter), vec!["i"]);
}

#[test]
fn test_when_with_subject_declaration() {
    let parsed = parse_ok("val r = when (val v = read()) {\n    null -> 0\n    else -> v\n}");
    let when = find(&parsed.root, NodeKind::WhenExpression);
    assert_eq!(names(when, NodeKind::PropertyDeclaration), vec!["v"]);
    assert_eq!(count(when, NodeKind::WhenEntry), 2);
}

#[test]
fn test_if_else_on_separate_lines() {
    let parsed = parse_ok("fun f() {\n    if (a) {\n        b()\n    }\n    else {\n        c()\n    }\n}");
    assert_eq!(count(&parsed.root, NodeKind::IfExpression), 1);
    assert_eq!(count(&parsed.root, NodeKind::Block), 3);
}

// ============================================================================
// Trivia and spans
// ============================================================================

#[test]
fn test_leading_comment_belongs_to_parent() {
    let source = "// greeting\nfun hi() {}\n";
    let parsed = parse_ok(source);
    let function = find(&parsed.root, NodeKind::FunctionDeclaration);
    assert_eq!(function.span(), Span::new(12, 23));
    assert_eq!(function.text(), "fun hi() {}");
    let first = parsed.root.children().first().and_then(SyntaxElement::as_token);
    assert_eq!(first.map(|t| t.text), Some("// greeting"));
}

#[test]
fn test_empty_input() {
    let parsed = parse_ok("");
    assert_eq!(parsed.root.children().len(), 1);
    assert_eq!(parsed.root.span(), Span::new(0, 0));
}

#[test]
fn test_byte_order_mark_is_trivia() {
    let source = "\u{feff}val x = 1";
    let parsed = parse_ok(source);
    let property = find(&parsed.root, NodeKind::PropertyDeclaration);
    assert_eq!(property.span().start, 3);
}

#[test]
fn test_parse_accepts_stream_without_eof() {
    let tokens: Vec<_> = tokenize("val x = 1").filter(|t| !t.is_eof()).collect();
    let parsed = parse(tokens);
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.root.span(), Span::new(0, 9));
    assert_eq!(parsed.root.text(), "val x = 1");
}

// ============================================================================
// Errors and recovery
// ============================================================================

#[test]
fn test_unterminated_string() {
    let source = "val s = \"abc";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    assert_eq!(parsed.lex_errors().count(), 1);
    assert_eq!(parsed.parse_errors().count(), 0);
    let error = find(&parsed.root, NodeKind::Error);
    assert_eq!(error.text(), "\"abc");
}

#[test]
fn test_unterminated_template_keeps_later_lines() {
    let source = "val s = \"${a\nfun later() {}\nclass AfterToo\n";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    let spans: Vec<_> = parsed.lex_errors().map(|e| e.span).collect();
    assert_eq!(spans, vec![Span::new(8, 12)]);
    assert_eq!(names(&parsed.root, NodeKind::FunctionDeclaration), vec!["later"]);
    assert_eq!(names(&parsed.root, NodeKind::ClassDeclaration), vec!["AfterToo"]);
}

#[test]
fn test_stray_closing_paren() {
    let source = "val a = 1\n)\nval b = 2\n";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    assert_eq!(parsed.parse_errors().count(), 1);
    let error = parsed.parse_errors().next().expect("error");
    assert_eq!(error.span, Span::new(10, 11));
    assert_eq!(error.found, "Operator `)`");
    assert_eq!(names(&parsed.root, NodeKind::PropertyDeclaration), vec!["a", "b"]);
    assert!(parsed
        .root
        .descendants()
        .any(|n| n.is_error() && n.text() == ")"));
}

#[test]
fn test_missing_closing_paren() {
    let source = "fun f() {\n    g(1, 2\n}\nfun h() {}\n";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    let first = parsed.parse_errors().next().expect("error");
    assert_eq!(first.expected, "`)`");
    assert!(first.span.is_empty());
    assert_eq!(first.span.start, source.find("2\n").map(|i| i + 1).unwrap_or(0));
    assert_eq!(names(&parsed.root, NodeKind::FunctionDeclaration), vec!["f", "h"]);
}

#[test]
fn test_stray_closing_brace_at_top_level() {
    let source = "}\nval a = 1\n";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    assert_eq!(parsed.parse_errors().count(), 1);
    assert_eq!(names(&parsed.root, NodeKind::PropertyDeclaration), vec!["a"]);
}

#[test]
fn test_diagnostics_sorted_by_position() {
    let source = "val a = (1\nval b = \"x\nval c = )\n";
    let parsed = parse_file(source);
    assert_well_formed(&parsed.root, source);
    assert!(parsed.diagnostics.iter().any(Diagnostic::is_lex));
    assert!(parsed.diagnostics.iter().any(|d| !d.is_lex()));
    let starts: Vec<_> = parsed.diagnostics.iter().map(|d| d.span().start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn test_depth_limit() {
    let source = "fun f() { g { h { i { j { k { } } } } } }";
    let options = ParseOptions::new().with_max_depth(8);
    let parsed = parse_with_options(tokenize(source), options);
    assert_well_formed(&parsed.root, source);
    let errors: Vec<_> = parsed.parse_errors().collect();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].expected, "at most 8 levels of nesting");
    assert!(parsed.root.descendants().any(|n| n.is_error()));
}

fn nesting_errors(parsed: &Parsed<'_>) -> usize {
    parsed
        .parse_errors()
        .filter(|e| e.expected == "at most 128 levels of nesting")
        .count()
}

#[test]
fn test_depth_limit_nested_loops() {
    for source in [
        "do ".repeat(20_000),
        "while (a) ".repeat(20_000),
        "for (x in xs) ".repeat(20_000),
    ] {
        let parsed = parse_file(&source);
        assert_well_formed(&parsed.root, &source);
        assert!(nesting_errors(&parsed) >= 1, "{:?}", &source[..12]);
    }
}

#[test]
fn test_depth_limit_nested_destructuring() {
    let source = format!("val {}", "(".repeat(20_000));
    let parsed = parse_file(&source);
    assert_well_formed(&parsed.root, &source);
    assert_eq!(nesting_errors(&parsed), 1);

    let source = format!("val x = {{ {} -> 1 }}", "(".repeat(20_000));
    let parsed = parse_file(&source);
    assert_eq!(parsed.root.text(), source);
    assert!(nesting_errors(&parsed) >= 1);
}

#[test]
fn test_depth_limit_operator_chain() {
    let source = format!("val x = {}\nfun after() {{}}\n", vec!["1"; 100_000].join(" + "));
    let parsed = parse_file(&source);
    assert_eq!(parsed.root.text(), source);
    assert!(nesting_errors(&parsed) >= 1);
    assert_eq!(names(&parsed.root, NodeKind::FunctionDeclaration), vec!["after"]);

    let source = format!("val y = a{}", ".b()".repeat(50_000));
    let parsed = parse_file(&source);
    assert_eq!(parsed.root.text(), source);
    assert!(nesting_errors(&parsed) >= 1);
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let source = format!("val x = {}1{}", "(".repeat(40), ")".repeat(40));
    let parsed = parse_ok(&source);
    assert_eq!(count(&parsed.root, NodeKind::ParenthesizedExpression), 40);
}

#[test]
fn test_garbage_never_panics() {
    for source in [
        "fun",
        "class",
        "val = ",
        "fun f(",
        "if (",
        "when {",
        "a.b.",
        "{{{{",
        ")))",
        "fun f() = ",
        "class A : ",
        "x as",
        "@",
        "enum class E { A, }",
        "val x: List<",
        "try",
        "\"${",
    ] {
        let parsed = parse_file(source);
        assert_well_formed(&parsed.root, source);
    }
}
