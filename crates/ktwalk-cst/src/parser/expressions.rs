// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions.
//!
//! Binary operators use precedence climbing. From lowest to highest:
//!
//! | level | operators                     |
//! |-------|-------------------------------|
//! | 1     | `\|\|`                        |
//! | 2     | `&&`                          |
//! | 3     | `==` `!=` `===` `!==`         |
//! | 4     | `<` `>` `<=` `>=`             |
//! | 5     | `in` `!in` `is` `!is`         |
//! | 6     | `?:`                          |
//! | 7     | infix function calls          |
//! | 8     | `..` `..<`                    |
//! | 9     | `+` `-`                       |
//! | 10    | `*` `/` `%`                   |
//!
//! Above those sit `as`/`as?` casts, prefix operators and postfix chains
//! (calls, indexing, member access, `!!`, `++`, `--`).
//!
//! A newline ends an expression unless the next token is `&&`, `||`, `?:`,
//! `.` or `?.`. Calls, indexing and trailing lambdas must start on the line
//! of their target. Inside parentheses and brackets newlines are ignored.

use crate::nodes::NodeKind;
use crate::tokenizer::TokenKind;

use super::declarations::ParameterStyle;
use super::Parser;

#[derive(Debug, Clone, Copy)]
struct BinaryOperator {
    precedence: u8,
    kind: NodeKind,
}

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self) {
        if !self.enter() {
            return;
        }
        self.parse_binary(1);
        self.leave();
    }

    fn binary_operator(&self) -> Option<BinaryOperator> {
        let token = self.current();
        let newline = self.newline_before();
        let (precedence, kind) = match token.kind {
            TokenKind::Operator => match token.text {
                "||" => (1, NodeKind::BinaryExpression),
                "&&" => (2, NodeKind::BinaryExpression),
                "==" | "!=" | "===" | "!==" => (3, NodeKind::BinaryExpression),
                "<" | ">" | "<=" | ">=" => (4, NodeKind::BinaryExpression),
                "!in" => (5, NodeKind::BinaryExpression),
                "!is" => (5, NodeKind::TypeCheckExpression),
                "?:" => (6, NodeKind::BinaryExpression),
                ".." | "..<" => (8, NodeKind::BinaryExpression),
                "+" | "-" => (9, NodeKind::BinaryExpression),
                "*" | "/" | "%" => (10, NodeKind::BinaryExpression),
                _ => return None,
            },
            TokenKind::Keyword => match token.text {
                "in" => (5, NodeKind::BinaryExpression),
                "is" => (5, NodeKind::TypeCheckExpression),
                _ => return None,
            },
            TokenKind::Identifier if !newline && self.can_start_expression_at(1) => {
                (7, NodeKind::BinaryExpression)
            }
            _ => return None,
        };
        if newline && !matches!(token.text, "||" | "&&" | "?:") {
            return None;
        }
        Some(BinaryOperator { precedence, kind })
    }

    fn parse_binary(&mut self, min_precedence: u8) {
        let checkpoint = self.checkpoint();
        self.parse_cast();
        let mut links = 0;
        while let Some(op) = self.binary_operator() {
            if op.precedence < min_precedence || !self.enter() {
                break;
            }
            links += 1;
            self.start_node_at(checkpoint, op.kind);
            self.bump();
            if op.kind == NodeKind::TypeCheckExpression {
                self.parse_type();
            } else {
                self.parse_binary(op.precedence + 1);
            }
            self.finish_node();
        }
        self.leave_chain(links);
    }

    fn parse_cast(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_prefix();
        let mut links = 0;
        while self.at_keyword("as") && !self.newline_before() {
            if !self.enter() {
                break;
            }
            links += 1;
            self.start_node_at(checkpoint, NodeKind::CastExpression);
            self.bump();
            if self.at_op("?") && self.adjacent() {
                self.bump();
            }
            self.parse_type();
            self.finish_node();
        }
        self.leave_chain(links);
    }

    fn parse_prefix(&mut self) {
        let token = self.current();
        if token.kind == TokenKind::Operator && matches!(token.text, "-" | "+" | "!" | "++" | "--") {
            if !self.enter() {
                return;
            }
            self.start_node(NodeKind::PrefixExpression);
            self.bump();
            self.parse_prefix();
            self.finish_node();
            self.leave();
        } else {
            self.parse_postfix();
        }
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        let mut last = self.parse_primary();
        let mut links = 0;
        loop {
            let token = self.current();
            if token.kind != TokenKind::Operator {
                break;
            }
            let same_line = !self.newline_before();
            let kind = match token.text {
                "++" | "--" | "!!" if same_line => NodeKind::PostfixExpression,
                "." | "?." | "::" => NodeKind::QualifiedExpression,
                "(" if same_line => NodeKind::CallExpression,
                "[" if same_line => NodeKind::IndexExpression,
                "{" if same_line && Self::takes_trailing_lambda(last) => NodeKind::CallExpression,
                "<" if same_line && self.looks_like_call_type_arguments() => {
                    NodeKind::CallExpression
                }
                _ => break,
            };
            if !self.enter() {
                break;
            }
            links += 1;
            self.start_node_at(checkpoint, kind);
            match token.text {
                "." | "?." | "::" => {
                    self.bump();
                    self.parse_selector();
                }
                "(" => {
                    self.parse_value_arguments();
                    self.parse_trailing_lambda();
                }
                "[" => self.parse_index_suffix(),
                "{" => self.parse_lambda(),
                "<" => {
                    self.parse_type_arguments();
                    if self.at_op("(") && !self.newline_before() {
                        self.parse_value_arguments();
                    }
                    self.parse_trailing_lambda();
                }
                _ => self.bump(),
            }
            self.finish_node();
            last = Some(kind);
        }
        self.leave_chain(links);
    }

    fn takes_trailing_lambda(last: Option<NodeKind>) -> bool {
        matches!(
            last,
            Some(NodeKind::NameReference | NodeKind::QualifiedExpression | NodeKind::CallExpression)
        )
    }

    fn parse_trailing_lambda(&mut self) {
        if self.at_op("{") && !self.newline_before() {
            self.parse_lambda();
        }
    }

    /// `<` starts explicit type arguments of a call, `f<Int>(x)`, rather
    /// than a comparison.
    fn looks_like_call_type_arguments(&self) -> bool {
        let Some(end) = self.skip_angle(0) else {
            return false;
        };
        let next = self.nth(end);
        ((next.is_op("(") || next.is_op("{")) && !self.newline_before_nth(end)) || next.is_op("::")
    }

    /// Member name after `.`, `?.` or `::`.
    fn parse_selector(&mut self) {
        let token = self.current();
        if token.is_identifier() || token.is_keyword("class") {
            self.start_node(NodeKind::NameReference);
            self.bump();
            self.builder.set_name(super::identifier_name(token.text));
            self.finish_node();
        } else {
            self.error_missing("member name");
        }
    }

    fn parse_index_suffix(&mut self) {
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list("]", "index", Self::parse_expression);
            p.expect_op("]");
        });
    }

    pub(super) fn parse_value_arguments(&mut self) {
        self.start_node(NodeKind::ValueArgumentList);
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(")", "argument", Self::parse_value_argument);
            p.expect_op(")");
        });
        self.finish_node();
    }

    fn parse_value_argument(&mut self) {
        self.start_node(NodeKind::ValueArgument);
        if self.at_identifier() && self.nth_op(1, "=") {
            self.bump();
            self.bump();
        }
        if self.at_op("*") {
            self.bump();
        }
        self.parse_expression();
        self.finish_node();
    }

    pub(super) fn can_start_expression_at(&self, n: usize) -> bool {
        let token = self.nth(n);
        match token.kind {
            kind if kind.is_literal() => true,
            TokenKind::Identifier | TokenKind::Error(_) => true,
            TokenKind::Keyword => matches!(
                token.text,
                "true"
                    | "false"
                    | "null"
                    | "this"
                    | "super"
                    | "if"
                    | "when"
                    | "try"
                    | "return"
                    | "break"
                    | "continue"
                    | "throw"
                    | "fun"
                    | "object"
            ),
            TokenKind::Operator => {
                matches!(token.text, "(" | "{" | "-" | "+" | "!" | "++" | "--" | "::")
            }
            _ => false,
        }
    }

    /// Returns the kind of node produced, if any.
    fn parse_primary(&mut self) -> Option<NodeKind> {
        let token = self.current();
        let kind = match token.kind {
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral | TokenKind::CharLiteral => {
                self.leaf(NodeKind::Literal);
                NodeKind::Literal
            }
            TokenKind::StringLiteral => {
                self.leaf(NodeKind::StringTemplate);
                NodeKind::StringTemplate
            }
            TokenKind::Identifier => {
                self.start_node(NodeKind::NameReference);
                self.bump();
                self.builder.set_name(super::identifier_name(token.text));
                self.finish_node();
                NodeKind::NameReference
            }
            TokenKind::Error(_) => {
                // already reported by the lexer
                self.leaf(NodeKind::Error);
                NodeKind::Error
            }
            TokenKind::Keyword => match token.text {
                "true" | "false" | "null" => {
                    self.leaf(NodeKind::Literal);
                    NodeKind::Literal
                }
                "this" => {
                    self.start_node(NodeKind::ThisExpression);
                    self.bump();
                    self.eat_label();
                    self.finish_node();
                    NodeKind::ThisExpression
                }
                "super" => {
                    self.start_node(NodeKind::SuperExpression);
                    self.bump();
                    if self.at_op("<") && self.adjacent() {
                        self.parse_type_arguments();
                    }
                    self.eat_label();
                    self.finish_node();
                    NodeKind::SuperExpression
                }
                "if" => {
                    self.parse_if();
                    NodeKind::IfExpression
                }
                "when" => {
                    self.parse_when();
                    NodeKind::WhenExpression
                }
                "try" => {
                    self.parse_try();
                    NodeKind::TryExpression
                }
                "return" => {
                    self.parse_return();
                    NodeKind::ReturnExpression
                }
                "break" | "continue" => {
                    self.parse_jump();
                    NodeKind::JumpExpression
                }
                "throw" => {
                    self.parse_throw();
                    NodeKind::ThrowExpression
                }
                "fun" => {
                    self.parse_anonymous_function();
                    NodeKind::AnonymousFunction
                }
                "object" => {
                    let checkpoint = self.checkpoint();
                    self.parse_object(checkpoint);
                    NodeKind::ObjectDeclaration
                }
                _ => return self.primary_error(),
            },
            TokenKind::Operator => match token.text {
                "(" => {
                    self.parse_parenthesized();
                    NodeKind::ParenthesizedExpression
                }
                "{" => {
                    self.parse_lambda();
                    NodeKind::LambdaExpression
                }
                "::" => {
                    // callable reference without a receiver, `::println`
                    self.start_node(NodeKind::QualifiedExpression);
                    self.bump();
                    self.parse_selector();
                    self.finish_node();
                    NodeKind::QualifiedExpression
                }
                _ => return self.primary_error(),
            },
            _ => return self.primary_error(),
        };
        Some(kind)
    }

    fn primary_error(&mut self) -> Option<NodeKind> {
        self.error_expected("expression");
        self.start_node(NodeKind::Error);
        if !self.at_eof() && !self.at_closing_or_separator() && !self.at_declaration_keyword() {
            self.bump_balanced();
        }
        self.finish_node();
        None
    }

    fn parse_parenthesized(&mut self) {
        self.start_node(NodeKind::ParenthesizedExpression);
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_expression();
            p.expect_op(")");
        });
        self.finish_node();
    }

    /// True if the tokens after `{` up to a top-level `->` can only be a
    /// lambda parameter list.
    fn lambda_has_parameters(&self) -> bool {
        let mut depth = 0usize;
        for n in 1..64 {
            let token = self.nth(n);
            match token.kind {
                TokenKind::Identifier => {}
                TokenKind::Operator => match token.text {
                    "->" if depth == 0 => return true,
                    "(" | "<" => depth += 1,
                    ")" | ">" => {
                        if depth == 0 {
                            return false;
                        }
                        depth -= 1;
                    }
                    "," | ":" | "." | "?" | "*" | "->" => {}
                    _ => return false,
                },
                _ => return false,
            }
        }
        false
    }

    pub(super) fn parse_lambda(&mut self) {
        if !self.enter() {
            return;
        }
        self.start_node(NodeKind::LambdaExpression);
        let has_parameters = self.lambda_has_parameters();
        self.bump();
        self.with_newlines(false, |p| {
            if has_parameters {
                p.parse_list("->", "lambda parameter", |p| p.parse_parameter(ParameterStyle::Lambda));
                p.expect_op("->");
            }
            p.parse_statements(true);
            p.expect_op("}");
        });
        self.finish_node();
        self.leave();
    }

    fn parse_anonymous_function(&mut self) {
        self.start_node(NodeKind::AnonymousFunction);
        self.bump();
        if self.at_op("(") {
            self.parse_parameter_list(ParameterStyle::Lambda);
        } else {
            self.error_missing("`(`");
        }
        if self.eat_op(":") {
            self.parse_type();
        }
        self.parse_function_body();
        self.finish_node();
    }

    fn parse_if(&mut self) {
        self.start_node(NodeKind::IfExpression);
        self.bump();
        self.parse_condition();
        if !self.at_keyword("else") {
            self.parse_control_body();
        }
        if self.at_op(";") && self.nth(1).is_keyword("else") {
            self.bump();
        }
        if self.at_keyword("else") {
            self.bump();
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_when(&mut self) {
        self.start_node(NodeKind::WhenExpression);
        self.bump();
        if self.at_op("(") {
            self.with_newlines(true, |p| {
                p.bump();
                if p.at_keyword("val") {
                    let checkpoint = p.checkpoint();
                    p.parse_property(checkpoint);
                } else {
                    p.parse_expression();
                }
                p.expect_op(")");
            });
        }
        if self.expect_op("{") {
            self.with_newlines(false, |p| {
                loop {
                    while p.eat_op(";") {}
                    if p.at_op("}") || p.at_eof() {
                        break;
                    }
                    let before = p.nth_index(0);
                    p.parse_when_entry();
                    if p.nth_index(0) == before {
                        p.recover("when entry");
                    }
                }
                p.expect_op("}");
            });
        }
        self.finish_node();
    }

    fn parse_when_entry(&mut self) {
        self.start_node(NodeKind::WhenEntry);
        if self.at_keyword("else") {
            self.bump();
        } else {
            loop {
                self.parse_when_condition();
                if !self.eat_op(",") {
                    break;
                }
            }
        }
        if self.expect_op("->") {
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_when_condition(&mut self) {
        if self.at_keyword("in") || self.at_op("!in") {
            self.bump();
            self.parse_expression();
        } else if self.at_keyword("is") || self.at_op("!is") {
            self.bump();
            self.parse_type();
        } else {
            self.parse_expression();
        }
    }

    fn parse_try(&mut self) {
        self.start_node(NodeKind::TryExpression);
        self.bump();
        self.parse_block();
        while self.at_soft("catch") {
            self.start_node(NodeKind::CatchClause);
            self.bump();
            if self.expect_op("(") {
                self.with_newlines(true, |p| {
                    p.parse_parameter(ParameterStyle::Function);
                    p.expect_op(")");
                });
            }
            self.parse_block();
            self.finish_node();
        }
        if self.at_soft("finally") {
            self.start_node(NodeKind::FinallyClause);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }
}
