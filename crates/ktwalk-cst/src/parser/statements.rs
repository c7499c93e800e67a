// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement sequencing, blocks, loops and jumps.

use crate::nodes::NodeKind;
use crate::tokenizer::TokenKind;

use super::declarations::ParameterStyle;
use super::Parser;

const ASSIGNMENT_OPERATORS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%="];

impl<'a> Parser<'a> {
    /// Statements up to `}` (when `in_braces`) or end of file.
    pub(super) fn parse_statements(&mut self, in_braces: bool) {
        loop {
            while self.eat_op(";") {}
            if self.at_eof() || (in_braces && self.at_op("}")) {
                break;
            }
            if !in_braces && self.at_op("}") {
                self.recover("declaration or statement");
                continue;
            }
            let before = self.nth_index(0);
            let declaration = self.at_declaration_start();
            self.parse_statement();
            if self.nth_index(0) == before {
                self.recover("statement");
                continue;
            }
            if !declaration && !self.at_statement_end() {
                self.recover("newline or `;`");
            }
        }
    }

    fn at_statement_end(&self) -> bool {
        self.at_eof() || self.at_op(";") || self.at_op("}") || self.newline_before()
    }

    pub(super) fn parse_statement(&mut self) {
        if self.at_declaration_start() {
            self.parse_declaration();
        } else {
            self.parse_plain_statement();
        }
    }

    /// A statement that is not a declaration: a loop, or an expression with
    /// an optional assignment.
    fn parse_plain_statement(&mut self) {
        if self.at_keyword("for") {
            self.parse_for();
        } else if self.at_keyword("while") {
            self.parse_while();
        } else if self.at_keyword("do") {
            self.parse_do_while();
        } else {
            self.parse_expression_statement();
        }
    }

    fn parse_expression_statement(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expression();
        let token = self.current();
        if token.kind == TokenKind::Operator
            && ASSIGNMENT_OPERATORS.contains(&token.text)
            && !self.newline_before()
        {
            self.start_node_at(checkpoint, NodeKind::Assignment);
            self.bump();
            self.parse_expression();
            self.finish_node();
        }
    }

    pub(super) fn parse_block(&mut self) {
        if !self.enter() {
            return;
        }
        self.start_node(NodeKind::Block);
        if self.expect_op("{") {
            self.with_newlines(false, |p| p.parse_statements(true));
            self.expect_op("}");
        }
        self.finish_node();
        self.leave();
    }

    /// Body of `if`, `when` entries and loops: a block or a single statement.
    pub(super) fn parse_control_body(&mut self) {
        if self.at_op("{") {
            self.parse_block();
        } else if !self.at_op(";") && !self.at_closing_or_separator() && !self.at_eof() {
            if self.enter() {
                self.parse_plain_statement();
                self.leave();
            }
        } else {
            self.error_missing("statement");
        }
    }

    /// `( expression )` with newlines ignored inside.
    pub(super) fn parse_condition(&mut self) {
        if self.expect_op("(") {
            self.with_newlines(true, |p| {
                p.parse_expression();
                p.expect_op(")");
            });
        }
    }

    fn parse_for(&mut self) {
        self.start_node(NodeKind::ForExpression);
        self.bump();
        if self.expect_op("(") {
            self.with_newlines(true, |p| {
                p.parse_parameter(ParameterStyle::Lambda);
                p.expect_keyword("in");
                p.parse_expression();
                p.expect_op(")");
            });
        }
        self.parse_control_body();
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(NodeKind::WhileExpression);
        self.bump();
        self.parse_condition();
        if self.at_op(";") {
            self.bump();
        } else {
            self.parse_control_body();
        }
        self.finish_node();
    }

    fn parse_do_while(&mut self) {
        self.start_node(NodeKind::DoWhileExpression);
        self.bump();
        if !self.at_keyword("while") {
            self.parse_control_body();
        }
        if self.expect_keyword("while") {
            self.parse_condition();
        }
        self.finish_node();
    }

    /// `@label` directly attached to the previous token.
    pub(super) fn eat_label(&mut self) {
        if self.at_op("@") && self.adjacent() {
            self.bump();
            if self.at_identifier() && self.adjacent() {
                self.bump();
            }
        }
    }

    pub(super) fn parse_return(&mut self) {
        self.start_node(NodeKind::ReturnExpression);
        self.bump();
        self.eat_label();
        if !self.newline_before() && self.can_start_expression_at(0) {
            self.parse_expression();
        }
        self.finish_node();
    }

    pub(super) fn parse_jump(&mut self) {
        self.start_node(NodeKind::JumpExpression);
        self.bump();
        self.eat_label();
        self.finish_node();
    }

    pub(super) fn parse_throw(&mut self) {
        self.start_node(NodeKind::ThrowExpression);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }
}
