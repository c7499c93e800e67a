// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Type references, type arguments and type parameters.

use crate::nodes::NodeKind;

use super::Parser;

impl<'a> Parser<'a> {
    /// `Name<Args>.Inner?`, `(A, B) -> R`, `Receiver.() -> R`.
    pub(super) fn parse_type(&mut self) {
        if !self.enter() {
            return;
        }
        self.start_node(NodeKind::TypeReference);
        if self.at_soft("suspend") && self.nth_op(1, "(") {
            self.bump();
        }
        if self.at_op("(") {
            self.parse_function_type();
        } else if self.at_identifier() {
            self.parse_user_type();
            if self.at_op(".") && self.nth_op(1, "(") {
                // receiver of a function type
                self.bump();
                self.parse_function_type();
            }
        } else {
            self.error_missing("type");
        }
        while self.at_op("?") && self.adjacent() {
            self.bump();
        }
        self.finish_node();
        self.leave();
    }

    fn parse_user_type(&mut self) {
        loop {
            self.bump();
            if self.at_op("<") && !self.newline_before() {
                self.parse_type_arguments();
            }
            if self.at_op(".") && self.nth(1).is_identifier() {
                self.bump();
                continue;
            }
            break;
        }
    }

    /// `( parameter types ) -> ReturnType`, or a parenthesized type when no
    /// arrow follows.
    fn parse_function_type(&mut self) {
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(")", "type", |p| {
                if p.at_identifier() && p.nth_op(1, ":") {
                    p.bump();
                    p.bump();
                }
                p.parse_type();
            });
            p.expect_op(")");
        });
        if self.eat_op("->") {
            self.parse_type();
        }
    }

    /// `<T, out R, *>` after a type name or a call target.
    pub(super) fn parse_type_arguments(&mut self) {
        self.start_node(NodeKind::TypeArgumentList);
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(">", "type argument", |p| {
                if p.at_op("*") {
                    p.bump();
                    return;
                }
                if (p.at_keyword("in") || p.at_soft("out")) && !p.nth_op(1, ",") && !p.nth_op(1, ">") {
                    p.bump();
                }
                p.parse_type();
            });
            p.expect_op(">");
        });
        self.finish_node();
    }

    /// `<T : Bound, reified R>` on a declaration.
    pub(super) fn parse_type_parameters(&mut self) {
        self.start_node(NodeKind::TypeParameterList);
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(">", "type parameter", |p| {
                while (p.at_keyword("in") || p.at_soft("out") || p.at_soft("reified") || p.at_op("@"))
                    && !p.nth_op(1, ",")
                    && !p.nth_op(1, ">")
                    && !p.nth_op(1, ":")
                {
                    if p.at_op("@") {
                        p.parse_modifiers();
                    } else {
                        p.bump();
                    }
                }
                p.expect_name("type parameter name");
                if p.eat_op(":") {
                    p.parse_type();
                }
            });
            p.expect_op(">");
        });
        self.finish_node();
    }
}
