// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarations: classes, objects, functions, properties and their parts.
//!
//! Every declaration may start with a `ModifierList`. The parser takes a
//! checkpoint before the modifiers and opens the declaration node at that
//! checkpoint once the keyword tells it which kind to build.

use crate::nodes::NodeKind;
use crate::tokenizer::TokenKind;

use super::builder::Checkpoint;
use super::{Parser, DECLARATION_KEYWORDS};

/// How a parameter may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParameterStyle {
    /// Function and catch parameters: `name: Type = default`.
    Function,
    /// Primary constructor parameters, which may declare properties.
    Class,
    /// Lambda, loop and setter parameters: type optional, destructuring
    /// allowed, no default.
    Lambda,
}

impl<'a> Parser<'a> {
    /// True if the upcoming tokens start a declaration rather than an
    /// expression.
    pub(super) fn at_declaration_start(&self) -> bool {
        let mut n = 0;
        loop {
            let token = self.nth(n);
            if token.is_op("@") {
                return true;
            }
            if Self::is_modifier(&token) && self.modifier_continues(n + 1) {
                n += 1;
                continue;
            }
            break;
        }
        let token = self.nth(n);
        if token.is_soft_keyword("constructor") {
            return self.nth_op(n + 1, "(");
        }
        if token.kind != TokenKind::Keyword {
            return false;
        }
        match token.text {
            "fun" => n > 0 || self.function_header_at(n),
            "object" => n > 0 || self.nth(n + 1).is_identifier(),
            "class" | "interface" | "val" | "var" | "typealias" => true,
            _ => false,
        }
    }

    /// A modifier must be followed by another modifier, an annotation or a
    /// declaration keyword.
    fn modifier_continues(&self, n: usize) -> bool {
        let next = self.nth(n);
        next.is_identifier()
            || next.is_op("@")
            || (next.kind == TokenKind::Keyword && DECLARATION_KEYWORDS.contains(&next.text))
    }

    fn at_modifier(&self) -> bool {
        self.at_op("@") || (Self::is_modifier(&self.current()) && self.modifier_continues(1))
    }

    /// `fun` at `n` followed by optional type parameters, an optional
    /// receiver, a name and a parameter list.
    fn function_header_at(&self, n: usize) -> bool {
        let mut k = n + 1;
        if self.nth_op(k, "<") {
            match self.skip_angle(k) {
                Some(end) => k = end,
                None => return false,
            }
        }
        if !self.nth(k).is_identifier() {
            return false;
        }
        loop {
            k += 1;
            if self.nth_op(k, "<") {
                match self.skip_angle(k) {
                    Some(end) => k = end,
                    None => return false,
                }
            }
            while self.nth_op(k, "?") {
                k += 1;
            }
            if self.nth_op(k, ".") && self.nth(k + 1).is_identifier() {
                k += 1;
                continue;
            }
            break;
        }
        self.nth_op(k, "(")
    }

    /// Number of tokens in a `Receiver.` prefix before a declaration name,
    /// the final dot included.
    fn receiver_length(&self) -> usize {
        if !self.at_identifier() {
            return 0;
        }
        let mut k = 0;
        let mut last_dot = None;
        loop {
            k += 1;
            if self.nth_op(k, "<") {
                match self.skip_angle(k) {
                    Some(end) => k = end,
                    None => break,
                }
            }
            while self.nth_op(k, "?") {
                k += 1;
            }
            if self.nth_op(k, ".") && self.nth(k + 1).is_identifier() {
                last_dot = Some(k);
                k += 1;
                continue;
            }
            break;
        }
        last_dot.map_or(0, |dot| dot + 1)
    }

    fn parse_receiver(&mut self) {
        let length = self.receiver_length();
        if length == 0 {
            return;
        }
        self.start_node(NodeKind::TypeReference);
        for _ in 0..length - 1 {
            self.bump();
        }
        self.finish_node();
        self.bump();
    }

    pub(super) fn parse_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        let modifiers = self.parse_modifiers();
        let token = self.current();
        if token.is_soft_keyword("constructor") {
            self.parse_secondary_constructor(checkpoint);
            return;
        }
        if token.kind != TokenKind::Keyword {
            self.error_expected("declaration");
            return;
        }
        match token.text {
            "class" | "interface" => self.parse_class(checkpoint, modifiers.contains(&"enum")),
            "object" => self.parse_object(checkpoint),
            "fun" => self.parse_function(checkpoint),
            "val" | "var" => self.parse_property(checkpoint),
            "typealias" => self.parse_type_alias(checkpoint),
            _ => self.error_expected("declaration"),
        }
    }

    /// Modifiers and annotations, returned by text (annotations excluded).
    pub(super) fn parse_modifiers(&mut self) -> Vec<&'a str> {
        let mut modifiers = Vec::new();
        if !self.at_modifier() {
            return modifiers;
        }
        self.start_node(NodeKind::ModifierList);
        while self.at_modifier() {
            if self.at_op("@") {
                self.parse_annotation();
            } else {
                modifiers.push(self.current().text);
                self.bump();
            }
        }
        self.finish_node();
        modifiers
    }

    fn parse_annotation(&mut self) {
        self.start_node(NodeKind::Annotation);
        self.bump();
        if self.at_identifier() && self.nth_op(1, ":") {
            // use-site target, `@file:JvmName(...)`
            self.bump();
            self.bump();
        }
        if self.at_op("[") {
            self.bump_balanced();
        } else {
            self.parse_qualified_name();
            if self.at_op("<") && self.adjacent() {
                self.parse_type_arguments();
            }
            if self.at_op("(") && self.adjacent() {
                self.parse_value_arguments();
            }
        }
        self.finish_node();
    }

    fn parse_class(&mut self, checkpoint: Checkpoint, is_enum: bool) {
        self.start_node_at(checkpoint, NodeKind::ClassDeclaration);
        self.bump();
        self.name_node("class name");
        if self.at_op("<") {
            self.parse_type_parameters();
        }
        if !self.newline_before() && (self.at_modifier() || self.at_soft("constructor")) {
            self.parse_modifiers();
            if self.at_soft("constructor") {
                self.bump();
            }
        }
        if self.at_op("(") {
            self.parse_parameter_list(ParameterStyle::Class);
        }
        if self.at_op(":") {
            self.parse_super_types();
        }
        self.parse_type_constraints();
        if self.at_op("{") {
            self.parse_class_body(is_enum);
        }
        self.finish_node();
    }

    pub(super) fn parse_object(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, NodeKind::ObjectDeclaration);
        self.bump();
        if self.at_identifier() && !self.newline_before() {
            self.name_node("object name");
        }
        if self.at_op(":") {
            self.parse_super_types();
        }
        if self.at_op("{") {
            self.parse_class_body(false);
        }
        self.finish_node();
    }

    fn parse_function(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, NodeKind::FunctionDeclaration);
        self.bump();
        if self.at_op("<") {
            self.parse_type_parameters();
        }
        self.parse_receiver();
        self.name_node("function name");
        if self.at_op("(") {
            self.parse_parameter_list(ParameterStyle::Function);
        } else {
            self.error_missing("`(`");
        }
        if self.eat_op(":") {
            self.parse_type();
        }
        self.parse_type_constraints();
        self.parse_function_body();
        self.finish_node();
    }

    /// `{ ... }` or `= expression`; absent for abstract members.
    pub(super) fn parse_function_body(&mut self) {
        if self.at_op("{") {
            self.parse_block();
        } else if self.eat_op("=") {
            self.parse_expression();
        }
    }

    pub(super) fn parse_property(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, NodeKind::PropertyDeclaration);
        self.bump();
        if self.at_op("<") {
            self.parse_type_parameters();
        }
        if self.at_op("(") {
            // destructuring, `val (a, b) = pair`
            self.parse_destructuring("name");
        } else {
            self.parse_receiver();
            self.name_node("property name");
        }
        if self.eat_op(":") {
            self.parse_type();
        }
        self.parse_type_constraints();
        if self.eat_op("=") {
            self.parse_expression();
        } else if self.at_soft("by") && !self.newline_before() {
            self.bump();
            self.parse_expression();
        }
        self.parse_accessors();
        self.finish_node();
    }

    /// `get`/`set`, optionally after modifiers, introducing an accessor.
    fn at_accessor(&self) -> bool {
        let mut n = 0;
        while Self::is_modifier(&self.nth(n)) {
            n += 1;
        }
        let token = self.nth(n);
        if !token.is_soft_keyword("get") && !token.is_soft_keyword("set") {
            return false;
        }
        let next = self.nth(n + 1);
        next.is_op("(")
            || next.is_op("=")
            || next.is_op(";")
            || next.is_op("}")
            || next.is_eof()
            || self.newline_before_nth(n + 1)
    }

    fn parse_accessors(&mut self) {
        for _ in 0..2 {
            if !self.at_accessor() {
                return;
            }
            let checkpoint = self.checkpoint();
            self.parse_modifiers();
            self.start_node_at(checkpoint, NodeKind::PropertyAccessor);
            let token = self.current();
            self.bump();
            self.builder.set_name(token.text);
            if self.at_op("(") {
                self.parse_parameter_list(ParameterStyle::Lambda);
            }
            if self.eat_op(":") {
                self.parse_type();
            }
            self.parse_function_body();
            self.finish_node();
        }
    }

    fn parse_type_alias(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, NodeKind::TypeAlias);
        self.bump();
        self.name_node("type alias name");
        if self.at_op("<") {
            self.parse_type_parameters();
        }
        if self.expect_op("=") {
            self.parse_type();
        }
        self.finish_node();
    }

    fn parse_secondary_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, NodeKind::SecondaryConstructor);
        let token = self.current();
        self.bump();
        self.builder.set_name(token.text);
        if self.at_op("(") {
            self.parse_parameter_list(ParameterStyle::Function);
        } else {
            self.error_missing("`(`");
        }
        if self.eat_op(":") {
            // delegation call, `: this(x)`
            self.start_node(NodeKind::CallExpression);
            if self.at_keyword("this") {
                self.leaf(NodeKind::ThisExpression);
            } else if self.at_keyword("super") {
                self.leaf(NodeKind::SuperExpression);
            } else {
                self.error_missing("`this` or `super`");
            }
            if self.at_op("(") {
                self.parse_value_arguments();
            }
            self.finish_node();
        }
        if self.at_op("{") {
            self.parse_block();
        }
        self.finish_node();
    }

    fn parse_type_constraints(&mut self) {
        if !self.at_soft("where") {
            return;
        }
        self.bump();
        loop {
            self.expect_name("type parameter");
            if self.expect_op(":") {
                self.parse_type();
            }
            if !self.eat_op(",") {
                break;
            }
        }
    }

    /// `( parameter, ... )` with each parameter a direct child of the open
    /// node.
    pub(super) fn parse_parameter_list(&mut self, style: ParameterStyle) {
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(")", "parameter", |p| p.parse_parameter(style));
            p.expect_op(")");
        });
    }

    pub(super) fn parse_parameter(&mut self, style: ParameterStyle) {
        self.start_node(NodeKind::Parameter);
        self.parse_modifiers();
        if style == ParameterStyle::Class && (self.at_keyword("val") || self.at_keyword("var")) {
            self.bump();
        }
        if style == ParameterStyle::Lambda && self.at_op("(") {
            self.parse_destructuring("parameter");
        } else {
            self.name_node("parameter name");
        }
        if self.eat_op(":") {
            self.parse_type();
        } else if style != ParameterStyle::Lambda {
            self.error_missing("`:`");
        }
        if style != ParameterStyle::Lambda && self.eat_op("=") {
            self.parse_expression();
        }
        self.finish_node();
    }

    /// `(a, b)` names, each of which may itself be destructured.
    fn parse_destructuring(&mut self, what: &str) {
        if !self.enter() {
            return;
        }
        self.with_newlines(true, |p| {
            p.bump();
            p.parse_list(")", what, |p| p.parse_parameter(ParameterStyle::Lambda));
            p.expect_op(")");
        });
        self.leave();
    }

    fn parse_super_types(&mut self) {
        self.start_node(NodeKind::SuperTypeList);
        self.bump();
        loop {
            self.parse_type();
            if self.at_op("(") && !self.newline_before() {
                self.parse_value_arguments();
            }
            if self.at_soft("by") {
                self.bump();
                self.parse_expression();
            }
            if !self.eat_op(",") {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_class_body(&mut self, is_enum: bool) {
        if !self.enter() {
            return;
        }
        self.start_node(NodeKind::ClassBody);
        self.bump();
        self.with_newlines(false, |p| {
            if is_enum {
                p.parse_enum_entries();
            }
            loop {
                while p.eat_op(";") {}
                if p.at_op("}") || p.at_eof() {
                    break;
                }
                let before = p.nth_index(0);
                if p.at_soft("init") && p.nth_op(1, "{") {
                    p.parse_initializer();
                } else if p.at_declaration_start() {
                    p.parse_declaration();
                }
                if p.nth_index(0) == before {
                    p.recover("class member");
                }
            }
            p.expect_op("}");
        });
        self.finish_node();
        self.leave();
    }

    fn at_enum_entry(&self) -> bool {
        self.at_identifier()
            && !self.at_declaration_start()
            && !(self.at_soft("init") && self.nth_op(1, "{"))
    }

    fn parse_enum_entries(&mut self) {
        while self.at_enum_entry() {
            self.start_node(NodeKind::EnumEntry);
            self.name_node("enum entry");
            if self.at_op("(") && !self.newline_before() {
                self.parse_value_arguments();
            }
            if self.at_op("{") {
                self.parse_class_body(false);
            }
            self.finish_node();
            if !self.eat_op(",") {
                break;
            }
        }
        self.eat_op(";");
    }

    fn parse_initializer(&mut self) {
        self.start_node(NodeKind::Initializer);
        self.bump();
        self.parse_block();
        self.finish_node();
    }
}
