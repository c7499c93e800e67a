// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntactic node kinds.

use std::fmt;

use serde::Serialize;

/// The syntactic kind of a [`SyntaxNode`](super::SyntaxNode).
///
/// The kind determines which optional node fields are populated: only kinds
/// for which [`NodeKind::has_name`] is true carry a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    // File structure
    File,
    PackageDirective,
    ImportDirective,
    ModifierList,
    Annotation,

    // Declarations
    ClassDeclaration,
    ObjectDeclaration,
    FunctionDeclaration,
    SecondaryConstructor,
    PropertyDeclaration,
    PropertyAccessor,
    TypeAlias,
    Parameter,
    TypeParameterList,
    TypeReference,
    TypeArgumentList,
    SuperTypeList,
    ClassBody,
    EnumEntry,
    Initializer,

    // Control flow
    Block,
    IfExpression,
    WhenExpression,
    WhenEntry,
    TryExpression,
    CatchClause,
    FinallyClause,
    ForExpression,
    WhileExpression,
    DoWhileExpression,
    ReturnExpression,
    JumpExpression,
    ThrowExpression,

    // Expressions
    Assignment,
    BinaryExpression,
    TypeCheckExpression,
    CastExpression,
    PrefixExpression,
    PostfixExpression,
    CallExpression,
    ValueArgumentList,
    ValueArgument,
    IndexExpression,
    QualifiedExpression,
    ParenthesizedExpression,
    LambdaExpression,
    AnonymousFunction,
    NameReference,
    Literal,
    StringTemplate,
    ThisExpression,
    SuperExpression,

    /// Tokens the parser could not fit into any production.
    Error,
}

impl NodeKind {
    /// Kinds that evaluate to a value.
    ///
    /// Blocks and loops count as expressions, matching how the source
    /// language's own tooling classifies them.
    pub fn is_expression(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Block
                | IfExpression
                | WhenExpression
                | TryExpression
                | ForExpression
                | WhileExpression
                | DoWhileExpression
                | ReturnExpression
                | JumpExpression
                | ThrowExpression
                | Assignment
                | BinaryExpression
                | TypeCheckExpression
                | CastExpression
                | PrefixExpression
                | PostfixExpression
                | CallExpression
                | IndexExpression
                | QualifiedExpression
                | ParenthesizedExpression
                | LambdaExpression
                | AnonymousFunction
                | NameReference
                | Literal
                | StringTemplate
                | ThisExpression
                | SuperExpression
        )
    }

    /// Named declarations (classes, objects, functions, properties, ...).
    pub fn is_declaration(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            ClassDeclaration
                | ObjectDeclaration
                | FunctionDeclaration
                | SecondaryConstructor
                | PropertyDeclaration
                | TypeAlias
                | EnumEntry
        )
    }

    /// Kinds whose nodes carry a name (possibly absent for anonymous
    /// objects and destructuring declarations).
    pub fn has_name(self) -> bool {
        self.is_declaration()
            || matches!(
                self,
                NodeKind::PropertyAccessor | NodeKind::Parameter | NodeKind::NameReference
            )
    }

    /// Stable display name.
    pub fn name(self) -> &'static str {
        use NodeKind::*;
        match self {
            File => "File",
            PackageDirective => "PackageDirective",
            ImportDirective => "ImportDirective",
            ModifierList => "ModifierList",
            Annotation => "Annotation",
            ClassDeclaration => "ClassDeclaration",
            ObjectDeclaration => "ObjectDeclaration",
            FunctionDeclaration => "FunctionDeclaration",
            SecondaryConstructor => "SecondaryConstructor",
            PropertyDeclaration => "PropertyDeclaration",
            PropertyAccessor => "PropertyAccessor",
            TypeAlias => "TypeAlias",
            Parameter => "Parameter",
            TypeParameterList => "TypeParameterList",
            TypeReference => "TypeReference",
            TypeArgumentList => "TypeArgumentList",
            SuperTypeList => "SuperTypeList",
            ClassBody => "ClassBody",
            EnumEntry => "EnumEntry",
            Initializer => "Initializer",
            Block => "Block",
            IfExpression => "IfExpression",
            WhenExpression => "WhenExpression",
            WhenEntry => "WhenEntry",
            TryExpression => "TryExpression",
            CatchClause => "CatchClause",
            FinallyClause => "FinallyClause",
            ForExpression => "ForExpression",
            WhileExpression => "WhileExpression",
            DoWhileExpression => "DoWhileExpression",
            ReturnExpression => "ReturnExpression",
            JumpExpression => "JumpExpression",
            ThrowExpression => "ThrowExpression",
            Assignment => "Assignment",
            BinaryExpression => "BinaryExpression",
            TypeCheckExpression => "TypeCheckExpression",
            CastExpression => "CastExpression",
            PrefixExpression => "PrefixExpression",
            PostfixExpression => "PostfixExpression",
            CallExpression => "CallExpression",
            ValueArgumentList => "ValueArgumentList",
            ValueArgument => "ValueArgument",
            IndexExpression => "IndexExpression",
            QualifiedExpression => "QualifiedExpression",
            ParenthesizedExpression => "ParenthesizedExpression",
            LambdaExpression => "LambdaExpression",
            AnonymousFunction => "AnonymousFunction",
            NameReference => "NameReference",
            Literal => "Literal",
            StringTemplate => "StringTemplate",
            ThisExpression => "ThisExpression",
            SuperExpression => "SuperExpression",
            Error => "Error",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
