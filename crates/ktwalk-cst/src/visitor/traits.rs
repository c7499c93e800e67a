// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait and per-kind dispatch.
//!
//! [`Visitor`] has one `visit_*` method per [`NodeKind`]. Every kind-specific
//! method defaults to [`Visitor::visit_element`], so an implementation only
//! overrides the kinds it cares about and picks up everything else through
//! the catch-all. The walk functions in [`super::dispatch`] decide descent
//! from the returned [`VisitResult`]; handlers never recurse themselves.
//!
//! Both the trait methods and the [`dispatch`] table come out of a single
//! macro invocation, so adding a kind without a handler fails to compile.

use crate::nodes::{NodeKind, SyntaxNode};

/// Result of visiting a node, controlling traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    #[default]
    Continue,
    /// Skip this node's children, continue with its next sibling.
    SkipChildren,
    /// Stop the entire traversal immediately.
    Stop,
}

/// Generates the [`Visitor`] trait and the [`dispatch`] function from one
/// list of `handler_name: NodeKind` pairs.
macro_rules! visitor_methods {
    ($( $base_name:ident : $kind:ident ),* $(,)?) => {
        paste::paste! {
            /// Per-kind handlers over a [`SyntaxNode`] tree.
            ///
            /// # Example
            ///
            /// ```
            /// use ktwalk_cst::{parse_file, SyntaxNode, VisitResult, Visitor};
            ///
            /// struct Methods(Vec<String>);
            ///
            /// impl<'a> Visitor<'a> for Methods {
            ///     fn visit_function(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
            ///         self.0.push(format!("Method: {}", node.name().unwrap_or("")));
            ///         VisitResult::Continue
            ///     }
            /// }
            ///
            /// let parsed = parse_file("fun add(a: Int, b: Int): Int { return a + b }");
            /// let mut methods = Methods(Vec::new());
            /// parsed.root.accept(&mut methods);
            /// assert_eq!(methods.0, vec!["Method: add"]);
            /// ```
            pub trait Visitor<'a> {
                /// Fallback for every kind whose handler is not overridden.
                #[allow(unused_variables)]
                fn visit_element(&mut self, node: &SyntaxNode<'a>) -> VisitResult {
                    VisitResult::Continue
                }

                $(
                    #[doc = concat!("Visit a [`NodeKind::", stringify!($kind), "`] node.")]
                    ///
                    /// Defaults to [`Visitor::visit_element`].
                    fn [<visit_ $base_name>](&mut self, node: &SyntaxNode<'a>) -> VisitResult {
                        self.visit_element(node)
                    }
                )*
            }

            /// Call the handler matching `node`'s kind.
            pub fn dispatch<'a, V>(visitor: &mut V, node: &SyntaxNode<'a>) -> VisitResult
            where
                V: Visitor<'a> + ?Sized,
            {
                match node.kind() {
                    $( NodeKind::$kind => visitor.[<visit_ $base_name>](node), )*
                }
            }
        }
    };
}

visitor_methods! {
    file: File,
    package_directive: PackageDirective,
    import_directive: ImportDirective,
    modifier_list: ModifierList,
    annotation: Annotation,
    class: ClassDeclaration,
    object: ObjectDeclaration,
    function: FunctionDeclaration,
    secondary_constructor: SecondaryConstructor,
    property: PropertyDeclaration,
    property_accessor: PropertyAccessor,
    type_alias: TypeAlias,
    parameter: Parameter,
    type_parameter_list: TypeParameterList,
    type_reference: TypeReference,
    type_argument_list: TypeArgumentList,
    super_type_list: SuperTypeList,
    class_body: ClassBody,
    enum_entry: EnumEntry,
    initializer: Initializer,
    block: Block,
    if: IfExpression,
    when: WhenExpression,
    when_entry: WhenEntry,
    try: TryExpression,
    catch: CatchClause,
    finally: FinallyClause,
    for: ForExpression,
    while: WhileExpression,
    do_while: DoWhileExpression,
    return: ReturnExpression,
    jump: JumpExpression,
    throw: ThrowExpression,
    assignment: Assignment,
    binary: BinaryExpression,
    type_check: TypeCheckExpression,
    cast: CastExpression,
    prefix: PrefixExpression,
    postfix: PostfixExpression,
    call: CallExpression,
    value_argument_list: ValueArgumentList,
    value_argument: ValueArgument,
    index: IndexExpression,
    qualified: QualifiedExpression,
    parenthesized: ParenthesizedExpression,
    lambda: LambdaExpression,
    anonymous_function: AnonymousFunction,
    name_reference: NameReference,
    literal: Literal,
    string_template: StringTemplate,
    this: ThisExpression,
    super: SuperExpression,
    error: Error,
}
