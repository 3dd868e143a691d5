//! Depth-first traversal over the syntax model.
//!
//! Mirrors the `syn::visit` style: each `visit_*` method has a default that
//! calls the matching `walk_*` function, so an implementor overrides only the
//! shapes it cares about and calls `walk_*` to keep descending.

use super::{CallExpr, Ident, Node, OtherNode, SelectorExpr, SourceFile};

/// Visitor over syntax nodes, borrowing the tree for `'ast`.
pub trait Visit<'ast> {
    /// Visits every top-level node of a file.
    fn visit_file(&mut self, file: &'ast SourceFile) {
        walk_file(self, file);
    }

    /// Dispatches on the node variant.
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }

    /// Visits an identifier.
    fn visit_ident(&mut self, _ident: &'ast Ident) {}

    /// Visits a selector, then its qualifier.
    fn visit_selector(&mut self, selector: &'ast SelectorExpr) {
        walk_selector(self, selector);
    }

    /// Visits a call, then its callee and arguments.
    fn visit_call(&mut self, call: &'ast CallExpr) {
        walk_call(self, call);
    }

    /// Visits an opaque node's children.
    fn visit_other(&mut self, other: &'ast OtherNode) {
        walk_other(self, other);
    }
}

/// Walks all top-level nodes of a file.
pub fn walk_file<'ast, V>(v: &mut V, file: &'ast SourceFile)
where
    V: Visit<'ast> + ?Sized,
{
    for node in &file.nodes {
        v.visit_node(node);
    }
}

/// Dispatches a node to the matching `visit_*` method.
pub fn walk_node<'ast, V>(v: &mut V, node: &'ast Node)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Node::Ident(ident) => v.visit_ident(ident),
        Node::Selector(selector) => v.visit_selector(selector),
        Node::Call(call) => v.visit_call(call),
        Node::Other(other) => v.visit_other(other),
    }
}

/// Descends into a selector's qualifier.
pub fn walk_selector<'ast, V>(v: &mut V, selector: &'ast SelectorExpr)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_node(&selector.qualifier);
}

/// Descends into a call's callee, then its arguments in order.
pub fn walk_call<'ast, V>(v: &mut V, call: &'ast CallExpr)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_node(&call.callee);
    for arg in &call.args {
        v.visit_node(arg);
    }
}

/// Descends into an opaque node's children.
pub fn walk_other<'ast, V>(v: &mut V, other: &'ast OtherNode)
where
    V: Visit<'ast> + ?Sized,
{
    for child in &other.children {
        v.visit_node(child);
    }
}
