//! Pre-order traversal capability and visitors over node trees

use std::io::{self, Write};

use generational_arena::Index;

use crate::domain::bunch::{Bunch, BunchNode};

/// Trees that can be walked parent-before-children.
pub trait Traversable {
    /// Iterate nodes in pre-order as `(depth, node)`, root at depth 0.
    fn pre_order(&self) -> PreOrder<'_>;
}

impl Traversable for Bunch {
    fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            bunch: self,
            stack: vec![(self.root(), 0)],
        }
    }
}

pub struct PreOrder<'a> {
    bunch: &'a Bunch,
    stack: Vec<(Index, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a BunchNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.stack.pop() {
            if let Some(node) = self.bunch.get_node(idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((depth, node));
            }
        }
        None
    }
}

/// Receives nodes during a traversal.
pub trait Visitor {
    fn visit(&mut self, node: &BunchNode, depth: usize) -> io::Result<()>;
}

/// Walk `tree` in pre-order, handing every node to `visitor` once.
pub fn pre_order_travel<T, V>(tree: &T, visitor: &mut V) -> io::Result<()>
where
    T: Traversable + ?Sized,
    V: Visitor + ?Sized,
{
    for (depth, node) in tree.pre_order() {
        visitor.visit(node, depth)?;
    }
    Ok(())
}

/// Writes one indented line per node: `name [type] status`.
pub struct SimplePrintVisitor<W: Write> {
    out: W,
}

impl<W: Write> SimplePrintVisitor<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Visitor for SimplePrintVisitor<W> {
    fn visit(&mut self, node: &BunchNode, depth: usize) -> io::Result<()> {
        let name = if node.name.is_empty() { "/" } else { &node.name };
        let indent = "  ".repeat(depth);
        match node.status {
            Some(status) => writeln!(self.out, "{indent}{name} [{}] {status}", node.node_type),
            None => writeln!(self.out, "{indent}{name} [{}]", node.node_type),
        }
    }
}
