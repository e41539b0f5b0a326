use scanlens_types::NodeId;

/// Read-only view of the host's component tree.
///
/// Covers both the raw traversal primitives (parent links, node kind) and the
/// name resolver. Implementations never hand out ownership of nodes.
pub trait ComponentTree {
    /// The node's parent ("return") link.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether the node is a function-defined unit rather than a raw host node.
    fn is_composite(&self, node: NodeId) -> bool;

    /// Human-readable name of the node's type, if one can be resolved.
    fn display_name(&self, node: NodeId) -> Option<String>;

    /// Nearest composite node, starting at `node` itself and walking upward.
    fn nearest_composite(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.is_composite(candidate) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Strict ancestors of `node`, nearest first.
    fn ancestors(&self, node: NodeId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }
}

/// Iterator over parent links produced by [`ComponentTree::ancestors`].
pub struct Ancestors<'a, T: ComponentTree + ?Sized> {
    tree: &'a T,
    next: Option<NodeId>,
}

impl<T: ComponentTree + ?Sized> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
