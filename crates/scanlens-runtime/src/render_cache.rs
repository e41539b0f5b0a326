use scanlens_types::{NodeId, VersionedNode};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// NOTE: Node lifetime
//
// Entries are keyed by plain `NodeId` handles, which never keep a host node
// alive. Hosts that recycle ids must call `forget` (node destroyed) or `clear`
// (tree unmounted); otherwise entries live as long as the cache does.

pub type SharedRenderCountCache = Rc<RefCell<RenderCountCache>>;

/// Last-observed render count per composite node.
#[derive(Debug, Default)]
pub struct RenderCountCache {
    counts: HashMap<NodeId, u64>,
}

impl RenderCountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRenderCountCache {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn get(&self, node: NodeId) -> Option<u64> {
        self.counts.get(&node).copied()
    }

    /// Slot that holds the pair's last reading and the reading itself.
    ///
    /// Prefers the observed node, then its alternate. With no reading on either
    /// side the observed node becomes the slot and the reading defaults to 0.
    pub fn lookup(&self, pair: &VersionedNode) -> (NodeId, u64) {
        if let Some(count) = self.get(pair.node) {
            return (pair.node, count);
        }
        if let Some(alternate) = pair.alternate
            && let Some(count) = self.get(alternate)
        {
            return (alternate, count);
        }
        (pair.node, 0)
    }

    /// Record `count` for the pair and return the previous reading.
    pub fn swap(&mut self, pair: &VersionedNode, count: u64) -> u64 {
        let (slot, previous) = self.lookup(pair);
        self.counts.insert(slot, count);
        previous
    }

    pub fn forget(&mut self, node: NodeId) {
        self.counts.remove(&node);
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
