use crate::host::{ElementTree, HostTree};
use crate::{Error, Result};
use scanlens_engine::ComponentTree;
use scanlens_types::{ElementId, NodeId, Point, RawInteractionEntry, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::path::Path;

fn default_current() -> bool {
    true
}

/// One captured tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub composite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<NodeId>,
    /// Whether this physical node is the current buffer of its pair
    #[serde(default = "default_current")]
    pub current: bool,
    /// Explicit state-holding element; otherwise derived from the elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_element: Option<ElementId>,
}

impl NodeRecord {
    pub fn composite(id: u64, name: &str, parent: Option<u64>) -> Self {
        Self {
            id: NodeId::new(id),
            name: Some(name.to_string()),
            composite: true,
            parent: parent.map(NodeId::new),
            alternate: None,
            current: true,
            state_element: None,
        }
    }

    pub fn host(id: u64, name: &str, parent: Option<u64>) -> Self {
        Self {
            composite: false,
            ..Self::composite(id, name, parent)
        }
    }

    pub fn with_alternate(mut self, alternate: u64, current: bool) -> Self {
        self.alternate = Some(NodeId::new(alternate));
        self.current = current;
        self
    }
}

/// One captured rendered element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
}

impl ElementRecord {
    pub fn new(id: u64, node: Option<u64>, parent: Option<u64>) -> Self {
        Self {
            id: ElementId::new(id),
            parent: parent.map(ElementId::new),
            node: node.map(NodeId::new),
            rect: None,
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    elements: Vec<ElementRecord>,
}

/// Serializable capture of a host tree, replayable offline through the
/// tree-access traits.
///
/// Alternate links may be recorded on either side of a pair; lookups answer
/// from both. Parent links of nodes and of elements must be acyclic: the
/// tree walks built on top of them stop only at a root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct TreeSnapshot {
    nodes: Vec<NodeRecord>,
    elements: Vec<ElementRecord>,
    node_index: HashMap<NodeId, usize>,
    element_index: HashMap<ElementId, usize>,
    alternates: HashMap<NodeId, NodeId>,
}

impl TryFrom<RawSnapshot> for TreeSnapshot {
    type Error = Error;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        Self::try_new(raw.nodes, raw.elements)
    }
}

impl From<TreeSnapshot> for RawSnapshot {
    fn from(snapshot: TreeSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes,
            elements: snapshot.elements,
        }
    }
}

impl TreeSnapshot {
    /// Build from trusted records. Links are not checked.
    pub fn new(nodes: Vec<NodeRecord>, elements: Vec<ElementRecord>) -> Self {
        let node_index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let element_index = elements.iter().enumerate().map(|(i, e)| (e.id, i)).collect();

        let mut alternates = HashMap::new();
        for node in &nodes {
            if let Some(alternate) = node.alternate {
                alternates.insert(node.id, alternate);
                alternates.entry(alternate).or_insert(node.id);
            }
        }

        Self {
            nodes,
            elements,
            node_index,
            element_index,
            alternates,
        }
    }

    /// Like [`TreeSnapshot::new`], but rejects parent links that loop.
    pub fn try_new(nodes: Vec<NodeRecord>, elements: Vec<ElementRecord>) -> Result<Self> {
        let snapshot = Self::new(nodes, elements);

        if let Some(node) = first_cycle(snapshot.nodes.iter().map(|n| n.id), |id| {
            snapshot.parent(id)
        }) {
            return Err(Error::Snapshot(format!("{} is its own ancestor", node)));
        }
        if let Some(element) = first_cycle(snapshot.elements.iter().map(|e| e.id), |id| {
            snapshot.parent_element(id)
        }) {
            return Err(Error::Snapshot(format!("{} is its own ancestor", element)));
        }

        Ok(snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementRecord> {
        self.element_index.get(&id).map(|&i| &self.elements[i])
    }

    /// Flip which buffer of a pair is current, as a host commit would.
    pub fn set_current(&mut self, id: NodeId, current: bool) {
        if let Some(&i) = self.node_index.get(&id) {
            self.nodes[i].current = current;
        }
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Option<Rect>) {
        if let Some(&i) = self.element_index.get(&id) {
            self.elements[i].rect = rect;
        }
    }

    /// Element whose rectangle contains `point`, deepest (last captured) first.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.rect.is_some_and(|rect| rect.contains(point)))
            .map(|e| e.id)
    }

    fn has_ancestor_or_self(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}

/// First id whose chain of `parent` links comes back to an id already on it.
fn first_cycle<K, F>(ids: impl Iterator<Item = K>, parent: F) -> Option<K>
where
    K: Copy + Eq + Hash,
    F: Fn(K) -> Option<K>,
{
    let mut rooted: HashSet<K> = HashSet::new();
    for start in ids {
        let mut chain = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if rooted.contains(&id) {
                break;
            }
            if !chain.insert(id) {
                return Some(start);
            }
            current = parent(id);
        }
        rooted.extend(chain);
    }
    None
}

impl ComponentTree for TreeSnapshot {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn is_composite(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.composite)
    }

    fn display_name(&self, node: NodeId) -> Option<String> {
        self.node(node).and_then(|n| n.name.clone())
    }
}

impl ElementTree for TreeSnapshot {
    fn nearest_node(&self, element: ElementId) -> Option<NodeId> {
        let mut current = Some(element);
        while let Some(id) = current {
            let record = self.element(id)?;
            if let Some(node) = record.node {
                return Some(node);
            }
            current = record.parent;
        }
        None
    }

    fn parent_element(&self, element: ElementId) -> Option<ElementId> {
        self.element(element).and_then(|e| e.parent)
    }
}

impl HostTree for TreeSnapshot {
    fn alternate(&self, node: NodeId) -> Option<NodeId> {
        self.alternates.get(&node).copied()
    }

    fn is_current(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.current)
    }

    fn first_state_node(&self, node: NodeId) -> Option<ElementId> {
        if let Some(explicit) = self.node(node).and_then(|n| n.state_element) {
            return Some(explicit);
        }
        self.elements
            .iter()
            .find(|e| {
                e.node
                    .is_some_and(|owner| self.has_ancestor_or_self(owner, node))
            })
            .map(|e| e.id)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.element(element).and_then(|e| e.rect)
    }
}

/// A captured tree plus the raw interaction entries recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub tree: TreeSnapshot,
    #[serde(default)]
    pub entries: Vec<RawInteractionEntry>,
}

impl Scenario {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::Io(std::io::Error::new(
                err.kind(),
                format!("{}: {}", path.display(), err),
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
