use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            /// Accepts both the bare number and the displayed `prefix#N` form.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix(concat!($prefix, "#")).unwrap_or(s);
                digits
                    .trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| Error::InvalidHandle(s.to_string()))
            }
        }
    };
}

handle!(
    /// Opaque handle into the host-owned retained UI tree.
    ///
    /// The core never owns nodes; it only observes them through the host's
    /// tree-access collaborator.
    NodeId,
    "node"
);

handle!(
    /// Handle to a rendered (markup) element on the host surface.
    ElementId,
    "element"
);

handle!(
    /// Externally owned display surface that shows the properties/state panel.
    PanelId,
    "panel"
);

/// Two-slot handle for a double-buffered node: the physical node that was
/// observed plus its paired alternate version, if the host has one.
///
/// Which of the two slots is "current" is never stored here; it is answered
/// by an oracle supplied by the host at the time of the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionedNode {
    pub node: NodeId,
    pub alternate: Option<NodeId>,
}

impl VersionedNode {
    pub fn new(node: NodeId, alternate: Option<NodeId>) -> Self {
        Self { node, alternate }
    }

    /// Pick the current version. Falls back to the observed node when it is
    /// not current and there is no alternate to switch to.
    pub fn current(&self, is_current: impl Fn(NodeId) -> bool) -> NodeId {
        if is_current(self.node) {
            self.node
        } else {
            self.alternate.unwrap_or(self.node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parse_accepts_both_forms() {
        assert_eq!("12".parse::<NodeId>().unwrap(), NodeId::new(12));
        assert_eq!("node#12".parse::<NodeId>().unwrap(), NodeId::new(12));
        assert!("element#3".parse::<NodeId>().is_err());
        assert!("abc".parse::<ElementId>().is_err());
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(ElementId::new(7).to_string(), "element#7");
        assert_eq!(PanelId::new(1).to_string(), "panel#1");
    }

    #[test]
    fn test_versioned_current_prefers_node_when_current() {
        let pair = VersionedNode::new(NodeId::new(1), Some(NodeId::new(2)));
        assert_eq!(pair.current(|n| n == NodeId::new(1)), NodeId::new(1));
        assert_eq!(pair.current(|n| n == NodeId::new(2)), NodeId::new(2));
    }

    #[test]
    fn test_versioned_current_without_alternate_falls_back() {
        let pair = VersionedNode::new(NodeId::new(1), None);
        assert_eq!(pair.current(|_| false), NodeId::new(1));
    }
}
