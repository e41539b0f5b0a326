use crate::filter::classify;
use crate::tree::ComponentTree;
use regex::Regex;
use scanlens_types::{NodeId, PathFilters};
use std::sync::LazyLock;

/// Names this short or shorter never make it into a path.
const MIN_NAME_LEN: usize = 3;

/// Regex for unwrapping one layer of wrapper syntax
/// Example: "Memo(Foo)", "ForwardRef(Bar)", "WithLogger(Baz)"
static WRAPPER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Memo|Forward(Ref)?|With.*?)\((.*?)\)$").unwrap());

// NOTE: Path caching
//
// Resolved paths are not cached. A keyed component can be re-parented under a
// different ancestor while keeping its node handle, so a path keyed by node
// identity goes stale silently. Callers that can prove no keyed ancestor moved
// may cache on their side.

/// Build the dotted component path for `node`, root first.
///
/// The node's own name is always included when resolvable. Ancestors only
/// count when they are composite, their unwrapped name is longer than two
/// characters, and no enabled filter category matches it.
pub fn resolve_path<T: ComponentTree>(tree: &T, node: NodeId, filters: &PathFilters) -> String {
    let mut leaf_first: Vec<String> = Vec::new();

    if let Some(name) = tree.display_name(node) {
        leaf_first.push(name);
    }

    for ancestor in tree.ancestors(node) {
        if !tree.is_composite(ancestor) {
            continue;
        }
        let Some(name) = tree.display_name(ancestor).map(|n| clean_component_name(&n)) else {
            continue;
        };
        if is_path_worthy(&name, filters) {
            leaf_first.push(name);
        }
    }

    leaf_first.reverse();
    normalize_path(&leaf_first)
}

/// Whether a cleaned ancestor name may appear in a path: long enough and not
/// caught by any enabled filter category.
pub fn is_path_worthy(name: &str, filters: &PathFilters) -> bool {
    name.chars().count() >= MIN_NAME_LEN && classify(name, filters)
}

/// Strip one layer of `Memo(..)`, `Forward(..)`/`ForwardRef(..)` or `With*(..)`.
pub fn clean_component_name(name: &str) -> String {
    WRAPPER_REGEX.replace(name, "${3}").into_owned()
}

/// Drop empty segments, collapse consecutive duplicates, join with `.`.
pub fn normalize_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(segments.len());
    for segment in segments.iter().map(AsRef::as_ref) {
        if segment.is_empty() || kept.last() == Some(&segment) {
            continue;
        }
        kept.push(segment);
    }
    kept.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_empty_and_consecutive_duplicates() {
        assert_eq!(normalize_path(&["A", "A", "B", "", "C"]), "A.B.C");
        assert_eq!(normalize_path(&["A", "B", "A"]), "A.B.A");
        assert_eq!(normalize_path(&["A", "", "A"]), "A");
        assert_eq!(normalize_path::<&str>(&[]), "");
    }

    #[test]
    fn test_path_worthy_needs_length_and_no_match() {
        let filters = PathFilters::none();
        assert!(!is_path_worthy("Ab", &filters));
        assert!(is_path_worthy("Abc", &filters));
        assert!(!is_path_worthy("AuthProvider", &PathFilters::default()));
    }

    #[test]
    fn test_clean_component_name_unwraps_one_layer() {
        assert_eq!(clean_component_name("Memo(Foo)"), "Foo");
        assert_eq!(clean_component_name("ForwardRef(Bar)"), "Bar");
        assert_eq!(clean_component_name("Forward(Bar)"), "Bar");
        assert_eq!(clean_component_name("WithLogger(Baz)"), "Baz");
        assert_eq!(clean_component_name("Memo(ForwardRef(Qux))"), "ForwardRef(Qux)");
        assert_eq!(clean_component_name("Plain"), "Plain");
        assert_eq!(clean_component_name("Lazy(Foo)"), "Lazy(Foo)");
    }
}
