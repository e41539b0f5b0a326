// Engine module - pure algorithms over host-observed data
// This layer sits between the shared types and the host-facing runtime

pub mod filter;
pub mod interaction;
pub mod path;
pub mod tree;

pub use filter::{PathFilterEngine, category_matches, classify};
pub use interaction::{
    EntryOutcome, InteractionAggregator, LongestInteractionIndex, SharedInteractionIndex,
};
pub use path::{clean_component_name, is_path_worthy, normalize_path, resolve_path};
pub use tree::{Ancestors, ComponentTree};
