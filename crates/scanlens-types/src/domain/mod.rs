pub mod geometry;
pub mod node;

pub use geometry::*;
pub use node::*;
