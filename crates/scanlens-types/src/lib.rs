pub mod domain;
pub mod error;
pub mod filters;
pub mod inspect;
pub mod interaction;

pub use domain::*;
pub use error::{Error, Result};
pub use filters::*;
pub use inspect::*;
pub use interaction::*;
