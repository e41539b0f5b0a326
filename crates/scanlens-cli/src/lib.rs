// NOTE: scanlens CLI scope
//
// The CLI replays captured sessions offline. A scenario file holds a tree
// snapshot plus the raw interaction entries recorded against it; the CLI
// feeds the entries through the same monitor a live host would use and
// prints the slowest interactions with the component paths that own them.
// The inspect state machine needs a live host and has no CLI surface.

mod args;
mod commands;
mod handlers;
mod logging;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
