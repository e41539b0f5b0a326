//! Testing infrastructure for scanlens integration tests.
//!
//! This crate provides utilities for writing integration tests:
//! - `FakeHost`: in-memory host that records every overlay, panel and listener call
//! - `FakeSource`: interaction source that records subscriptions
//! - `fixtures`: sample trees and scenarios
//! - `TestWorld`: isolated environment for running the CLI
//! - `assertions`: checks over the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod host;
pub mod world;

pub use host::{Draw, FakeHost, FakeSource, PanelCall};
pub use world::{CliResult, TestWorld};
