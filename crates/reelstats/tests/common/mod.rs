//! Shared test utilities for reelstats integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against a temporary SQLite database
//! - Builders for the documents the aggregation job reads

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
