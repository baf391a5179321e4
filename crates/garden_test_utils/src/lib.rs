//! Shared test utilities for the Chronogarden workspace.
//!
//! Re-exports the core crate's demo fixtures and adds a determinism
//! harness for asserting that runs reproduce bit-for-bit.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod determinism;

/// Demo catalog and engine builders, re-exported from the core crate's
/// testkit so every test crate shares one canonical fixture set.
pub mod fixtures {
    pub use garden_core::fixtures::{demo_catalog, demo_engine, seeded_rng, ts};
}
