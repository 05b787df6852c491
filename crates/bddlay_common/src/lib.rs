//! Shared foundational types used across the bddlay workspace.
//!
//! Provides the content hash that ties a placement report back to the input
//! document it was computed from.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
