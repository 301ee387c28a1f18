//! Shared foundational types used across the PLHub toolchain.
//!
//! This crate provides the content-hash type used for build-cache
//! invalidation and the process exit-code constants shared by the CLI.

#![warn(missing_docs)]

pub mod exit;
pub mod hash;

pub use hash::ContentHash;
