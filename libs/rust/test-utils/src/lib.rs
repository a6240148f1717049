//! Shared test utilities for platform token crates.
//!
//! This crate provides:
//! - Proptest generators for identities, grants and claims
//! - Test fixtures with sample credentials

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
