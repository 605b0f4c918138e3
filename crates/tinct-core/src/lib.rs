//! Core types and utilities for the tinct color engine.
//!
//! This crate provides the foundational types used across all other tinct crates:
//! - Color tuples, color space tags, and per-channel values
//! - The CSS token shape consumed by the parser and evaluators
//! - Resolution options shared by every public operation
//! - Error types

pub mod errors;
pub mod fmt;
pub mod options;
pub mod tokens;
pub mod types;

pub use errors::*;
pub use options::*;
pub use tokens::*;
pub use types::*;
