// src/errors.rs

//! Crate-wide error aliases.
//!
//! Thin re-export of `anyhow` so the rest of the crate has one import path;
//! structured error types can be added here later without touching callers.

pub use anyhow::{Error, Result};
