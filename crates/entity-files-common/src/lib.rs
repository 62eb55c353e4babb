//! # entity-files-common
//!
//! Shared configuration, error handling, and data model used across all
//! entity-files crates. No I/O and no HTTP routing lives here.

pub mod config;
pub mod error;
pub mod models;
