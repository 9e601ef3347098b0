//! core
//!
//! Core domain types, path canonicalization and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: DocPath, IndexPrefix, RevisionId
//! - [`canonical`] - Canonicalization of user-supplied names
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid paths from reaching the indexer
//! - Schemas are strict and self-describing

pub mod canonical;
pub mod config;
pub mod types;
