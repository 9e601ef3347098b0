//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! All human-readable output goes through this module so quiet mode is
//! honored in one place.

pub mod output;
