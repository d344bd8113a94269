//! Core operations.
//!
//! This module contains the business logic for shellpack commands,
//! separated from CLI argument parsing and output rendering.

pub mod build;
pub mod clean;
pub mod info;
pub mod version;

pub use build::build;
pub use clean::clean;
pub use info::info;
pub use version::version;
