//! Core utilities and types for shellpack.
//!
//! This crate provides the filesystem helpers, version handling and the
//! external tool runner shared by the rest of the workspace.

mod file;
mod process;
mod utils;
mod version;

// File operations
pub use file::{
    copy_file, copy_tree_filtered, dir_contains_file, relative_files, remove_dir_if_exists,
    remove_file_if_exists,
};
// External tools
pub use process::{Invocation, SystemRunner, ToolError, ToolOutput, ToolRunner};
// String utilities
pub use utils::{file_name_ends_with, to_posix_path, xml_escape};
pub use version::{Bump, Version};
