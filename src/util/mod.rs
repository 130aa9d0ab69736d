//! Filesystem and clipboard helpers.

pub mod clipboard;
pub mod fs;
