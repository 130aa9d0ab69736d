//! Password generator with a flat-file keyed store.
//!
//! Generates passwords from strength presets or custom character-class
//! counts and keeps them in a plain text file, one `key - password (strength)`
//! record per line.
//!
//! ## Modules
//! - `cli`: Command-line handlers
//! - `core`: Business logic (generator, record store, config, audit)
//! - `models`: Data structures
//! - `util`: Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
