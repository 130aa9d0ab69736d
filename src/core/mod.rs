//! Core business logic modules.

pub mod audit_log;
pub mod config;
pub mod file_lock;
pub mod generator;
pub mod paths;
pub mod store;
