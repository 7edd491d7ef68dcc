//! Configuration module for the bill splitter
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SplitterPaths;
pub use settings::Settings;
