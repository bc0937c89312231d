pub mod config;
pub mod error;

// Core: normalization, matching, autocomplete
pub mod autocomplete;
pub mod matcher;
pub mod recipe;

// Session controller
pub mod finder;

// Optional speech I/O
pub mod voice;

// Presentation
pub mod api;
pub mod cli;
pub mod web;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use finder::Finder;
