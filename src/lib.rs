//! Lintscope - resolve the effective lint rule set for a file.
//!
//! This library provides the core functionality for lintscope, including:
//! - Configuration file parsing (TOML and JSON) and cascade discovery
//! - `extends` expansion into ordered config layers
//! - Named file-pattern groups and glob-scoped override blocks
//! - Per-file resolution of rule severities and options
//!
//! # Example
//!
//! ```no_run
//! use lintscope_cli::config::load_merged_config;
//! use lintscope_cli::rules::ConfigStore;
//! use std::path::Path;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let merged = load_merged_config(&cwd).unwrap();
//! let store = ConfigStore::new(&merged).unwrap();
//!
//! let resolved = store.resolve(Path::new("src/app/page.test.tsx"));
//! if let Some(entry) = resolved.rule("no-console") {
//!     println!("no-console: {}", entry.severity);
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod rules;

pub use error::{LintscopeError, Result};
