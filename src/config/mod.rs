//! Configuration loading and parsing for lintscope.
//!
//! This module handles:
//! - TOML and JSON config file parsing
//! - Directory cascade discovery
//! - `extends` expansion and layer merging

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{
	discover_configs, load_explicit_config, load_merged_config, merge_configs, personal_config_path,
};
pub use parser::{ConfigFormat, parse_config_file, parse_config_str};
pub use types::{Config, ConfigLayer, LoadedConfig, MergedConfig, Override, PatternGroup};
