use crate::config::types::Config;
use crate::error::{LintscopeError, Result};
use std::path::Path;

/// Serialization format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
}

impl ConfigFormat {
	/// Pick the format from the file extension.
	pub fn from_path(path: &Path) -> Result<Self> {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("toml") => Ok(ConfigFormat::Toml),
			Some("json") => Ok(ConfigFormat::Json),
			_ => Err(LintscopeError::UnsupportedConfigFormat {
				path: path.to_path_buf(),
			}),
		}
	}
}

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let format = ConfigFormat::from_path(path)?;
	let content =
		std::fs::read_to_string(path).map_err(|source| LintscopeError::ConfigReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_config_str(&content, path, format)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path, format: ConfigFormat) -> Result<Config> {
	let config: Config = match format {
		ConfigFormat::Toml => {
			toml::from_str(content).map_err(|source| LintscopeError::ConfigParseError {
				path: path.to_path_buf(),
				source,
			})?
		}
		ConfigFormat::Json => {
			serde_json::from_str(content).map_err(|source| LintscopeError::ConfigJsonError {
				path: path.to_path_buf(),
				source,
			})?
		}
	};

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}
