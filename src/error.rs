use std::path::PathBuf;

/// Library-level structured errors for lintscope.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum LintscopeError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigJsonError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Unsupported config format (expected .toml or .json): {path}")]
	UnsupportedConfigFormat { path: PathBuf },

	#[error("Invalid glob pattern: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error("Invalid glob pattern: {pattern} ({reason})")]
	UnsupportedGlob { pattern: String, reason: String },

	#[error("Invalid ignore pattern: {pattern}")]
	InvalidIgnorePattern {
		pattern: String,
		#[source]
		source: ignore::Error,
	},

	#[error("Invalid regex pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid setting for rule {rule}: {value}")]
	InvalidRuleSetting { rule: String, value: String },

	#[error("Invalid rule identifier: {rule}")]
	InvalidRuleId { rule: String },

	#[error("Unknown pattern group @{name} referenced from {context}")]
	UnknownPatternGroup { name: String, context: String },

	#[error("Override #{index} has an empty `files` list")]
	EmptyOverrideFiles { index: usize },

	#[error("Extended config not found: {name} (extended from {from})")]
	ExtendedConfigNotFound { name: String, from: PathBuf },

	#[error("Circular extends detected at: {path}")]
	ExtendsCycle { path: PathBuf },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using LintscopeError.
pub type Result<T> = std::result::Result<T, LintscopeError>;
