use crate::error::LintscopeError;
use crate::rules::entry::{RuleEntry, RuleIdValidator};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Top-level configuration from a `.lintscope.toml` or `.lintscope.json` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	/// If true, stop the directory cascade at this file.
	#[serde(default)]
	pub root: bool,

	/// Parser module the consumer should load.
	#[serde(default)]
	pub parser: Option<String>,

	/// Options handed to the parser untouched.
	#[serde(default)]
	pub parser_options: Map<String, Value>,

	/// Extended configs: file paths are loaded, anything else is a named preset.
	#[serde(default, deserialize_with = "one_or_many")]
	pub extends: Vec<String>,

	#[serde(default)]
	pub plugins: Vec<String>,

	/// Named file-pattern groups, in declaration order.
	#[serde(default)]
	pub patterns: IndexMap<String, PatternGroup>,

	/// Base rule set. Values are kept raw until the config is compiled.
	#[serde(default)]
	pub rules: IndexMap<String, Value>,

	/// Override blocks. Later blocks take precedence.
	#[serde(default)]
	pub overrides: Vec<Override>,

	/// Files the consumer should not lint at all.
	#[serde(default)]
	pub ignore_patterns: Vec<String>,
}

/// A scoped set of rule reassignments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
	/// Globs or `@group` references selecting the files this block applies to.
	#[serde(deserialize_with = "one_or_many")]
	pub files: Vec<String>,

	/// Globs or `@group` references removed from `files` for this block only.
	#[serde(default, deserialize_with = "one_or_many")]
	pub excluded_files: Vec<String>,

	#[serde(default, deserialize_with = "one_or_many")]
	pub extends: Vec<String>,

	#[serde(default)]
	pub parser: Option<String>,

	#[serde(default)]
	pub parser_options: Map<String, Value>,

	#[serde(default)]
	pub plugins: Vec<String>,

	#[serde(default)]
	pub rules: IndexMap<String, Value>,
}

/// A named collection of glob patterns.
///
/// Written either as a plain list or as a `files` / `excludedFiles` pair,
/// which makes set differences such as "sources minus tests" expressible.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternGroup {
	List(Vec<String>),
	#[serde(rename_all = "camelCase")]
	Scoped {
		#[serde(deserialize_with = "one_or_many")]
		files: Vec<String>,
		#[serde(default, deserialize_with = "one_or_many")]
		excluded_files: Vec<String>,
	},
}

impl PatternGroup {
	pub fn files(&self) -> &[String] {
		match self {
			PatternGroup::List(files) => files,
			PatternGroup::Scoped { files, .. } => files,
		}
	}

	pub fn excluded_files(&self) -> &[String] {
		match self {
			PatternGroup::List(_) => &[],
			PatternGroup::Scoped { excluded_files, .. } => excluded_files,
		}
	}
}

/// Prefix marking a pattern entry as a reference to a named group.
pub const GROUP_REFERENCE_PREFIX: char = '@';

/// Return the group name if `pattern` is a group reference.
///
/// `@tests` refers to group `tests`. Scoped package-like globs such as
/// `@types/**` are still globs because they contain a `/`.
pub fn group_reference(pattern: &str) -> Option<&str> {
	let name = pattern.strip_prefix(GROUP_REFERENCE_PREFIX)?;
	if name.is_empty() || name.contains('/') {
		None
	} else {
		Some(name)
	}
}

/// Accept a single string or a list of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum OneOrMany {
		One(String),
		Many(Vec<String>),
	}

	Ok(match OneOrMany::deserialize(deserializer)? {
		OneOrMany::One(value) => vec![value],
		OneOrMany::Many(values) => values,
	})
}

impl Config {
	/// Validate rule entries, rule identifiers, override scopes and group references.
	pub fn validate(&self) -> Result<(), LintscopeError> {
		let validator = RuleIdValidator::new()?;
		validate_rules(&self.rules, &validator)?;

		for (position, (name, group)) in self.patterns.iter().enumerate() {
			let context = format!("pattern group `{name}`");
			for pattern in group.files().iter().chain(group.excluded_files()) {
				let Some(target) = group_reference(pattern) else {
					continue;
				};
				// Only groups declared earlier are visible.
				let declared_before = self
					.patterns
					.get_index_of(target)
					.is_some_and(|index| index < position);
				if !declared_before {
					return Err(LintscopeError::UnknownPatternGroup {
						name: target.to_string(),
						context,
					});
				}
			}
		}

		for (index, block) in self.overrides.iter().enumerate() {
			if block.files.is_empty() {
				return Err(LintscopeError::EmptyOverrideFiles { index });
			}
			for pattern in block.files.iter().chain(&block.excluded_files) {
				if let Some(target) = group_reference(pattern)
					&& !self.patterns.contains_key(target)
				{
					return Err(LintscopeError::UnknownPatternGroup {
						name: target.to_string(),
						context: format!("override #{index}"),
					});
				}
			}
			validate_rules(&block.rules, &validator)?;
		}

		Ok(())
	}
}

fn validate_rules(
	rules: &IndexMap<String, Value>,
	validator: &RuleIdValidator,
) -> Result<(), LintscopeError> {
	for (rule, value) in rules {
		validator.validate(rule)?;
		RuleEntry::parse(rule, value)?;
	}
	Ok(())
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// One configuration document placed in the cascade.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
	/// The configuration, with file-path `extends` already expanded.
	/// Its `extends` lists only named presets.
	pub config: Config,

	/// The file this layer was read from.
	pub source: PathBuf,

	/// Directory the layer's globs are relative to.
	pub base_dir: PathBuf,
}

/// Merged configuration from every file in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Layers from outermost to innermost; later layers take precedence.
	pub layers: Vec<ConfigLayer>,
}

impl MergedConfig {
	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
}
