use crate::config::parser::parse_config_file;
use crate::config::types::{Config, ConfigLayer, LoadedConfig, MergedConfig, Override};
use crate::error::{LintscopeError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Config file names looked up in each directory, in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &[".lintscope.toml", ".lintscope.json"];

/// Find the config file of a single directory, if any.
pub fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
	CONFIG_FILE_NAMES
		.iter()
		.map(|name| dir.join(name))
		.find(|path| path.is_file())
}

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.lintscope.toml` / `.lintscope.json`
/// 2. Continue up the directory tree
/// 3. Stop after the first config with `root = true`
/// 4. If nothing was found, fall back to the personal config in the home directory
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		if let Some(config_path) = find_config_in_dir(&current_dir) {
			tracing::debug!(path = %config_path.display(), "found config");
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if configs.is_empty()
		&& let Some(personal) = load_personal_config()?
	{
		tracing::debug!(path = %personal.path.display(), "using personal config");
		configs.push(personal);
	}

	Ok(configs)
}

/// Load the personal config from the home directory if it exists.
fn load_personal_config() -> Result<Option<LoadedConfig>> {
	let Some(home_dir) = dirs::home_dir() else {
		return Ok(None);
	};

	match find_config_in_dir(&home_dir) {
		Some(path) => {
			let config = parse_config_file(&path)?;
			Ok(Some(LoadedConfig { config, path }))
		}
		None => Ok(None),
	}
}

/// Merge discovered configs into ordered layers.
///
/// Layers run from the outermost config to the innermost, so later layers
/// take precedence. File-path `extends` entries expand into layers placed
/// before the config that extends them and share its base directory.
pub fn merge_configs(configs: &[LoadedConfig]) -> Result<MergedConfig> {
	let mut merged = MergedConfig::default();

	for loaded in configs.iter().rev() {
		let base_dir = loaded
			.path
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_default();
		let mut chain = vec![canonical_or_given(&loaded.path)];
		expand_layer(
			loaded.config.clone(),
			&loaded.path,
			&base_dir,
			&mut chain,
			&mut merged.layers,
		)?;
	}

	Ok(merged)
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	merge_configs(&configs)
}

/// Load a single config file given explicitly, bypassing discovery.
///
/// Its globs are relative to `base_dir` rather than to the file's directory.
pub fn load_explicit_config(path: &Path, base_dir: &Path) -> Result<MergedConfig> {
	if !path.is_file() {
		return Err(LintscopeError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let config = parse_config_file(path)?;
	let mut merged = MergedConfig::default();
	let mut chain = vec![canonical_or_given(path)];
	expand_layer(config, path, base_dir, &mut chain, &mut merged.layers)?;
	Ok(merged)
}

/// Get the path of the personal config file.
pub fn personal_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(LintscopeError::HomeDirectoryNotFound)?;
	Ok(find_config_in_dir(&home_dir).unwrap_or_else(|| home_dir.join(CONFIG_FILE_NAMES[0])))
}

/// Whether an `extends` entry names a file rather than a preset.
pub fn is_file_reference(name: &str) -> bool {
	name.starts_with("./")
		|| name.starts_with("../")
		|| name.starts_with('/')
		|| name.ends_with(".json")
		|| name.ends_with(".toml")
}

fn split_extends(extends: &[String]) -> (Vec<&String>, Vec<String>) {
	let (files, presets): (Vec<&String>, Vec<&String>) =
		extends.iter().partition(|name| is_file_reference(name));
	(files, presets.into_iter().cloned().collect())
}

fn expand_layer(
	mut config: Config,
	source: &Path,
	base_dir: &Path,
	chain: &mut Vec<PathBuf>,
	layers: &mut Vec<ConfigLayer>,
) -> Result<()> {
	let (files, presets) = split_extends(&config.extends);

	for name in files {
		let path = resolve_extends(name, source, chain)?;
		tracing::debug!(extended = %path.display(), from = %source.display(), "expanding extends");
		let extended = parse_config_file(&path)?;

		chain.push(path.clone());
		expand_layer(extended, &path, base_dir, chain, layers)?;
		chain.pop();
	}

	config.extends = presets;
	config.overrides = config
		.overrides
		.iter()
		.map(|block| fold_override_extends(block, source, chain))
		.collect::<Result<Vec<_>>>()?;

	layers.push(ConfigLayer {
		config,
		source: source.to_path_buf(),
		base_dir: base_dir.to_path_buf(),
	});
	Ok(())
}

/// Fold file-path `extends` of an override into the override itself.
///
/// The extended configs contribute their base rules, plugins, parser and
/// parser options; the override's own values are applied on top.
fn fold_override_extends(block: &Override, source: &Path, chain: &mut Vec<PathBuf>) -> Result<Override> {
	let (files, presets) = split_extends(&block.extends);
	if files.is_empty() {
		return Ok(block.clone());
	}

	let mut folded = Override {
		files: block.files.clone(),
		excluded_files: block.excluded_files.clone(),
		..Default::default()
	};

	for name in files {
		fold_extended(name, source, chain, &mut folded)?;
	}
	absorb(
		&mut folded,
		&block.parser,
		&block.parser_options,
		&block.plugins,
		&presets,
		&block.rules,
	);
	Ok(folded)
}

fn fold_extended(
	name: &str,
	from: &Path,
	chain: &mut Vec<PathBuf>,
	target: &mut Override,
) -> Result<()> {
	let path = resolve_extends(name, from, chain)?;
	let config = parse_config_file(&path)?;
	let (files, presets) = split_extends(&config.extends);

	chain.push(path.clone());
	for inner in files {
		fold_extended(inner, &path, chain, target)?;
	}
	chain.pop();

	if !config.overrides.is_empty() || !config.patterns.is_empty() {
		tracing::warn!(
			path = %path.display(),
			"patterns and overrides of a config extended from an override are ignored"
		);
	}

	absorb(
		target,
		&config.parser,
		&config.parser_options,
		&config.plugins,
		&presets,
		&config.rules,
	);
	Ok(())
}

fn absorb(
	target: &mut Override,
	parser: &Option<String>,
	parser_options: &Map<String, Value>,
	plugins: &[String],
	extends: &[String],
	rules: &IndexMap<String, Value>,
) {
	if parser.is_some() {
		target.parser = parser.clone();
	}
	for (key, value) in parser_options {
		target.parser_options.insert(key.clone(), value.clone());
	}
	for plugin in plugins {
		if !target.plugins.contains(plugin) {
			target.plugins.push(plugin.clone());
		}
	}
	for preset in extends {
		if !target.extends.contains(preset) {
			target.extends.push(preset.clone());
		}
	}
	for (rule, value) in rules {
		target.rules.insert(rule.clone(), value.clone());
	}
}

/// Resolve an `extends` path relative to the file naming it.
fn resolve_extends(name: &str, from: &Path, chain: &[PathBuf]) -> Result<PathBuf> {
	let dir = from.parent().unwrap_or_else(|| Path::new("."));
	let path = std::fs::canonicalize(dir.join(name)).map_err(|_| {
		LintscopeError::ExtendedConfigNotFound {
			name: name.to_string(),
			from: from.to_path_buf(),
		}
	})?;

	if chain.contains(&path) {
		return Err(LintscopeError::ExtendsCycle { path });
	}
	Ok(path)
}

fn canonical_or_given(path: &Path) -> PathBuf {
	std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
