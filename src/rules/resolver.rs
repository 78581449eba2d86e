//! The compiled rule configuration and per-file resolution.

use crate::config::types::{ConfigLayer, MergedConfig, Override};
use crate::error::Result;
use crate::rules::entry::{RuleEntry, plugin_prefix};
use crate::rules::matcher::{
	PatternGroups, Selector, build_globset, build_ignore, is_ignored_by, relative_path,
};
use globset::GlobSet;
use ignore::gitignore::Gitignore;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Ignored regardless of configuration.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/node_modules/**"];

/// Settings contributed by a base rule block or an override block.
#[derive(Debug, Clone, Default)]
struct Contribution {
	parser: Option<String>,
	parser_options: Map<String, Value>,
	plugins: Vec<String>,
	extends: Vec<String>,
	rules: IndexMap<String, RuleEntry>,
}

impl Contribution {
	fn from_parts(
		parser: &Option<String>,
		parser_options: &Map<String, Value>,
		plugins: &[String],
		extends: &[String],
		rules: &IndexMap<String, Value>,
	) -> Result<Self> {
		let rules = rules
			.iter()
			.map(|(name, value)| Ok((name.clone(), RuleEntry::parse(name, value)?)))
			.collect::<Result<IndexMap<_, _>>>()?;

		Ok(Contribution {
			parser: parser.clone(),
			parser_options: parser_options.clone(),
			plugins: plugins.to_vec(),
			extends: extends.to_vec(),
			rules,
		})
	}
}

#[derive(Debug, Clone)]
struct CompiledOverride {
	index: usize,
	selector: Selector,
	contribution: Contribution,
}

/// One cascade layer with its globs compiled.
#[derive(Debug, Clone)]
struct CompiledLayer {
	source: PathBuf,
	base_dir: PathBuf,
	groups: PatternGroups,
	base: Contribution,
	overrides: Vec<CompiledOverride>,
	ignore: Gitignore,
}

impl CompiledLayer {
	fn compile(layer: &ConfigLayer) -> Result<Self> {
		let config = &layer.config;

		let groups = PatternGroups::compile(
			config
				.patterns
				.iter()
				.map(|(name, group)| (name, group.files(), group.excluded_files())),
		)?;

		let base = Contribution::from_parts(
			&config.parser,
			&config.parser_options,
			&config.plugins,
			&config.extends,
			&config.rules,
		)?;

		let overrides = config
			.overrides
			.iter()
			.enumerate()
			.map(|(index, block)| compile_override(index, block, &groups))
			.collect::<Result<Vec<_>>>()?;

		let ignore = build_ignore(&layer.base_dir, &config.ignore_patterns)?;

		Ok(CompiledLayer {
			source: layer.source.clone(),
			base_dir: layer.base_dir.clone(),
			groups,
			base,
			overrides,
			ignore,
		})
	}

	fn declared_plugins(&self) -> impl Iterator<Item = &String> {
		self.base
			.plugins
			.iter()
			.chain(self.overrides.iter().flat_map(|o| &o.contribution.plugins))
	}

	fn rule_names(&self) -> impl Iterator<Item = &String> {
		self.base
			.rules
			.keys()
			.chain(self.overrides.iter().flat_map(|o| o.contribution.rules.keys()))
	}
}

fn compile_override(index: usize, block: &Override, groups: &PatternGroups) -> Result<CompiledOverride> {
	let selector = groups.selector(
		&block.files,
		&block.excluded_files,
		&format!("override #{index}"),
	)?;
	let contribution = Contribution::from_parts(
		&block.parser,
		&block.parser_options,
		&block.plugins,
		&block.extends,
		&block.rules,
	)?;
	Ok(CompiledOverride {
		index,
		selector,
		contribution,
	})
}

/// An override block that applied to a resolved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
	/// Config file declaring the block.
	pub source: PathBuf,

	/// Position of the block in that file's `overrides` list.
	pub index: usize,
}

/// The effective configuration for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedConfig {
	pub parser: Option<String>,

	#[serde(rename = "parserOptions")]
	pub parser_options: Map<String, Value>,

	pub plugins: Vec<String>,

	/// Named presets the consumer should expand.
	pub extends: Vec<String>,

	/// Effective rule entries keyed by rule id.
	pub rules: BTreeMap<String, RuleEntry>,

	/// Pattern groups the file belongs to.
	pub groups: Vec<String>,

	/// Override blocks that applied, in application order.
	pub overrides: Vec<AppliedOverride>,
}

impl ResolvedConfig {
	fn apply(&mut self, contribution: &Contribution) {
		if let Some(ref parser) = contribution.parser {
			self.parser = Some(parser.clone());
		}
		for (key, value) in &contribution.parser_options {
			self.parser_options.insert(key.clone(), value.clone());
		}
		for plugin in &contribution.plugins {
			if !self.plugins.contains(plugin) {
				self.plugins.push(plugin.clone());
			}
		}
		for preset in &contribution.extends {
			if !self.extends.contains(preset) {
				self.extends.push(preset.clone());
			}
		}
		// Later entries replace earlier ones wholesale, options included.
		for (rule, entry) in &contribution.rules {
			self.rules.insert(rule.clone(), entry.clone());
		}
	}

	/// Look up the effective entry of one rule.
	pub fn rule(&self, name: &str) -> Option<&RuleEntry> {
		self.rules.get(name)
	}

	/// Rules whose severity is not `off`.
	pub fn enabled_rules(&self) -> impl Iterator<Item = (&String, &RuleEntry)> {
		self.rules.iter().filter(|(_, entry)| entry.is_enabled())
	}
}

/// The loaded rule configuration.
///
/// Built once from a [`MergedConfig`] and immutable afterwards, so it can be
/// shared across threads to resolve many files.
#[derive(Debug, Clone)]
pub struct ConfigStore {
	layers: Vec<CompiledLayer>,
	default_ignore: GlobSet,
}

impl ConfigStore {
	/// Compile every layer of a merged config.
	pub fn new(merged: &MergedConfig) -> Result<Self> {
		let layers = merged
			.layers
			.iter()
			.map(CompiledLayer::compile)
			.collect::<Result<Vec<_>>>()?;
		let default_ignore = build_globset(DEFAULT_IGNORE_PATTERNS)?;

		let store = ConfigStore {
			layers,
			default_ignore,
		};
		store.warn_undeclared_plugins();
		Ok(store)
	}

	/// Resolve the effective rule set for `path`.
	///
	/// For each layer, outermost first: apply its base rules, evaluate its
	/// pattern groups, then apply every override block whose selector matches,
	/// in declaration order. Later assignments replace earlier ones.
	pub fn resolve(&self, path: &Path) -> ResolvedConfig {
		let mut resolved = ResolvedConfig::default();

		for layer in &self.layers {
			let relative = relative_path(path, &layer.base_dir);
			resolved.apply(&layer.base);

			let memberships = layer.groups.memberships(&relative);
			for name in layer.groups.matching_names(&memberships) {
				if !resolved.groups.iter().any(|group| group == name) {
					resolved.groups.push(name.to_string());
				}
			}

			for block in &layer.overrides {
				if block.selector.matches(&relative, &memberships) {
					tracing::debug!(
						path = %path.display(),
						source = %layer.source.display(),
						index = block.index,
						"applying override"
					);
					resolved.apply(&block.contribution);
					resolved.overrides.push(AppliedOverride {
						source: layer.source.clone(),
						index: block.index,
					});
				}
			}
		}

		resolved
	}

	/// Whether the consumer should skip `path` entirely.
	pub fn is_ignored(&self, path: &Path) -> bool {
		if self.default_ignore.is_match(path) {
			return true;
		}
		self.layers.iter().any(|layer| {
			let relative = relative_path(path, &layer.base_dir);
			self.default_ignore.is_match(&relative) || is_ignored_by(&layer.ignore, &relative)
		})
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	/// Rules from a plugin that no layer declares cannot be loaded by the
	/// consumer.
	fn warn_undeclared_plugins(&self) {
		let declared: Vec<&str> = self
			.layers
			.iter()
			.flat_map(CompiledLayer::declared_plugins)
			.map(|plugin| normalize_plugin_name(plugin))
			.collect();
		let has_presets = self.layers.iter().any(|layer| {
			!layer.base.extends.is_empty()
				|| layer.overrides.iter().any(|o| !o.contribution.extends.is_empty())
		});

		for layer in &self.layers {
			for rule in layer.rule_names() {
				let Some(plugin) = plugin_prefix(rule) else {
					continue;
				};
				if declared.contains(&plugin) {
					continue;
				}
				// Presets may bring their own plugins.
				if has_presets {
					tracing::debug!(rule = %rule, plugin, "rule plugin not declared locally");
				} else {
					tracing::warn!(
						rule = %rule,
						plugin,
						source = %layer.source.display(),
						"rule uses a plugin that is not declared in `plugins`"
					);
				}
			}
		}
	}
}

/// `eslint-plugin-react` and `react` name the same plugin, as do
/// `@scope/eslint-plugin` and `@scope`.
fn normalize_plugin_name(name: &str) -> &str {
	if let Some(short) = name.strip_prefix("eslint-plugin-") {
		return short;
	}
	if let Some(scope) = name.strip_suffix("/eslint-plugin") {
		return scope;
	}
	name
}
