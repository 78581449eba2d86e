//! Rendering of resolved configurations.

use crate::rules::ResolvedConfig;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Output format for `lintscope resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

/// Resolution result for one path, as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
	pub path: &'a Path,
	pub ignored: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub config: Option<&'a ResolvedConfig>,
}

/// Render a resolved configuration as human-readable text.
pub fn render_text(path: &Path, resolved: &ResolvedConfig) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "# {}", path.display());

	if let Some(ref parser) = resolved.parser {
		let _ = writeln!(out, "parser: {}", parser);
	}
	if !resolved.extends.is_empty() {
		let _ = writeln!(out, "extends: {}", resolved.extends.join(", "));
	}
	if !resolved.plugins.is_empty() {
		let _ = writeln!(out, "plugins: {}", resolved.plugins.join(", "));
	}
	if !resolved.groups.is_empty() {
		let _ = writeln!(out, "groups: {}", resolved.groups.join(", "));
	}
	for applied in &resolved.overrides {
		let _ = writeln!(
			out,
			"override: #{} from {}",
			applied.index,
			applied.source.display()
		);
	}

	let _ = writeln!(out, "rules ({} enabled):", resolved.enabled_rules().count());
	if resolved.rules.is_empty() {
		let _ = writeln!(out, "  (none)");
	}
	for (name, entry) in &resolved.rules {
		if entry.options.is_empty() {
			let _ = writeln!(out, "  {}: {}", name, entry.severity);
		} else {
			let options: Vec<String> = entry.options.iter().map(|o| o.to_string()).collect();
			let _ = writeln!(out, "  {}: {} {}", name, entry.severity, options.join(" "));
		}
	}
	out
}

/// Render a resolved configuration as pretty-printed JSON.
pub fn render_json(resolved: &ResolvedConfig) -> serde_json::Result<String> {
	serde_json::to_string_pretty(resolved)
}

/// Render a batch of file reports as one JSON array.
pub fn render_json_reports(reports: &[FileReport<'_>]) -> serde_json::Result<String> {
	serde_json::to_string_pretty(reports)
}
