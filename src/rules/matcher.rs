use crate::config::types::group_reference;
use crate::error::{LintscopeError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use indexmap::IndexMap;
use std::path::{Component, Path, PathBuf};

/// A compiled include/exclude selector.
///
/// Each side mixes plain globs with references to named pattern groups.
/// A path is selected when it matches an include glob or belongs to an
/// include group, and matches no exclude glob or exclude group.
#[derive(Debug, Clone)]
pub struct Selector {
	include: GlobSet,
	include_groups: Vec<usize>,
	exclude: GlobSet,
	exclude_groups: Vec<usize>,
}

impl Selector {
	/// Compile a selector.
	///
	/// `groups` holds the names of the groups visible to this selector, in
	/// declaration order; references resolve to indices into it.
	pub fn compile(
		files: &[String],
		excluded_files: &[String],
		groups: &IndexMap<String, Selector>,
		context: &str,
	) -> Result<Self> {
		let (include, include_groups) = split_patterns(files, groups, context)?;
		let (exclude, exclude_groups) = split_patterns(excluded_files, groups, context)?;
		Ok(Selector {
			include,
			include_groups,
			exclude,
			exclude_groups,
		})
	}

	/// Check a normalized relative path against this selector.
	///
	/// `memberships[i]` says whether the path belongs to group `i`.
	pub fn matches(&self, path: &Path, memberships: &[bool]) -> bool {
		let included = self.include.is_match(path)
			|| self.include_groups.iter().any(|&group| memberships[group]);
		if !included {
			return false;
		}

		let excluded = self.exclude.is_match(path)
			|| self.exclude_groups.iter().any(|&group| memberships[group]);
		!excluded
	}
}

/// Named pattern groups of one layer, compiled in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PatternGroups {
	groups: IndexMap<String, Selector>,
}

impl PatternGroups {
	pub fn compile<'a>(
		definitions: impl IntoIterator<Item = (&'a String, &'a [String], &'a [String])>,
	) -> Result<Self> {
		let mut groups = IndexMap::new();
		for (name, files, excluded_files) in definitions {
			let context = format!("pattern group `{name}`");
			// Compiled against the groups declared so far.
			let selector = Selector::compile(files, excluded_files, &groups, &context)?;
			groups.insert(name.clone(), selector);
		}
		Ok(PatternGroups { groups })
	}

	/// Compile a selector that may reference any group of this layer.
	pub fn selector(
		&self,
		files: &[String],
		excluded_files: &[String],
		context: &str,
	) -> Result<Selector> {
		Selector::compile(files, excluded_files, &self.groups, context)
	}

	/// Evaluate group membership for `path`.
	///
	/// Groups only reference earlier groups, so one pass in declaration order
	/// sees every dependency already evaluated.
	pub fn memberships(&self, path: &Path) -> Vec<bool> {
		let mut memberships = Vec::with_capacity(self.groups.len());
		for selector in self.groups.values() {
			let member = selector.matches(path, &memberships);
			memberships.push(member);
		}
		memberships
	}

	/// Names of the groups `path` belongs to.
	pub fn matching_names<'a>(&'a self, memberships: &'a [bool]) -> impl Iterator<Item = &'a str> {
		self.groups
			.keys()
			.zip(memberships)
			.filter(|(_, member)| **member)
			.map(|(name, _)| name.as_str())
	}
}

fn split_patterns(
	patterns: &[String],
	groups: &IndexMap<String, Selector>,
	context: &str,
) -> Result<(GlobSet, Vec<usize>)> {
	let mut globs = Vec::new();
	let mut references = Vec::new();

	for pattern in patterns {
		match group_reference(pattern) {
			Some(name) => {
				let index =
					groups
						.get_index_of(name)
						.ok_or_else(|| LintscopeError::UnknownPatternGroup {
							name: name.to_string(),
							context: context.to_string(),
						})?;
				references.push(index);
			}
			None => globs.push(pattern.as_str()),
		}
	}

	Ok((build_globset(&globs)?, references))
}

/// Rewrite a config glob into the form matched against relative paths.
///
/// - no `/`: match the file name at any depth
/// - leading `/` or `./`: anchored to the base directory
/// - trailing `/`: everything below the directory
pub fn normalize_glob(pattern: &str) -> String {
	let anchored = pattern.starts_with('/') || pattern.starts_with("./");
	let mut body = pattern.trim_start_matches("./").trim_start_matches('/').to_string();

	if body.ends_with('/') {
		body.push_str("**");
	}

	if !anchored && !body.contains('/') {
		body = format!("**/{body}");
	}
	body
}

/// Expand extglob groups into plain globs.
///
/// `?(a|b)` matches zero or one of its alternatives and `@(a|b)` exactly
/// one, so both expand into one glob per choice. The repeating and negated
/// forms `*(..)`, `+(..)` and `!(..)` have no finite expansion and are
/// rejected.
pub fn expand_extglob(pattern: &str) -> Result<Vec<String>> {
	let chars: Vec<char> = pattern.chars().collect();
	expand_chars(&chars).map_err(|reason| LintscopeError::UnsupportedGlob {
		pattern: pattern.to_string(),
		reason: reason.to_string(),
	})
}

fn expand_chars(chars: &[char]) -> std::result::Result<Vec<String>, &'static str> {
	let mut i = 0;
	while i < chars.len() {
		match chars[i] {
			'\\' => i += 2,
			kind @ ('?' | '@' | '*' | '+' | '!') if chars.get(i + 1) == Some(&'(') => {
				let close = closing_paren(chars, i + 1).ok_or("unclosed extglob group")?;
				if matches!(kind, '*' | '+' | '!') {
					return Err("only ?(..) and @(..) extglob groups are supported");
				}

				let mut choices = Vec::new();
				if kind == '?' {
					choices.push(String::new());
				}
				for alternative in split_alternatives(&chars[i + 2..close]) {
					choices.extend(expand_chars(alternative)?);
				}
				let tails = expand_chars(&chars[close + 1..])?;

				let prefix: String = chars[..i].iter().collect();
				let mut expanded = Vec::with_capacity(choices.len() * tails.len());
				for choice in &choices {
					for tail in &tails {
						expanded.push(format!("{prefix}{choice}{tail}"));
					}
				}
				return Ok(expanded);
			}
			_ => i += 1,
		}
	}
	Ok(vec![chars.iter().collect()])
}

/// Index of the `)` closing the group opened at `open`.
fn closing_paren(chars: &[char], open: usize) -> Option<usize> {
	let mut depth = 0;
	let mut i = open;
	while i < chars.len() {
		match chars[i] {
			'\\' => i += 1,
			'(' => depth += 1,
			')' => {
				depth -= 1;
				if depth == 0 {
					return Some(i);
				}
			}
			_ => {}
		}
		i += 1;
	}
	None
}

/// Split a group body on the `|` separators at its top level.
fn split_alternatives(body: &[char]) -> Vec<&[char]> {
	let mut alternatives = Vec::new();
	let mut depth = 0;
	let mut start = 0;
	let mut i = 0;
	while i < body.len() {
		match body[i] {
			'\\' => i += 1,
			'(' => depth += 1,
			')' => depth -= 1,
			'|' if depth == 0 => {
				alternatives.push(&body[start..i]);
				start = i + 1;
			}
			_ => {}
		}
		i += 1;
	}
	alternatives.push(&body[start..]);
	alternatives
}

/// Compile a list of config globs into a glob set.
pub fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		for variant in expand_extglob(pattern)? {
			let glob = GlobBuilder::new(&normalize_glob(&variant))
				.literal_separator(true)
				.build()
				.map_err(|source| LintscopeError::InvalidGlob {
					pattern: pattern.to_string(),
					source,
				})?;
			builder.add(glob);
		}
	}
	builder
		.build()
		.map_err(|source| LintscopeError::InvalidGlob {
			pattern: patterns.join(", "),
			source,
		})
}

/// Compile `ignorePatterns` with gitignore rules.
///
/// A pattern that matches a directory covers everything below it, and a
/// pattern without a slash matches a name at any depth.
pub fn build_ignore(base_dir: &Path, patterns: &[String]) -> Result<Gitignore> {
	let mut builder = GitignoreBuilder::new(base_dir);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|source| LintscopeError::InvalidIgnorePattern {
				pattern: pattern.clone(),
				source,
			})?;
	}
	builder
		.build()
		.map_err(|source| LintscopeError::InvalidIgnorePattern {
			pattern: patterns.join(", "),
			source,
		})
}

/// Whether a relative path, or any directory above it, is ignored.
pub fn is_ignored_by(ignore: &Gitignore, relative: &Path) -> bool {
	// Patterns only cover paths below the directory they were declared in.
	if relative.has_root() || relative.as_os_str().is_empty() {
		return false;
	}
	ignore.matched_path_or_any_parents(relative, false).is_ignore()
}

/// Make `path` relative to `base_dir` and drop `.` components.
///
/// Paths outside `base_dir` are matched as given.
pub fn relative_path(path: &Path, base_dir: &Path) -> PathBuf {
	let relative = path.strip_prefix(base_dir).unwrap_or(path);
	relative
		.components()
		.filter(|component| !matches!(component, Component::CurDir))
		.collect()
}
