use crate::error::{LintscopeError, Result};
use regex::Regex;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Enforcement level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Off,
	Warn,
	Error,
}

impl Severity {
	/// Parse a severity from a config value.
	///
	/// Accepts `"off"`, `"warn"`, `"error"` (any case) and the numbers 0, 1, 2.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::String(text) => match text.to_lowercase().as_str() {
				"off" | "0" => Some(Severity::Off),
				"warn" | "1" => Some(Severity::Warn),
				"error" | "2" => Some(Severity::Error),
				_ => None,
			},
			Value::Number(num) => match num.as_i64()? {
				0 => Some(Severity::Off),
				1 => Some(Severity::Warn),
				2 => Some(Severity::Error),
				_ => None,
			},
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Severity::Off => "off",
			Severity::Warn => "warn",
			Severity::Error => "error",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A rule's severity together with its rule-specific options.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
	pub severity: Severity,

	/// Options passed to the rule, in order. Their shape is rule-specific.
	pub options: Vec<Value>,
}

impl RuleEntry {
	pub fn new(severity: Severity) -> Self {
		RuleEntry {
			severity,
			options: Vec::new(),
		}
	}

	/// Parse either a bare severity or a `[severity, option, ...]` array.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Array(items) => {
				let (first, rest) = items.split_first()?;
				Some(RuleEntry {
					severity: Severity::from_value(first)?,
					options: rest.to_vec(),
				})
			}
			other => Severity::from_value(other).map(RuleEntry::new),
		}
	}

	/// Parse a rule entry, reporting the rule name on failure.
	pub fn parse(rule: &str, value: &Value) -> Result<Self> {
		RuleEntry::from_value(value).ok_or_else(|| LintscopeError::InvalidRuleSetting {
			rule: rule.to_string(),
			value: value.to_string(),
		})
	}

	pub fn is_enabled(&self) -> bool {
		self.severity != Severity::Off
	}
}

/// Entries serialize the way they are written: `"error"` or `["error", {...}]`.
impl Serialize for RuleEntry {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		if self.options.is_empty() {
			return self.severity.serialize(serializer);
		}
		let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
		seq.serialize_element(&self.severity)?;
		for option in &self.options {
			seq.serialize_element(option)?;
		}
		seq.end()
	}
}

const RULE_ID_PATTERN: &str = r"^(@[a-z0-9][a-z0-9._-]*/)?([a-z0-9][a-z0-9._-]*/)?[a-z0-9][a-z0-9_-]*$";

/// Validates rule identifiers such as `no-console`, `react/jsx-key` or
/// `@typescript-eslint/no-unused-vars`.
#[derive(Debug)]
pub struct RuleIdValidator {
	pattern: Regex,
}

impl RuleIdValidator {
	pub fn new() -> Result<Self> {
		let pattern = Regex::new(RULE_ID_PATTERN).map_err(|source| LintscopeError::InvalidRegex {
			pattern: RULE_ID_PATTERN.to_string(),
			source,
		})?;
		Ok(RuleIdValidator { pattern })
	}

	pub fn validate(&self, rule: &str) -> Result<()> {
		if self.pattern.is_match(rule) {
			Ok(())
		} else {
			Err(LintscopeError::InvalidRuleId {
				rule: rule.to_string(),
			})
		}
	}
}

/// The plugin a rule id belongs to, if any.
///
/// `react/jsx-key` -> `react`, `@typescript-eslint/no-explicit-any` ->
/// `@typescript-eslint`, `@scope/plugin/rule` -> `@scope/plugin`.
pub fn plugin_prefix(rule: &str) -> Option<&str> {
	let (prefix, _) = rule.rsplit_once('/')?;
	Some(prefix)
}
