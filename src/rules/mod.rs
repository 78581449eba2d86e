//! Rule entries, glob matching and per-file resolution.
//!
//! This module handles:
//! - Severity and option parsing for rule entries
//! - Glob and pattern-group matching against relative paths
//! - Resolving the effective rule set for a file

pub mod entry;
pub mod matcher;
pub mod resolver;

pub use entry::{RuleEntry, Severity};
pub use matcher::{PatternGroups, Selector};
pub use resolver::{AppliedOverride, ConfigStore, ResolvedConfig};
