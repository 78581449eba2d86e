#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Run the binary inside `dir`, with the home directory pointed at it so a
/// real personal config never leaks into the test.
fn lintscope_cmd(dir: &Path) -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("lintscope").unwrap();
	cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
	cmd
}

const NEXT_CONFIG: &str = r#"
root = true
plugins = ["@typescript-eslint"]

[patterns]
tests = ["*.test.ts", "*.test.tsx"]

[rules]
no-console = "error"
eqeqeq = ["error", "always"]

[[overrides]]
files = ["@tests"]
rules = { no-console = "off" }

[[overrides]]
files = ["src/**/*.tsx"]
excludedFiles = ["src/legacy/**"]
rules = { "@typescript-eslint/no-explicit-any" = "warn" }
"#;

/// A Next.js app config: source-only rules scoped by set differences of
/// pattern groups, extglob optional suffixes and gitignore-style ignores.
const NEXT_APP_CONFIG: &str = r#"
root = true
parser = "@typescript-eslint/parser"
parserOptions = { project = "./tsconfig.json" }
ignorePatterns = [
	"node_modules/*",
	"src/gql/*",
	"svgr/*",
	".storybook",
	".eslintrc.cjs",
	".prettierrc.cjs",
	"jest.config.mjs",
	"jest.setup.mjs",
	"next.config.mjs",
	"plopfile.mjs",
	"postcss.config.cjs",
	"tailwind.config.cjs",
]
extends = [
	"plugin:@typescript-eslint/recommended",
	"plugin:tailwindcss/recommended",
	"plugin:storybook/recommended",
	"next/core-web-vitals",
	"prettier",
]
plugins = ["import", "unused-imports", "tailwindcss"]

[patterns]
srcTsFiles = ["src/**/*.ts", "src/**/*.tsx"]
srcTsStoriesFiles = ["src/**/*.stories.ts?(x)"]
srcTsTestFiles = ["src/**/*.test.ts?(x)"]
nextConventionFilesWithTestFiles = [
	"src/app/**/default?(.test).tsx",
	"src/app/**/error?(.test).tsx",
	"src/app/**/layout?(.test).tsx",
	"src/app/**/loading?(.test).tsx",
	"src/app/**/not-found?(.test).tsx",
	"src/app/**/page?(.test).tsx",
	"src/app/**/route?(.test).tsx",
	"src/app/**/template?(.test).tsx",
]
srcTsModuleFiles = { files = ["@srcTsFiles"], excludedFiles = ["@srcTsStoriesFiles", "@nextConventionFilesWithTestFiles"] }

[rules]
"import/order" = ["error", { groups = ["builtin", "external", "internal"], "newlines-between" = "always" }]
"import/first" = "error"
"unused-imports/no-unused-imports" = "error"
curly = "error"
no-console = "error"
no-debugger = "error"
"react/function-component-definition" = ["error", { namedComponents = "arrow-function" }]
"@typescript-eslint/no-unused-vars" = ["error", { varsIgnorePattern = "^_", argsIgnorePattern = "^_" }]
"tailwindcss/classnames-order" = "error"

[[overrides]]
files = ["@srcTsModuleFiles"]
rules = { "import/no-default-export" = "error", "import/exports-last" = "error" }

[[overrides]]
files = ["@srcTsTestFiles"]
extends = ["plugin:testing-library/react"]
"#;

fn write_config(dir: &Path, content: &str) {
	fs::write(dir.join(".lintscope.toml"), content).unwrap();
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	lintscope_cmd(temp_dir.path())
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Resolve the effective lint rule set"));
}

#[test]
fn test_version_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	lintscope_cmd(temp_dir.path())
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("lintscope"));
}

#[test]
fn test_no_args_shows_help() {
	// With arg_required_else_help, no args should show help
	let temp_dir = tempfile::tempdir().unwrap();
	lintscope_cmd(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".lintscope.toml");

	lintscope_cmd(temp_dir.path())
		.arg("--init")
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .lintscope.toml"));

	assert!(config_path.exists());

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
	assert!(content.contains("[[overrides]]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "# existing");

	lintscope_cmd(temp_dir.path())
		.arg("--init")
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".lintscope.toml");
	write_config(temp_dir.path(), "# existing");

	lintscope_cmd(temp_dir.path())
		.args(["--init", "--force"])
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
}

#[test]
fn test_init_template_validates() {
	let temp_dir = tempfile::tempdir().unwrap();

	lintscope_cmd(temp_dir.path()).arg("--init").assert().success();

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration files found"));
}

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("2 overrides"));
}

#[test]
fn test_config_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "invalid toml [[[");

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_invalid_severity() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "root = true\n[rules]\nno-console = \"loud\"\n");

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("no-console"));
}

#[test]
fn test_config_validate_invalid_glob() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(
		temp_dir.path(),
		"root = true\n[[overrides]]\nfiles = [\"src/[oops\"]\nrules = {}\n",
	);

	lintscope_cmd(temp_dir.path())
		.args(["config", "validate"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("src/[oops"));
}

#[test]
fn test_config_show_displays_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	lintscope_cmd(temp_dir.path())
		.args(["config", "show"])
		.assert()
		.success()
		.stdout(predicate::str::contains("pattern group tests"))
		.stdout(predicate::str::contains("Override #1"))
		.stdout(predicate::str::contains("excludedFiles: src/legacy/**"));
}

// ============================================================================
// resolve tests
// ============================================================================

#[test]
fn test_resolve_test_file_turns_rule_off() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	lintscope_cmd(temp_dir.path())
		.args(["resolve", "src/app/page.test.tsx"])
		.assert()
		.success()
		.stdout(predicate::str::contains("  no-console: off"))
		.stdout(predicate::str::contains("groups: tests"));
}

#[test]
fn test_resolve_source_file_keeps_base_rule() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	lintscope_cmd(temp_dir.path())
		.args(["resolve", "src/app/page.tsx"])
		.assert()
		.success()
		.stdout(predicate::str::contains("  no-console: error"))
		.stdout(predicate::str::contains(
			"  @typescript-eslint/no-explicit-any: warn",
		));
}

#[test]
fn test_resolve_excluded_file_skips_override() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	lintscope_cmd(temp_dir.path())
		.args(["resolve", "src/legacy/widget.tsx"])
		.assert()
		.success()
		.stdout(predicate::str::contains("no-explicit-any").not());
}

#[test]
fn test_resolve_json_output() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);

	let output = lintscope_cmd(temp_dir.path())
		.args([
			"resolve",
			"--format",
			"json",
			"src/app/page.test.tsx",
			"node_modules/react/index.js",
		])
		.output()
		.unwrap();
	assert!(output.status.success());

	let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(value[0]["ignored"], serde_json::json!(false));
	assert_eq!(
		value[0]["config"]["rules"]["no-console"],
		serde_json::json!("off")
	);
	assert_eq!(
		value[0]["config"]["rules"]["eqeqeq"],
		serde_json::json!(["error", "always"])
	);
	assert_eq!(value[1]["ignored"], serde_json::json!(true));
}

#[test]
fn test_resolve_uses_nested_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);
	let app = temp_dir.path().join("apps/web");
	fs::create_dir_all(&app).unwrap();
	fs::write(
		app.join(".lintscope.json"),
		r#"{ "rules": { "no-console": "warn" } }"#,
	)
	.unwrap();

	lintscope_cmd(&app)
		.args(["resolve", "src/index.ts"])
		.assert()
		.success()
		.stdout(predicate::str::contains("  no-console: warn"));
}

#[test]
fn test_resolve_finds_nested_config_from_repo_root() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_CONFIG);
	let app = temp_dir.path().join("apps/web");
	fs::create_dir_all(&app).unwrap();
	fs::write(
		app.join(".lintscope.json"),
		r#"{ "rules": { "no-console": "warn" } }"#,
	)
	.unwrap();

	lintscope_cmd(temp_dir.path())
		.args(["resolve", "apps/web/src/index.ts", "src/index.ts"])
		.assert()
		.success()
		.stdout(
			predicate::str::is_match(
				r"(?s)# apps/web/src/index\.ts\n.*no-console: warn.*# src/index\.ts\n.*no-console: error",
			)
			.unwrap(),
		);
}

#[test]
fn test_resolve_next_app_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), NEXT_APP_CONFIG);

	let output = lintscope_cmd(temp_dir.path())
		.args([
			"resolve",
			"--format",
			"json",
			"src/app/page.tsx",
			"src/app/page.test.tsx",
			"src/components/Button.stories.tsx",
			"src/lib/util.ts",
			".storybook/main.ts",
			"src/gql/nested/types.ts",
		])
		.output()
		.unwrap();
	assert!(output.status.success());
	let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	let no_default_export = |i: usize| value[i]["config"]["rules"].get("import/no-default-export").cloned();
	let groups = |i: usize| value[i]["config"]["groups"].clone();
	let has_testing_preset = |i: usize| {
		value[i]["config"]["extends"]
			.as_array()
			.unwrap()
			.contains(&serde_json::json!("plugin:testing-library/react"))
	};

	// Next.js convention file
	assert_eq!(no_default_export(0), None);
	assert_eq!(
		groups(0),
		serde_json::json!(["srcTsFiles", "nextConventionFilesWithTestFiles"])
	);
	assert_eq!(value[0]["config"]["rules"]["no-console"], serde_json::json!("error"));
	assert!(!has_testing_preset(0));

	// Test of a convention file
	assert_eq!(no_default_export(1), None);
	assert_eq!(
		groups(1),
		serde_json::json!(["srcTsFiles", "srcTsTestFiles", "nextConventionFilesWithTestFiles"])
	);
	assert!(has_testing_preset(1));

	// Story
	assert_eq!(no_default_export(2), None);
	assert_eq!(groups(2), serde_json::json!(["srcTsFiles", "srcTsStoriesFiles"]));

	// Plain module
	assert_eq!(no_default_export(3), Some(serde_json::json!("error")));
	assert_eq!(
		value[3]["config"]["rules"]["import/exports-last"],
		serde_json::json!("error")
	);
	assert_eq!(groups(3), serde_json::json!(["srcTsFiles", "srcTsModuleFiles"]));
	assert_eq!(
		value[3]["config"]["parserOptions"]["project"],
		serde_json::json!("./tsconfig.json")
	);
	assert!(!has_testing_preset(3));

	// Ignored directories
	assert_eq!(value[4]["ignored"], serde_json::json!(true));
	assert!(value[4].get("config").is_none());
	assert_eq!(value[5]["ignored"], serde_json::json!(true));
}

#[test]
fn test_resolve_with_explicit_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join("strict.json");
	fs::write(&config_path, r#"{ "rules": { "no-debugger": 2 } }"#).unwrap();

	lintscope_cmd(temp_dir.path())
		.args(["--config", "strict.json", "resolve", "src/a.ts"])
		.assert()
		.success()
		.stdout(predicate::str::contains("  no-debugger: error"));
}

#[test]
fn test_resolve_with_missing_explicit_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	lintscope_cmd(temp_dir.path())
		.args(["--config", "missing.toml", "resolve", "src/a.ts"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("not found"));
}

#[test]
fn test_resolve_requires_paths() {
	let temp_dir = tempfile::tempdir().unwrap();

	lintscope_cmd(temp_dir.path())
		.arg("resolve")
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}
