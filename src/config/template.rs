/// Starter `.lintscope.toml` written by `lintscope --init`.
pub fn generate_init_template() -> String {
	r#"# lintscope configuration
# Rules resolve per file: base `rules` first, then every matching
# `[[overrides]]` block in order. The last block to set a rule wins.

root = true
parser = "@typescript-eslint/parser"
parserOptions = { project = "./tsconfig.json" }
extends = ["plugin:@typescript-eslint/recommended", "next/core-web-vitals", "prettier"]
plugins = ["import", "unused-imports"]
# gitignore rules: a matched directory covers everything below it.
ignorePatterns = [".next", ".storybook", "src/gql/*", "next.config.mjs"]

# Named file-pattern groups. `@name` refers to a group declared above it.
# `?(x)` makes `x` optional.
[patterns]
srcTsFiles = ["src/**/*.ts", "src/**/*.tsx"]
srcTsStoriesFiles = ["src/**/*.stories.ts?(x)"]
srcTsTestFiles = ["src/**/*.test.ts?(x)"]
nextConventionFiles = [
	"src/app/**/@(default|error|layout|loading|not-found|page|route|template)?(.test).tsx",
]
srcTsModuleFiles = { files = ["@srcTsFiles"], excludedFiles = ["@srcTsStoriesFiles", "@nextConventionFiles"] }

[rules]
no-console = "error"
no-debugger = "error"
curly = "error"
"import/first" = "error"
"unused-imports/no-unused-imports" = "error"
"@typescript-eslint/no-unused-vars" = ["error", { varsIgnorePattern = "^_", argsIgnorePattern = "^_" }]

# Convention files and stories must default-export; everything else must not.
[[overrides]]
files = ["@srcTsModuleFiles"]
rules = { "import/no-default-export" = "error", "import/exports-last" = "error" }

[[overrides]]
files = ["@srcTsTestFiles"]
extends = ["plugin:testing-library/react"]
rules = { no-console = "off" }
"#
	.to_string()
}
