use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lintscope_cli::config::template::generate_init_template;
use lintscope_cli::config::{
	MergedConfig, discover_configs, load_explicit_config, load_merged_config, merge_configs,
	personal_config_path,
};
use lintscope_cli::logging::init_tracing;
use lintscope_cli::report::{FileReport, OutputFormat, render_json_reports, render_text};
use lintscope_cli::rules::ConfigStore;

#[derive(Parser)]
#[command(name = "lintscope")]
#[command(
	author,
	version,
	about = "Resolve the effective lint rule set for files from cascading, glob-scoped configs"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Use this config file instead of discovering configs
	#[arg(short, long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Increase log verbosity (-v, -vv, -vvv)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Create a template .lintscope.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .lintscope.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the effective rules for each file
	Resolve {
		/// Files to resolve
		#[arg(required = true)]
		paths: Vec<PathBuf>,

		/// Output format
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the config cascade with source annotations
	Show,
	/// Check all config files for errors without resolving anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let explicit = cli.config.as_deref();
	match cli.command {
		Some(Commands::Resolve { paths, format }) => handle_resolve(explicit, &paths, format),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(explicit),
			ConfigAction::Validate => handle_config_validate(explicit),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(".lintscope.toml");

	if config_path.exists() && !force {
		anyhow::bail!(".lintscope.toml already exists. Use --force to overwrite.");
	}

	let template = generate_init_template();
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created .lintscope.toml");
	Ok(ExitCode::SUCCESS)
}

/// Load either the explicit config or the cascade for the current directory.
fn load_config(explicit: Option<&Path>) -> Result<MergedConfig> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match explicit {
		Some(path) => load_explicit_config(path, &cwd)
			.with_context(|| format!("Failed to load {}", path.display())),
		None => {
			let configs = discover_configs(&cwd).context("Failed to discover config files")?;
			merge_configs(&configs).context("Failed to merge configuration")
		}
	}
}

fn handle_resolve(explicit: Option<&Path>, paths: &[PathBuf], format: OutputFormat) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let explicit_store = match explicit {
		Some(_) => Some(compile_store(load_config(explicit)?)?),
		None => None,
	};
	// Files in the same directory share one cascade.
	let mut stores: HashMap<PathBuf, ConfigStore> = HashMap::new();

	// Paths on the command line are relative to the working directory.
	let mut resolved = Vec::with_capacity(paths.len());
	for path in paths {
		let absolute = cwd.join(path);
		let store: &ConfigStore = match explicit_store {
			Some(ref store) => store,
			None => {
				let dir = absolute.parent().unwrap_or(cwd.as_path()).to_path_buf();
				match stores.entry(dir) {
					Entry::Occupied(entry) => entry.into_mut(),
					Entry::Vacant(entry) => {
						let merged = load_merged_config(entry.key()).with_context(|| {
							format!("Failed to load configuration for {}", path.display())
						})?;
						entry.insert(compile_store(merged)?)
					}
				}
			}
		};
		let ignored = store.is_ignored(&absolute);
		let config = (!ignored).then(|| store.resolve(&absolute));
		resolved.push((path, ignored, config));
	}

	match format {
		OutputFormat::Text => {
			for (i, (path, ignored, config)) in resolved.iter().enumerate() {
				if i > 0 {
					println!();
				}
				match config {
					Some(config) if !ignored => print!("{}", render_text(path, config)),
					_ => println!("# {}\nignored", path.display()),
				}
			}
		}
		OutputFormat::Json => {
			let reports: Vec<FileReport<'_>> = resolved
				.iter()
				.map(|(path, ignored, config)| FileReport {
					path: path.as_path(),
					ignored: *ignored,
					config: config.as_ref(),
				})
				.collect();
			let json = render_json_reports(&reports).context("Failed to serialize output")?;
			println!("{}", json);
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn compile_store(merged: MergedConfig) -> Result<ConfigStore> {
	if merged.is_empty() {
		eprintln!("Warning: no configuration files found; every file resolves to no rules.");
	}
	ConfigStore::new(&merged).context("Failed to compile configuration")
}

fn handle_config_show(explicit: Option<&Path>) -> Result<ExitCode> {
	let merged = load_config(explicit)?;

	if merged.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration layers (outermost first):\n");

	for layer in &merged.layers {
		let config = &layer.config;
		println!("# Source: {}", layer.source.display());
		println!("# base dir: {}", layer.base_dir.display());
		println!("# root: {}", config.root);
		if let Some(ref parser) = config.parser {
			println!("# parser: {}", parser);
		}
		if !config.extends.is_empty() {
			println!("# extends: {}", config.extends.join(", "));
		}
		if !config.plugins.is_empty() {
			println!("# plugins: {}", config.plugins.join(", "));
		}
		if !config.ignore_patterns.is_empty() {
			println!("# ignorePatterns: {}", config.ignore_patterns.join(", "));
		}
		println!("# rules: {}", config.rules.len());
		println!();

		for (name, group) in &config.patterns {
			print!("  pattern group {}: {}", name, group.files().join(", "));
			if !group.excluded_files().is_empty() {
				print!(" (excluding {})", group.excluded_files().join(", "));
			}
			println!();
		}
		for (rule, value) in &config.rules {
			println!("  rule {}: {}", rule, value);
		}
		for (i, block) in config.overrides.iter().enumerate() {
			println!("  Override #{}:", i);
			println!("    files: {}", block.files.join(", "));
			if !block.excluded_files.is_empty() {
				println!("    excludedFiles: {}", block.excluded_files.join(", "));
			}
			for (rule, value) in &block.rules {
				println!("    rule {}: {}", rule, value);
			}
		}
		println!();
	}

	// Show personal config path
	if let Ok(personal_path) = personal_config_path() {
		println!("Personal config path: {}", personal_path.display());
		if personal_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(explicit: Option<&Path>) -> Result<ExitCode> {
	let validated = load_config(explicit).and_then(|merged| {
		ConfigStore::new(&merged).context("Failed to compile configuration")?;
		Ok(merged)
	});

	match validated {
		Ok(merged) => {
			if merged.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for layer in &merged.layers {
					println!(
						"  {} ({} rules, {} overrides)",
						layer.source.display(),
						layer.config.rules.len(),
						layer.config.overrides.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}
