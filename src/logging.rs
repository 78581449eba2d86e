use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a given `-v` count. `RUST_LOG` takes precedence.
pub fn default_filter(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "lintscope_cli=warn",
		1 => "lintscope_cli=info",
		2 => "lintscope_cli=debug",
		_ => "lintscope_cli=trace",
	}
}

/// Install the global tracing subscriber. Logs go to stderr so that
/// resolved output on stdout stays machine-readable.
pub fn init_tracing(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false),
		)
		.try_init();
}
