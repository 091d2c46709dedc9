//! Shared setup for the command line tools.

use core::fmt;
use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging()
{
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
		.init();
}

/// Prints `context: err` followed by every error in its source chain.
pub fn report(context: fmt::Arguments<'_>, err: &dyn Error)
{
	eprintln!("{context}: {err}");
	let mut source = err.source();
	while let Some(src) = source
	{
		eprintln!("\tsource: {src}");
		source = src.source();
	}
}
