//! mongolab executable
//!
//! Connects to MongoDB, walks a single collection through insert, read,
//! update, delete, index and aggregation operations, and disconnects.

mod display;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use lab_core::{Config, DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_URI};
use lab_driver::{Lab, MongoStore};
use tracing_subscriber::{filter::EnvFilter, fmt};

use display::{DisplayConfig, OutputMode};

#[derive(Debug, Parser)]
#[command(
	name = "mongolab",
	version,
	about = "Walk a MongoDB collection through basic CRUD, index and aggregation operations"
)]
struct Args {
	/// MongoDB connection string
	#[arg(long, default_value = DEFAULT_URI)]
	uri: String,

	/// Database to use
	#[arg(long, default_value = DEFAULT_DATABASE)]
	database: String,

	/// Collection to use
	#[arg(long, default_value = DEFAULT_COLLECTION)]
	collection: String,

	/// Drop the collection before running, so the demo can be repeated
	#[arg(long)]
	reset: bool,

	/// How documents are printed
	#[arg(long, value_enum, default_value_t = OutputMode::Json)]
	output: OutputMode,

	/// Disable colored output
	#[arg(long)]
	no_color: bool,
}

impl Args {
	fn config(&self) -> Config {
		Config::default()
			.with_uri(&self.uri)
			.with_database(&self.database)
			.with_collection(&self.collection)
			.with_reset(self.reset)
	}

	fn display_config(&self) -> DisplayConfig {
		DisplayConfig {
			output_mode: self.output,
			use_colors: !self.no_color,
			..DisplayConfig::default()
		}
	}
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let display_config = args.display_config();
	if !display_config.use_colors {
		colored::control::set_override(false);
	}

	if let Err(e) = run(args.config(), &display_config).await {
		display::print_error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

async fn run(config: Config, display_config: &DisplayConfig) -> Result<()> {
	config.validate().context("Invalid configuration")?;

	let store = MongoStore::connect(&config)
		.await
		.with_context(|| format!("Failed to connect to {}", config.uri))?;
	display::print_connected(&config.uri, &config.database, &config.collection);

	if config.reset {
		display::print_warning(&format!("Collection '{}' will be dropped first", config.collection));
	}

	let lab = Lab::new(store);
	let outcome = session::run_session(&lab, config.reset, wait_for_shutdown_signal(), |report| {
		display::print_report(report, display_config)
	})
	.await;

	if outcome.closed() {
		display::print_closed();
	} else {
		display::print_warning("MongoDB connection did not close cleanly");
	}

	outcome.into_result().context("Walkthrough aborted")
}

async fn wait_for_shutdown_signal() {
	#[cfg(unix)]
	{
		use tokio::signal::unix::{SignalKind, signal};

		let (Ok(mut sigint), Ok(mut sigterm)) = (
			signal(SignalKind::interrupt()),
			signal(SignalKind::terminate()),
		) else {
			tracing::warn!("Signal handlers unavailable, running without interrupt support");
			return std::future::pending().await;
		};

		tokio::select! {
			_ = sigint.recv() => {},
			_ = sigterm.recv() => {},
		}
	}

	#[cfg(not(unix))]
	{
		if tokio::signal::ctrl_c().await.is_err() {
			tracing::warn!("Ctrl-C handler unavailable, running without interrupt support");
			std::future::pending::<()>().await;
		}
	}
}
