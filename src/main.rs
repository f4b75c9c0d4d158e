mod app;
mod cache;
mod catalog;
mod config;
mod event;
mod loader;
mod logging;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catview")]
#[command(about = "A terminal viewer for remote catalogs, with an offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/catview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Catalog endpoint URL (overrides the config file)
  #[arg(short, long)]
  url: Option<String>,

  /// Keep the cache in memory only, discarding it on exit
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override the endpoint if specified on the command line
  let config = if let Some(url) = args.url {
    config::Config {
      api: config::ApiConfig { url, ..config.api },
      ..config
    }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(&config, args.no_cache)?;
  app.run().await?;

  Ok(())
}
