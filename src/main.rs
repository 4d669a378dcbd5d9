//! asset-composer - resolve, version and serve vendor assets from the command line.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use asset_composer::{AssetComposer, ComposerConfig, UnknownTypes};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// asset-composer - versioned vendor asset resolver
#[derive(Parser, Debug)]
#[command(name = "asset-composer")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Project directory search prefixes are resolved against
  #[arg(short, long, default_value = ".")]
  project_dir: PathBuf,

  /// Configuration file (defaults to asset_composer.{yaml,yml,json} in the project directory)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Log level (trace, debug, info, warn, error)
  #[arg(long, default_value = "warn")]
  log_level: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Print the versioned URL for a logical asset path
  Url {
    /// Logical path, e.g. twbs/bootstrap/dist/css/bootstrap.css
    logical_path: String,
  },

  /// Print the current version token for a logical asset path
  Token {
    /// Logical path, e.g. twbs/bootstrap/dist/css/bootstrap.css
    logical_path: String,
  },

  /// Write an asset to stdout exactly as it would be served
  Fetch {
    /// Asset namespace
    namespace: String,
    /// Asset package
    package: String,
    /// Path of the asset below the package directory
    asset: String,
    /// Version token the asset URL carries
    #[arg(long, short)]
    token: String,
    /// Print response headers to stderr
    #[arg(long)]
    headers: bool,
    /// Serve unknown extensions as text/plain instead of failing
    #[arg(long)]
    lenient: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .init();

  let config = match &cli.config {
    Some(path) => ComposerConfig::from_path(path)?,
    None => ComposerConfig::discover(&cli.project_dir),
  };
  let composer = AssetComposer::new(&cli.project_dir, config);

  match cli.command {
    Commands::Url { logical_path } => {
      let url = composer
        .get_asset_url(&logical_path)
        .with_context(|| format!("failed to build URL for {logical_path}"))?;
      println!("{url}");
    }
    Commands::Token { logical_path } => {
      let token = composer
        .version_token(&logical_path)
        .with_context(|| format!("failed to compute version for {logical_path}"))?;
      println!("{token}");
    }
    Commands::Fetch {
      namespace,
      package,
      asset,
      token,
      headers,
      lenient,
    } => {
      let composer = if lenient {
        composer.with_unknown_types(UnknownTypes::Fallback)
      } else {
        composer
      };
      let response = composer
        .get_asset_file(&namespace, &package, &asset, &token)
        .with_context(|| format!("failed to serve {namespace}/{package}/{asset}"))?;

      if headers {
        for (name, value) in &response.headers {
          eprintln!("{name}: {value}");
        }
      }
      let mut stdout = std::io::stdout().lock();
      stdout
        .write_all(&response.body)
        .context("failed to write asset to stdout")?;
      stdout.flush().context("failed to flush stdout")?;
    }
  }

  Ok(())
}
