//! todosync CLI
//!
//! Runs the sync server and talks to it from the command line.
//!
//! # Commands
//!
//! - `serve` - Run the sync server
//! - `ping` - Check connectivity and the shared secret
//! - `pull` - Download the full state as JSON
//! - `push` - Upload entries from a JSON file
//! - `version` - Show version information

mod commands;
mod http_client;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Checklist and inventory sync server and client.
#[derive(Parser)]
#[command(name = "todosync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the client commands.
#[derive(Args)]
struct RemoteArgs {
    /// Server URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080/")]
    url: String,

    /// File holding the shared secret
    #[arg(short, long, default_value = todosync_server::DEFAULT_SECRET_PATH)]
    secret_file: PathBuf,

    /// Use the secret file byte-for-byte, keeping trailing newlines
    #[arg(long)]
    no_trim_secret: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sync server
    Serve {
        /// Address to listen on (port 0 picks a free port)
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// File holding the shared secret
        #[arg(short, long, default_value = todosync_server::DEFAULT_SECRET_PATH)]
        secret_file: PathBuf,

        /// File the state snapshot is persisted to
        #[arg(long, default_value = todosync_server::DEFAULT_SNAPSHOT_PATH)]
        snapshot: PathBuf,

        /// Use the secret file byte-for-byte, keeping trailing newlines
        #[arg(long)]
        no_trim_secret: bool,

        /// Extra attempts when persisting a snapshot fails
        #[arg(long, default_value = "1")]
        persist_retries: u32,
    },

    /// Check connectivity and the shared secret
    Ping {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Download the full state as JSON
    Pull {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload entries from a JSON file (same layout as `pull` output)
    Push {
        #[command(flatten)]
        remote: RemoteArgs,

        /// File to read, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            secret_file,
            snapshot,
            no_trim_secret,
            persist_retries,
        } => {
            let config = todosync_server::ServerConfig::new(bind)
                .with_secret_path(secret_file)
                .with_snapshot_path(snapshot)
                .with_trim_secret(!no_trim_secret)
                .with_persist_retries(persist_retries);
            commands::serve::run(config)?;
        }
        Commands::Ping { remote } => {
            let client = commands::remote::connect(&remote)?;
            commands::remote::ping(&client)?;
        }
        Commands::Pull { remote, output } => {
            let client = commands::remote::connect(&remote)?;
            commands::remote::pull(&client, output.as_deref())?;
        }
        Commands::Push { remote, input } => {
            let client = commands::remote::connect(&remote)?;
            commands::remote::push(&client, &input)?;
        }
        Commands::Version => {
            println!("todosync v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
