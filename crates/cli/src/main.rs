use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "queue-service")]
#[command(author, version, about = "Multi-tenant in-memory priority task queue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// TCP port to listen on, overriding config/env (ignored if a config file is in use)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long, env = "CONFIG_PATH")]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, config }) => {
            if let Some(config) = config {
                std::env::set_var("CONFIG_PATH", config);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            queue_api_server::start_server().await
        }
        None => {
            queue_api_server::start_server().await
        }
    }
}
