//! gemini-caller - chat with Gemini and keep the history
//!
#![doc = "Main entry point for the gemini-caller application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gemini_caller::cli::{Cli, Commands};
use gemini_caller::commands;
use gemini_caller::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    config.validate()?;

    match cli.command {
        Commands::Serve { host, port } => {
            tracing::info!("Starting chat server");
            commands::serve(config, host, port).await?;
            Ok(())
        }
        Commands::Send { message, chat } => {
            if let Some(id) = chat {
                tracing::debug!("Continuing chat: {}", id);
            }
            commands::send(config, message, chat).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "gemini_caller=debug,tower_http=debug"
    } else {
        "gemini_caller=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
