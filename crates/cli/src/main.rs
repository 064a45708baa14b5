mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Commands;
use crate::commands::{
    PublishArgs, handle_config_command, handle_patch_manifest_command, handle_publish_command,
};
use crate::config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::get_config_path);

    match cli.command {
        Commands::Publish {
            package,
            extension_id,
            target,
            credentials,
            timeout,
        } => {
            let config = Config::load(&config_path).await?;
            handle_publish_command(
                PublishArgs {
                    package,
                    extension_id,
                    target,
                    credentials,
                    timeout,
                },
                &config,
            )
            .await?;
        }
        Commands::PatchManifest {
            browser,
            capability,
            amo_unsigned,
            dist,
        } => {
            let config = Config::load(&config_path).await?;
            handle_patch_manifest_command(browser, capability, amo_unsigned, dist, &config)
                .await?;
        }
        Commands::Config { command } => {
            handle_config_command(command, &config_path).await?;
        }
    }

    Ok(())
}
