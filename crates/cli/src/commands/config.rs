use std::path::Path;

use eyre::Result;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub async fn handle_config_command(cmd: ConfigCommands, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Show => handle_show_config(config_path).await,
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommands::Get { key } => handle_get_config(key, config_path).await,
        ConfigCommands::Set { key, value } => handle_set_config(key, value, config_path).await,
        ConfigCommands::Reset => handle_reset_config(config_path).await,
    }
}

async fn handle_set_config(key: String, value: String, config_path: &Path) -> Result<()> {
    let mut config = Config::load(config_path).await?;

    match config.set_value(&key, &value) {
        Ok(_) => {
            config.save(config_path).await?;
            println!("✅ Configuration updated: {} = {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to set configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_get_config(key: String, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path).await?;

    match config.get_value(&key) {
        Ok(value) => {
            println!("{}: {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to get configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_show_config(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path).await?;
    println!("{}", config.show_all());
    Ok(())
}

async fn handle_reset_config(config_path: &Path) -> Result<()> {
    Config::default().save(config_path).await?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}
