use std::path::PathBuf;

use nano_manifest::{Browser, Capability};

#[derive(clap::Parser, Debug)]
#[command(name = "nano-build")]
#[command(about = "Manifest patching and Chrome Web Store publishing for Nano Defender builds")]
#[command(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Use custom config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Upload a packaged extension to the Chrome Web Store and publish it
    Publish {
        /// Path to the .zip package
        package: PathBuf,
        /// Web Store item id (defaults to the configured id)
        #[clap(long)]
        extension_id: Option<String>,
        /// Audience of the published item
        #[clap(long, value_enum, default_value_t = TargetOption::Default)]
        target: TargetOption,
        /// Credential file (WebStoreClient, WebStoreSecret, WebStoreAccount)
        #[clap(long)]
        credentials: Option<PathBuf>,
        /// Give up on each request after this many seconds
        #[clap(long)]
        timeout: Option<u64>,
    },
    /// Apply browser specific overrides to a build's manifest.json
    PatchManifest {
        /// Browser the build targets
        #[clap(value_enum)]
        browser: Browser,
        /// Brand the build as the standard or pro edition
        #[clap(long, value_enum)]
        capability: Option<Capability>,
        /// Patch the unsigned AMO build (firefox only)
        #[clap(long)]
        amo_unsigned: bool,
        /// Directory holding the build outputs
        #[clap(long)]
        dist: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetOption {
    Default,
    TrustedTesters,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show all configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Reset configuration to defaults
    Reset,
}
