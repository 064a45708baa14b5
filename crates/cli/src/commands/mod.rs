pub mod config;
pub mod manifest;
pub mod publish;

pub use config::handle_config_command;
pub use manifest::handle_patch_manifest_command;
pub use publish::{PublishArgs, handle_publish_command};
