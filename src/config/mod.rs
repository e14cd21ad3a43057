/// Application settings loaded from config.toml and the environment
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, AuthConfig, BootstrapAdmin, load_config, load_default_config};
