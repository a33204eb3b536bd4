pub mod bot;
pub mod command;
pub mod config;
pub mod logger;
pub mod report;

pub use bot::Bot;
pub use config::{Config, ConfigError};
