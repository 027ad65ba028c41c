pub mod cli;
pub mod commands;
pub mod config;

pub use config::AppConfig;

pub use taskdeck_api as api;
pub use taskdeck_api::ApiClient;

pub use taskdeck_core as core;
pub use taskdeck_core::model;
