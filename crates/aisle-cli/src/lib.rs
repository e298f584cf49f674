#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use app::AisleApp;
pub use cli::{BaseCommand, CliArgs, ConfigAction, ConfigCommand, FilterArgs};
pub use config::AisleConfig;
