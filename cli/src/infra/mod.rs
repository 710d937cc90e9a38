//! Infrastructure layer — adapters implementing the application ports.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod host;
pub mod prompt;
pub mod templates;
