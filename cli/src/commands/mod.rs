//! Command implementations

pub mod config;
pub mod configure;
pub mod list;
pub mod startsite;
pub mod version;
