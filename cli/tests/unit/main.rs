//! Unit tests for the siteforge CLI
//!
//! These tests use recording fakes for the shell, host and terminal, and a
//! temporary directory for the filesystem. Nothing is installed or spawned.

mod configure_service;
mod helpers;
mod installer_deferred;
mod mocks;
