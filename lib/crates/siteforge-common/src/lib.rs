//! Reference data shared by the siteforge CLI.
//!
//! Nothing in this crate performs I/O. It declares what a host can be
//! configured with (the option registry), what can be installed on it (the
//! repository catalogue) and which database engines are supported.

pub mod catalog;
pub mod db;
pub mod options;
pub mod value;

pub use catalog::{KNOWN_REPOS, RepoDescriptor, app_names, find_repo, front_ends};
pub use db::{DB_ENGINES, DatabaseEngineDescriptor, engine_names, find_engine};
pub use options::{CONFIGURE_OPTIONS, ConfiguredOption, DefaultContext, OptionDefault, ValueType, find_option};
pub use value::{ConfigValue, ValueError, parse_flag};
