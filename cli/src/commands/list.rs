//! `siteforge list` — show the catalogue.

use anyhow::Result;
use serde_json::json;
use siteforge_common::{DB_ENGINES, KNOWN_REPOS};

use crate::app::AppContext;
use crate::output::json;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let apps: Vec<_> = KNOWN_REPOS
        .iter()
        .filter(|r| r.settings_module.is_some())
        .collect();
    let front_ends: Vec<_> = KNOWN_REPOS.iter().filter(|r| r.front_end.is_some()).collect();

    if app.is_json() {
        return json::print(&json!({
            "applications": apps,
            "front_ends": front_ends,
            "db_engines": DB_ENGINES,
        }));
    }

    let out = &app.output;
    out.header("Applications");
    for a in &apps {
        let package = if a.package_name.is_empty() { "-" } else { a.package_name };
        out.row(
            a.nickname,
            10,
            &format!("{package:<14} {}", a.settings_module.unwrap_or_default()),
        );
    }
    out.header("Front ends");
    for f in &front_ends {
        out.row(f.nickname, 10, f.front_end.unwrap_or_default());
    }
    out.header("Database engines");
    for e in DB_ENGINES {
        out.row(e.name, 10, &e.system_packages.join(" "));
    }
    Ok(())
}
