//! Catalogue of installable components of the web-application framework.

use serde::Serialize;

/// One installable component (framework core, plugin library or application).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepoDescriptor {
    /// Short name used on the command line (`--dev-repos "lino xl"`).
    pub nickname: &'static str,
    /// Distribution name passed to `pip install`. Empty for applications
    /// that live inside another repository.
    pub package_name: &'static str,
    /// Source repository to clone from.
    pub git_repo: Option<&'static str>,
    /// Django settings module of a runnable application.
    pub settings_module: Option<&'static str>,
    /// Full package name of the front end this repository provides.
    pub front_end: Option<&'static str>,
}

const fn repo(
    nickname: &'static str,
    package_name: &'static str,
    git_repo: Option<&'static str>,
    settings_module: Option<&'static str>,
    front_end: Option<&'static str>,
) -> RepoDescriptor {
    RepoDescriptor {
        nickname,
        package_name,
        git_repo,
        settings_module,
        front_end,
    }
}

pub static KNOWN_REPOS: &[RepoDescriptor] = &[
    repo("lino", "lino", Some("https://github.com/lino-framework/lino"), None, Some("lino.modlib.extjs")),
    repo("xl", "lino-xl", Some("https://github.com/lino-framework/xl"), None, None),
    repo("welfare", "lino-welfare", Some("https://github.com/lino-framework/welfare"), None, None),
    repo("amici", "lino-amici", Some("https://github.com/lino-framework/amici"), Some("lino_amici.lib.amici.settings"), None),
    repo("avanti", "lino-avanti", Some("https://github.com/lino-framework/avanti"), Some("lino_avanti.lib.avanti.settings"), None),
    repo("care", "lino-care", Some("https://github.com/lino-framework/care"), Some("lino_care.lib.care.settings"), None),
    repo("cosi", "lino-cosi", Some("https://github.com/lino-framework/cosi"), Some("lino_cosi.lib.cosi.settings"), None),
    repo("noi", "lino-noi", Some("https://github.com/lino-framework/noi"), Some("lino_noi.lib.noi.settings"), None),
    repo("presto", "lino-presto", Some("https://github.com/lino-framework/presto"), Some("lino_presto.lib.presto.settings"), None),
    repo("tera", "lino-tera", Some("https://github.com/lino-framework/tera"), Some("lino_tera.lib.tera.settings"), None),
    repo("vilma", "lino-vilma", Some("https://github.com/lino-framework/vilma"), Some("lino_vilma.lib.vilma.settings"), None),
    repo("voga", "lino-voga", Some("https://github.com/lino-framework/voga"), Some("lino_voga.lib.voga.settings"), None),
    repo("weleup", "lino-weleup", Some("https://github.com/lino-framework/weleup"), Some("lino_weleup.settings"), None),
    repo("welcht", "lino-welcht", Some("https://github.com/lino-framework/welcht"), Some("lino_welcht.settings"), None),
    repo("book", "lino-book", Some("https://github.com/lino-framework/book"), None, None),
    repo("react", "lino-react", Some("https://github.com/lino-framework/react"), None, Some("lino_react.react")),
    // Demo projects shipped inside the book repository.
    repo("min1", "", None, Some("lino_book.projects.min1.settings"), None),
    repo("min2", "", None, Some("lino_book.projects.min2.settings"), None),
    repo("chatter", "", None, Some("lino_book.projects.chatter.settings"), None),
];

/// Look up a repository by nickname, or by the full name of the front end
/// it provides.
#[must_use]
pub fn find_repo(name: &str) -> Option<&'static RepoDescriptor> {
    KNOWN_REPOS
        .iter()
        .find(|r| r.nickname == name)
        .or_else(|| KNOWN_REPOS.iter().find(|r| r.front_end == Some(name)))
}

/// Nicknames of every repository that can run as a site.
#[must_use]
pub fn app_names() -> Vec<&'static str> {
    KNOWN_REPOS
        .iter()
        .filter(|r| r.settings_module.is_some())
        .map(|r| r.nickname)
        .collect()
}

/// Full package names of the available front ends.
#[must_use]
pub fn front_ends() -> Vec<&'static str> {
    KNOWN_REPOS.iter().filter_map(|r| r.front_end).collect()
}

impl RepoDescriptor {
    /// Top-level Python package of the application, derived from its
    /// settings module (`lino_noi.lib.noi.settings` → `lino_noi`).
    #[must_use]
    pub fn app_package(&self) -> Option<&'static str> {
        self.settings_module
            .and_then(|m| m.split('.').next())
            .filter(|p| !p.is_empty())
    }
}
