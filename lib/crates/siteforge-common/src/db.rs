//! Supported database engines.
//!
//! The engine name must match the name Django uses for its backend.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatabaseEngineDescriptor {
    pub name: &'static str,
    /// System service to restart after installing the server packages.
    pub service_name: Option<&'static str>,
    pub system_packages: &'static [&'static str],
    /// Python driver installed into every site environment.
    pub driver_packages: &'static [&'static str],
}

pub static DB_ENGINES: &[DatabaseEngineDescriptor] = &[
    DatabaseEngineDescriptor {
        name: "postgresql",
        service_name: Some("postgresql"),
        system_packages: &["postgresql", "postgresql-contrib", "libpq-dev"],
        driver_packages: &["psycopg2"],
    },
    DatabaseEngineDescriptor {
        name: "mysql",
        service_name: Some("mysql"),
        system_packages: &[
            "mysql-server",
            "libmysqlclient-dev",
            "python-dev",
            "libffi-dev",
            "libssl-dev",
            "python-mysqldb",
        ],
        driver_packages: &["mysqlclient"],
    },
    DatabaseEngineDescriptor {
        name: "sqlite3",
        service_name: None,
        system_packages: &["sqlite3"],
        driver_packages: &[],
    },
];

#[must_use]
pub fn find_engine(name: &str) -> Option<&'static DatabaseEngineDescriptor> {
    DB_ENGINES.iter().find(|e| e.name == name)
}

#[must_use]
pub fn engine_names() -> Vec<&'static str> {
    DB_ENGINES.iter().map(|e| e.name).collect()
}
