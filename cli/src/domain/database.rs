//! Database engine capabilities.
//!
//! Engines differ only in the command text they issue; the installer runs
//! whatever an engine produces through its confirmation gate.

use siteforge_common::DatabaseEngineDescriptor;

use crate::domain::error::SiteError;
use crate::domain::shell::ensure_quotable;

/// Credentials of the database user owning a site's database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub user: String,
    pub password: String,
}

pub trait DatabaseEngine {
    fn descriptor(&self) -> &'static DatabaseEngineDescriptor;

    /// Commands creating the database user.
    ///
    /// # Errors
    ///
    /// Returns an error when a credential cannot be quoted safely.
    fn setup_user(&self, creds: &DbCredentials) -> Result<Vec<String>, SiteError>;

    /// Commands creating `database` and granting `user` access to it.
    ///
    /// # Errors
    ///
    /// Returns an error when a name cannot be quoted safely.
    fn setup_database(&self, database: &str, user: &str) -> Result<Vec<String>, SiteError>;

    /// Commands run once after the engine's server packages are installed.
    fn after_provisioning(&self) -> Vec<String> {
        Vec::new()
    }
}

fn check(creds: &DbCredentials) -> Result<(), SiteError> {
    ensure_quotable(&creds.user, "a database user name")?;
    ensure_quotable(&creds.password, "a database password")
}

pub struct Postgresql;

impl Postgresql {
    fn psql(sql: &str) -> String {
        format!("sudo -u postgres psql -c \"{sql}\"")
    }
}

impl DatabaseEngine for Postgresql {
    fn descriptor(&self) -> &'static DatabaseEngineDescriptor {
        &siteforge_common::DB_ENGINES[0]
    }

    fn setup_user(&self, creds: &DbCredentials) -> Result<Vec<String>, SiteError> {
        check(creds)?;
        Ok(vec![Self::psql(&format!(
            "CREATE USER {} WITH PASSWORD '{}';",
            creds.user, creds.password
        ))])
    }

    fn setup_database(&self, database: &str, user: &str) -> Result<Vec<String>, SiteError> {
        ensure_quotable(database, "a database name")?;
        ensure_quotable(user, "a database user name")?;
        Ok(vec![
            Self::psql(&format!("CREATE DATABASE {database};")),
            Self::psql(&format!("GRANT ALL PRIVILEGES ON DATABASE {database} TO {user};")),
        ])
    }
}

pub struct Mysql;

impl Mysql {
    fn mysql(sql: &str) -> String {
        format!("mysql -u root -p -e \"{sql};\"")
    }
}

impl DatabaseEngine for Mysql {
    fn descriptor(&self) -> &'static DatabaseEngineDescriptor {
        &siteforge_common::DB_ENGINES[1]
    }

    fn setup_user(&self, creds: &DbCredentials) -> Result<Vec<String>, SiteError> {
        check(creds)?;
        Ok(vec![Self::mysql(&format!(
            "create user '{}'@'localhost' identified by '{}'",
            creds.user, creds.password
        ))])
    }

    fn setup_database(&self, database: &str, user: &str) -> Result<Vec<String>, SiteError> {
        ensure_quotable(database, "a database name")?;
        ensure_quotable(user, "a database user name")?;
        Ok(vec![
            Self::mysql(&format!("create database {database} charset 'utf8'")),
            Self::mysql(&format!(
                "grant all PRIVILEGES on {database}.* to '{user}'@'localhost'"
            )),
        ])
    }

    fn after_provisioning(&self) -> Vec<String> {
        vec!["mysql_secure_installation".to_string()]
    }
}

/// File-based engine: nothing to bootstrap.
pub struct Sqlite;

impl DatabaseEngine for Sqlite {
    fn descriptor(&self) -> &'static DatabaseEngineDescriptor {
        &siteforge_common::DB_ENGINES[2]
    }

    fn setup_user(&self, _: &DbCredentials) -> Result<Vec<String>, SiteError> {
        Ok(Vec::new())
    }

    fn setup_database(&self, _: &str, _: &str) -> Result<Vec<String>, SiteError> {
        Ok(Vec::new())
    }
}

/// The engine registered under `name`.
#[must_use]
pub fn engine(name: &str) -> Option<Box<dyn DatabaseEngine>> {
    match name {
        "postgresql" => Some(Box::new(Postgresql)),
        "mysql" => Some(Box::new(Mysql)),
        "sqlite3" => Some(Box::new(Sqlite)),
        _ => None,
    }
}
