use std::fmt;

use anyhow::{bail, Context};

use crate::admin::{credentials::StaticCredentials, PurgePolicy};

pub const DEFAULT_DATABASE_URL: &str = "local.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5001";
pub const DEFAULT_ADMIN_ID: &str = "ramya21";
pub const DEFAULT_ADMIN_PASSWORD: &str = "2003";

/// Where the data lives, picked from the `DATABASE_URL` scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Filesystem path of an embedded SQLite database, or `:memory:`.
    Sqlite(String),
    /// A `postgres://` or `postgresql://` connection string, passed to libpq
    /// unchanged.
    Postgres(String),
}

impl DatabaseUrl {
    pub fn parse(url: &str) -> anyhow::Result<Self> {
        let url = url.trim();
        match url.split_once("://") {
            Some(("postgres" | "postgresql", _)) => Ok(DatabaseUrl::Postgres(url.to_string())),
            Some(("sqlite", rest)) => sqlite_path(rest.strip_prefix('/').unwrap_or(rest)),
            Some((scheme, _)) => bail!("unsupported database scheme `{}`", scheme),
            None => sqlite_path(url.strip_prefix("sqlite:").unwrap_or(url)),
        }
    }
}

/// Never prints the password of a server connection string.
impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseUrl::Sqlite(path) => write!(f, "sqlite:{}", path),
            DatabaseUrl::Postgres(url) => {
                let (scheme, rest) = url.split_once("://").unwrap_or(("postgres", url));
                match rest.rsplit_once('@') {
                    Some((_, host)) => write!(f, "{}://***@{}", scheme, host),
                    None => write!(f, "{}://{}", scheme, rest),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: DatabaseUrl,
    pub bind_addr: String,
    pub admin_id: String,
    /// BLAKE2b hex digest.
    pub admin_password_digest: String,
    pub purge_appointments: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("DATABASE_URL not set, using {}", DEFAULT_DATABASE_URL);
                DEFAULT_DATABASE_URL.to_string()
            });
        let database_url = DatabaseUrl::parse(&database_url).context("invalid DATABASE_URL")?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let admin_id = lookup("ADMIN_ID").unwrap_or_else(|| DEFAULT_ADMIN_ID.to_string());

        let admin_password_digest = match lookup("ADMIN_PASSWORD_BLAKE2") {
            Some(digest) => {
                let digest = digest.trim().to_ascii_lowercase();
                if digest.len() != 128 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                    bail!("ADMIN_PASSWORD_BLAKE2 must be a 128 character hex digest");
                }
                digest
            }
            None => {
                let password =
                    lookup("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());
                crate::utils::hash_password(password.trim())
            }
        };

        let purge_appointments = match lookup("PURGE_APPOINTMENTS") {
            Some(value) => parse_flag(&value).context("invalid PURGE_APPOINTMENTS")?,
            None => false,
        };

        Ok(Self {
            database_url,
            bind_addr,
            admin_id,
            admin_password_digest,
            purge_appointments,
        })
    }

    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials::from_digest(self.admin_id.trim(), &self.admin_password_digest)
    }

    pub fn purge_policy(&self) -> PurgePolicy {
        PurgePolicy {
            include_appointments: self.purge_appointments,
        }
    }
}

fn sqlite_path(path: &str) -> anyhow::Result<DatabaseUrl> {
    if path.is_empty() {
        bail!("empty database path");
    }

    Ok(DatabaseUrl::Sqlite(path.to_string()))
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, found `{}`", other),
    }
}
