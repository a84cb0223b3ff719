pub mod appointments;
pub mod treated_patients;

use std::time::Duration;

use actix_web::web;
use anyhow::{anyhow, Context};
use diesel::{
    connection::{AnsiTransactionManager, SimpleConnection, TransactionManager},
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection},
    PgConnection, SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use r2d2::PooledConnection;

use crate::{admin::PurgePolicy, config::DatabaseUrl};

pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");
pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

pub const IN_MEMORY: &str = ":memory:";

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Pool for whichever backend `DATABASE_URL` selected.
#[derive(Clone)]
pub enum DbPool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

pub enum DbConnection {
    Sqlite(PooledConnection<ConnectionManager<SqliteConnection>>),
    Postgres(PooledConnection<ConnectionManager<PgConnection>>),
}

/// Evaluates `$body` with `$c` bound to the concrete diesel connection behind
/// a `DbConnection`. The body is compiled once per backend.
macro_rules! dispatch {
    ($conn:expr, $c:ident => $body:expr) => {
        match $conn {
            $crate::database::DbConnection::Sqlite($c) => {
                let $c: &mut diesel::SqliteConnection = $c;
                $body
            }
            $crate::database::DbConnection::Postgres($c) => {
                let $c: &mut diesel::PgConnection = $c;
                $body
            }
        }
    };
}
pub(crate) use dispatch;

impl DbConnection {
    pub fn backend(&self) -> &'static str {
        match self {
            DbConnection::Sqlite(_) => "sqlite",
            DbConnection::Postgres(_) => "postgres",
        }
    }

    /// Runs `f` inside one transaction, committing on `Ok` and rolling back
    /// on `Err`.
    pub fn transaction<T, F>(&mut self, f: F) -> QueryResult<T>
    where
        F: FnOnce(&mut DbConnection) -> QueryResult<T>,
    {
        dispatch!(self, c => AnsiTransactionManager::begin_transaction(c))?;
        match f(self) {
            Ok(value) => {
                if let Err(err) = dispatch!(self, c => AnsiTransactionManager::commit_transaction(c)) {
                    if let Err(rollback_err) =
                        dispatch!(self, c => AnsiTransactionManager::rollback_transaction(c))
                    {
                        tracing::error!(error = %rollback_err, "rollback after failed commit");
                    }
                    return Err(err);
                }
                Ok(value)
            }
            Err(err) => {
                dispatch!(self, c => AnsiTransactionManager::rollback_transaction(c))?;
                Err(err)
            }
        }
    }
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &DatabaseUrl) -> anyhow::Result<DbPool> {
    match database_url {
        DatabaseUrl::Sqlite(path) => create_sqlite_pool(path).map(DbPool::Sqlite),
        DatabaseUrl::Postgres(url) => r2d2::Pool::builder()
            .max_size(8)
            .connection_timeout(Duration::from_secs(10))
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))
            .with_context(|| format!("failed to open database {}", database_url))
            .map(DbPool::Postgres),
    }
}

fn create_sqlite_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let builder = r2d2::Pool::builder()
        .connection_timeout(Duration::from_secs(10))
        .connection_customizer(Box::new(SqlitePragmas));

    // every connection to `:memory:` opens its own empty database, so the
    // single connection must never be reaped and replaced
    let builder = if path == IN_MEMORY {
        builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
        builder.max_size(8)
    };

    builder
        .build(ConnectionManager::<SqliteConnection>::new(path))
        .with_context(|| format!("failed to open database {}", path))
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let applied = match get_db_conn(pool)? {
        DbConnection::Sqlite(mut conn) => conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map(|versions| versions.len()),
        DbConnection::Postgres(mut conn) => conn
            .run_pending_migrations(POSTGRES_MIGRATIONS)
            .map(|versions| versions.len()),
    }
    .map_err(|err| anyhow!("failed to run migrations: {}", err))?;
    tracing::info!(applied, "database migrations up to date");

    Ok(())
}

pub fn get_db_conn(pool: &DbPool) -> anyhow::Result<DbConnection> {
    match pool {
        DbPool::Sqlite(pool) => pool.get().map(DbConnection::Sqlite),
        DbPool::Postgres(pool) => pool.get().map(DbConnection::Postgres),
    }
    .context("DB connection")
}

/// Runs `f` on a pooled connection inside actix's blocking thread pool.
pub async fn run<F, R>(pool: &web::Data<DbPool>, f: F) -> anyhow::Result<R>
where
    F: FnOnce(&mut DbConnection) -> QueryResult<R> + Send + 'static,
    R: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut conn).context("DB error")
    })
    .await
    .context("DB worker")?
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeSummary {
    pub treated_patients: usize,
    pub appointments: usize,
}

pub fn purge(conn: &mut DbConnection, policy: PurgePolicy) -> QueryResult<PurgeSummary> {
    conn.transaction(|conn| {
        let treated_patients = treated_patients::delete_all(conn)?;
        let appointments = if policy.include_appointments {
            appointments::delete_all(conn)?
        } else {
            0
        };

        Ok(PurgeSummary {
            treated_patients,
            appointments,
        })
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::models::{appointments::NewAppointment, treated_patients::NewTreatedPatient};
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    pub fn new_appointment(name: &str) -> NewAppointment {
        NewAppointment {
            name: name.to_string(),
            phone: "555".to_string(),
            email: format!("{}@example.com", name),
            service: "cleaning".to_string(),
            message: String::new(),
        }
    }

    pub fn new_treated_patient(name: &str, treated_at: NaiveDateTime) -> NewTreatedPatient {
        NewTreatedPatient {
            name: name.to_string(),
            phone: "555".to_string(),
            email: format!("{}@example.com", name),
            service: "cleaning".to_string(),
            message: String::new(),
            treated_at,
        }
    }

    pub fn temp_pool() -> (DbPool, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.db");
        let url = DatabaseUrl::Sqlite(path.to_str().expect("utf-8 path").to_string());
        let pool = create_pool(&url).expect("pool");
        run_migrations(&pool).expect("migrations");
        (pool, dir)
    }
}
