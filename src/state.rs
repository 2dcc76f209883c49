use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use diesel::{
    SqliteConnection,
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Pool},
};
use diesel_migrations::MigrationHarness;

use crate::{
    MIGRATIONS, auth::IdentityProvider, config::AppConfig, rules::RuleSet,
    submissions::store::{Store, StoreError},
};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Everything a request handler may need. Handlers pull out the part they
/// need through [`FromRef`], e.g. `State(store): State<Store>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<AppConfig>,
    pub rules: Arc<RuleSet>,
    pub key: Key,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Applied to every connection the pool hands out.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens the connection pool and brings the schema up to date.
///
/// An in-memory database lives and dies with its connection, so it gets a
/// pool of exactly one connection.
pub fn open_pool(db_url: &str) -> Result<DbPool, StoreError> {
    let pool: DbPool = Pool::builder()
        .max_size(if db_url == ":memory:" { 1 } else { 10 })
        .connection_customizer(Box::new(SqlitePragmas))
        .build(ConnectionManager::<SqliteConnection>::new(db_url))?;

    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    tracing::info!(applied = applied.len(), "database migrations complete");

    Ok(pool)
}
