use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::info;

/// Poolers in transaction mode (pgbouncer, Supabase) reject named prepared statements.
#[derive(Debug, Default)]
struct WithoutStatementCache;

impl CustomizeConnection<PgConnection, R2d2Error> for WithoutStatementCache {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub fn establish_connection(database_url: &str, max_size: u32) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(WithoutStatementCache))
        .build(manager)
        .context("failed to build postgres connection pool")?;

    info!(max_size, "postgres: connection pool ready");
    Ok(pool)
}
