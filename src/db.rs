//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Every context's Postgres repository holds a clone of the same
//! [`PgPool`] and offloads synchronous Diesel work onto the blocking thread
//! pool through [`run_blocking`].

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection handed to blocking closures.
pub type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be
/// established.
pub fn build_pool(database_url: &str, max_connections: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_connections).build(manager)
}

/// Runs a blocking database operation with a pooled connection.
///
/// Pool checkout failures and join errors are mapped into the caller's
/// error type with `map_pool` and `map_join`.
pub(crate) async fn run_blocking<F, T, E>(
    pool: &PgPool,
    f: F,
    map_pool: fn(PoolError) -> E,
    map_join: fn(tokio::task::JoinError) -> E,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let pool_handle = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool_handle.get().map_err(map_pool)?;
        f(&mut connection)
    })
    .await
    .map_err(map_join)?
}
