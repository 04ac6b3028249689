// src/config/db.rs
// DOCUMENTATION: Database connection pool management
// PURPOSE: Build the shared PostgreSQL pool once and hand out checked-out connections

use crate::config::Config;
use crate::errors::ClientesError;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Creates the pool against DB_NAME and verifies it with SELECT now()
/// The schema bootstrap must have run before this, otherwise DB_NAME may not exist
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!(
        "Initializing database pool: {}@{}:{}/{}",
        config.user_name,
        config.host_name,
        config.port_number,
        config.db_name
    );

    let pool = PgPoolOptions::new()
        // Maximum concurrent connections
        .max_connections(config.db_max_connections)
        // Bounded wait when every connection is checked out
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(config.target_connect_options())
        .await?;

    // Verify connection works
    let server_time = match sqlx::query_scalar::<_, DateTime<Utc>>("SELECT now()")
        .fetch_one(&pool)
        .await
    {
        Ok(now) => now,
        Err(e) => {
            pool.close().await;
            return Err(e);
        }
    };

    log::info!("Connection pool created successfully (server time: {})", server_time);
    Ok(pool)
}

/// PoolManager: owner of the process-wide connection pool
/// DOCUMENTATION: The pool is built on first use and reused afterwards.
/// Whether it exists is decided by the OnceCell holding the pool itself,
/// never by a connection handed out earlier. A failed build leaves the
/// cell empty so the next caller tries again.
pub struct PoolManager {
    config: Config,
    pool: OnceCell<PgPool>,
    constructions: AtomicUsize,
    failed_builds: AtomicUsize,
    last_failure: Mutex<Option<ClientesError>>,
}

impl PoolManager {
    /// Create a manager that builds its pool lazily
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
            constructions: AtomicUsize::new(0),
            failed_builds: AtomicUsize::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Shared pool, building it on first call
    /// DOCUMENTATION: Concurrent first callers all wait on the same initialization.
    /// Callers that were already waiting when a build fails get that build's error
    /// instead of starting their own, so every caller waits at most one
    /// DB_CONNECTION_TIMEOUT. Callers arriving after the failure try again.
    pub async fn pool(&self) -> Result<&PgPool, ClientesError> {
        let failures_seen = self.failed_builds.load(Ordering::SeqCst);

        self.pool
            .get_or_try_init(|| async {
                if self.failed_builds.load(Ordering::SeqCst) != failures_seen {
                    if let Some(err) = self.last_failure.lock().await.clone() {
                        return Err(err);
                    }
                }

                match init_db_pool(&self.config).await {
                    Ok(pool) => {
                        self.constructions.fetch_add(1, Ordering::SeqCst);
                        Ok(pool)
                    }
                    Err(e) => {
                        log::error!("Failed to build connection pool: {}", e);
                        let err = ClientesError::from(e);
                        *self.last_failure.lock().await = Some(err.clone());
                        self.failed_builds.fetch_add(1, Ordering::SeqCst);
                        Err(err)
                    }
                }
            })
            .await
    }

    /// Check out one connection for a single operation
    /// DOCUMENTATION: The connection goes back to the pool when the guard is dropped,
    /// on success and on error alike
    pub async fn get_connection(&self) -> Result<PoolConnection<Postgres>, ClientesError> {
        let pool = self.pool().await?;

        pool.acquire().await.map_err(|e| {
            log::error!("Failed to acquire connection: {}", e);
            ClientesError::from(e)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Number of times a pool was successfully built (0 or 1)
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Number of build attempts that failed
    pub fn failed_builds(&self) -> usize {
        self.failed_builds.load(Ordering::SeqCst)
    }

    /// Connections currently checked out of the pool
    pub fn outstanding(&self) -> usize {
        match self.pool.get() {
            Some(pool) => (pool.size() as usize).saturating_sub(pool.num_idle()),
            None => 0,
        }
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            log::info!("Connection pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn unreachable_config() -> Config {
        Config::from_lookup(|key| match key {
            "HOST_NAME" => Some("127.0.0.1".to_string()),
            // Nothing listens on port 1
            "PORT_NUMBER" => Some("1".to_string()),
            "DB_CONNECTION_TIMEOUT" => Some("1".to_string()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn test_new_manager_is_uninitialized() {
        let manager = PoolManager::new(unreachable_config());

        assert!(!manager.is_initialized());
        assert_eq!(manager.constructions(), 0);
        assert_eq!(manager.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_failed_construction_leaves_manager_empty() {
        let manager = PoolManager::new(unreachable_config());

        assert!(manager.get_connection().await.is_err());
        assert!(!manager.is_initialized());
        assert_eq!(manager.constructions(), 0);

        // A second caller retries instead of reusing a half-built pool
        assert_err!(manager.pool().await);
        assert!(!manager.is_initialized());
        assert_eq!(manager.failed_builds(), 2);
    }

    #[tokio::test]
    async fn test_waiting_callers_share_a_failed_build() {
        let manager = PoolManager::new(unreachable_config());
        let started = std::time::Instant::now();

        let (a, b, c, d) = tokio::join!(
            manager.get_connection(),
            manager.get_connection(),
            manager.get_connection(),
            manager.get_connection(),
        );

        assert!(a.is_err() && b.is_err() && c.is_err() && d.is_err());
        assert!(!manager.is_initialized());
        assert_eq!(manager.failed_builds(), 1);
        // One bounded wait, not one DB_CONNECTION_TIMEOUT per caller
        assert!(started.elapsed() < Duration::from_millis(2500));
    }

    // Integration tests - run with USER_NAME/HOST_NAME/DB_NAME/... set
    // cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_concurrent_first_callers_share_one_pool() {
        let config = Config::from_env();
        crate::db::initialize_database(&config).await.expect("bootstrap failed");

        let manager = Arc::new(PoolManager::new(config));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    let conn = manager.get_connection().await.expect("acquire failed");
                    drop(conn);
                    manager.pool().await.expect("pool missing") as *const PgPool as usize
                })
            })
            .collect();

        let mut addresses = Vec::new();
        for handle in handles {
            addresses.push(handle.await.expect("task panicked"));
        }

        assert_eq!(manager.constructions(), 1);
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));

        manager.close().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_connections_are_returned_on_drop() {
        let config = Config::from_env();
        crate::db::initialize_database(&config).await.expect("bootstrap failed");
        let manager = PoolManager::new(config);

        let conn = assert_ok!(manager.get_connection().await);
        assert_eq!(manager.outstanding(), 1);

        drop(conn);
        // Release happens on a background task
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(manager.outstanding(), 0);
        assert_eq!(manager.constructions(), 1);

        manager.close().await;
    }
}
