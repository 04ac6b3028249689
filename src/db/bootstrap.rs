// src/db/bootstrap.rs
// DOCUMENTATION: One-time schema bootstrap
// PURPOSE: Make sure DB_NAME and the clientes table exist before any query traffic

use crate::config::Config;
use crate::errors::ClientesError;
use sqlx::{Connection, PgConnection};

/// DDL for the customers table, guarded so reruns are no-ops
pub const CREATE_CLIENTES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS clientes (
        id SERIAL PRIMARY KEY,
        nome VARCHAR(100) NOT NULL,
        idade INTEGER,
        uf CHAR(2)
    )
"#;

/// Run ensure_database then ensure_table, in that order
/// DOCUMENTATION: Called once from main.rs before the pool is built.
/// Any error here is fatal to startup and is not retried.
pub async fn initialize_database(config: &Config) -> Result<(), ClientesError> {
    config.validate().map_err(ClientesError::ConfigError)?;

    ensure_database(config).await?;
    ensure_table(config).await?;

    Ok(())
}

/// Create DB_NAME if the catalog does not list it
/// DOCUMENTATION: Connects to the administrative "postgres" database, never to DB_NAME.
/// Returns true when the database had to be created.
pub async fn ensure_database(config: &Config) -> Result<bool, ClientesError> {
    let mut conn = PgConnection::connect_with(&config.admin_connect_options())
        .await
        .map_err(|e| {
            log::error!("Failed to connect to administrative database: {}", e);
            ClientesError::from(e)
        })?;

    let result = create_database_if_missing(&mut conn, config).await;
    release(conn).await;
    result
}

async fn create_database_if_missing(
    conn: &mut PgConnection,
    config: &Config,
) -> Result<bool, ClientesError> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.db_name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            log::error!("Failed to look up database {}: {}", config.db_name, e);
            ClientesError::from(e)
        })?;

    if exists.is_some() {
        log::info!("Database \"{}\" already exists", config.db_name);
        return Ok(false);
    }

    log::info!("Database \"{}\" does not exist. Creating...", config.db_name);

    // Identifiers cannot be bound as parameters. DB_NAME comes from configuration
    // and was checked by Config::validate, never from request data.
    let sql = format!("CREATE DATABASE {}", config.quoted_database_name());
    sqlx::query(&sql).execute(&mut *conn).await.map_err(|e| {
        log::error!("Failed to create database {}: {}", config.db_name, e);
        ClientesError::from(e)
    })?;

    log::info!("Database \"{}\" created successfully", config.db_name);
    Ok(true)
}

/// Create the clientes table inside DB_NAME if it is missing
pub async fn ensure_table(config: &Config) -> Result<(), ClientesError> {
    let mut conn = PgConnection::connect_with(&config.target_connect_options())
        .await
        .map_err(|e| {
            log::error!("Failed to connect to database {}: {}", config.db_name, e);
            ClientesError::from(e)
        })?;

    let result = sqlx::query(CREATE_CLIENTES_TABLE)
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(|e| {
            log::error!("Failed to create table clientes: {}", e);
            ClientesError::from(e)
        });

    release(conn).await;

    if result.is_ok() {
        log::info!("Table \"clientes\" verified/created successfully");
    }
    result
}

/// Close a bootstrap connection on both the success and the failure path
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        log::warn!("Failed to close bootstrap connection cleanly: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ddl_is_guarded_and_complete() {
        let ddl = CREATE_CLIENTES_TABLE.to_uppercase();

        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS CLIENTES"));
        assert!(ddl.contains("ID SERIAL PRIMARY KEY"));
        assert!(ddl.contains("NOME VARCHAR(100) NOT NULL"));
        assert!(ddl.contains("IDADE INTEGER"));
        assert!(ddl.contains("UF CHAR(2)"));
    }

    #[tokio::test]
    async fn test_invalid_database_name_aborts_before_connecting() {
        let config = Config::from_lookup(|key| match key {
            "DB_NAME" => Some("tests; DROP DATABASE postgres".to_string()),
            _ => None,
        });

        let err = initialize_database(&config).await.unwrap_err();
        assert!(matches!(err, ClientesError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let config = Config::from_lookup(|key| match key {
            "HOST_NAME" => Some("127.0.0.1".to_string()),
            "PORT_NUMBER" => Some("1".to_string()),
            _ => None,
        });

        assert!(ensure_database(&config).await.is_err());
        assert!(ensure_table(&config).await.is_err());
    }

    // Integration tests - run with USER_NAME/HOST_NAME/DB_NAME/... set
    // cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_bootstrap_is_idempotent() {
        let config = Config::from_env();

        initialize_database(&config).await.expect("first bootstrap failed");
        initialize_database(&config).await.expect("second bootstrap failed");

        // Database exists now, so nothing is created on rerun
        assert!(!ensure_database(&config).await.expect("ensure_database failed"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_table_guard_does_not_duplicate() {
        let config = Config::from_env();
        initialize_database(&config).await.expect("bootstrap failed");
        ensure_table(&config).await.expect("rerun of ensure_table failed");

        let mut conn = PgConnection::connect_with(&config.target_connect_options())
            .await
            .expect("connect failed");
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = 'clientes'",
        )
        .fetch_one(&mut conn)
        .await
        .expect("catalog query failed");
        conn.close().await.expect("close failed");

        assert_eq!(count, 1);
    }
}
