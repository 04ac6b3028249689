// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use sqlx::postgres::PgConnectOptions;
use std::env;

/// Database used for administrative statements (catalog lookups, CREATE DATABASE)
pub const ADMIN_DATABASE: &str = "postgres";

/// PostgreSQL truncates identifiers longer than this
const MAX_IDENTIFIER_LEN: usize = 63;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Database login user (USER_NAME)
    pub user_name: String,

    /// Database host (HOST_NAME)
    pub host_name: String,

    /// Target database name (DB_NAME), normally "tests"
    pub db_name: String,

    /// Login password (DB_PASSWORD)
    pub db_password: String,

    /// Database port (PORT_NUMBER)
    pub port_number: u16,

    /// Optional dialect hint (DB_DIALECT). Only PostgreSQL is supported.
    pub db_dialect: Option<String>,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8080)
    pub server_port: u16,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection before giving up
    pub db_connection_timeout: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        Config {
            user_name: string_or("USER_NAME", "postgres"),

            host_name: string_or("HOST_NAME", "localhost"),

            db_name: string_or("DB_NAME", "tests"),

            db_password: string_or("DB_PASSWORD", ""),

            port_number: lookup("PORT_NUMBER")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(5432),

            db_dialect: lookup("DB_DIALECT").filter(|v| !v.trim().is_empty()),

            server_address: string_or("SERVER_ADDRESS", "127.0.0.1"),

            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(8080),

            log_level: string_or("LOG_LEVEL", "info"),

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10),

            db_connection_timeout: lookup("DB_CONNECTION_TIMEOUT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(30),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    /// DB_NAME ends up spliced into CREATE DATABASE, so it must be a plain identifier
    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.is_empty() {
            return Err("DB_NAME is required".to_string());
        }

        if !is_plain_identifier(&self.db_name) {
            return Err(format!(
                "DB_NAME must match [A-Za-z_][A-Za-z0-9_]* and be at most {} bytes, got {:?}",
                MAX_IDENTIFIER_LEN, self.db_name
            ));
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be greater than zero".to_string());
        }

        if let Some(dialect) = &self.db_dialect {
            if !matches!(dialect.to_ascii_lowercase().as_str(), "postgres" | "postgresql") {
                log::warn!("DB_DIALECT={} is ignored - only PostgreSQL is supported", dialect);
            }
        }

        Ok(())
    }

    /// Connection options for an arbitrary database on the configured server
    pub fn connect_options(&self, database: &str) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host_name)
            .port(self.port_number)
            .username(&self.user_name)
            .database(database);

        if !self.db_password.is_empty() {
            options = options.password(&self.db_password);
        }

        options
    }

    /// Connection options for the always-present administrative database
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        self.connect_options(ADMIN_DATABASE)
    }

    /// Connection options for the target database (DB_NAME)
    pub fn target_connect_options(&self) -> PgConnectOptions {
        self.connect_options(&self.db_name)
    }

    /// DB_NAME quoted as a PostgreSQL identifier
    /// Quoting keeps the catalog lookup (exact match) and CREATE DATABASE in agreement
    pub fn quoted_database_name(&self) -> String {
        format!("\"{}\"", self.db_name.replace('"', "\"\""))
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

    starts_ok
        && name.len() <= MAX_IDENTIFIER_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
