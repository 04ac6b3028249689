// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Load config, bootstrap the schema, build the pool and start the HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clientes::{handlers, initialize_database, Config, PoolManager};
use dotenv::dotenv;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting clientes service...");
    log::info!(
        "Database: {}@{}:{}/{}",
        config.user_name,
        config.host_name,
        config.port_number,
        config.db_name
    );

    // 4. Schema bootstrap - single attempt, fatal on failure
    if let Err(e) = initialize_database(&config).await {
        log::error!("Database bootstrap failed: {}", e);
        std::process::exit(1);
    }

    // 5. Build the shared connection pool once and inject it into the app
    let manager = web::Data::new(PoolManager::new(config.clone()));
    // PoolManager::pool already logs the failure
    if manager.pool().await.is_err() {
        std::process::exit(1);
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    log::info!("Server Address: {}", server_addr);

    let app_manager = manager.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(app_manager.clone())
            // Middleware
            .wrap(Logger::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::customers_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    manager.close().await;
    Ok(())
}
