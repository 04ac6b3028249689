// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and whether the pool is up

use crate::config::PoolManager;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check(manager: web::Data<PoolManager>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "clientes",
        "version": env!("CARGO_PKG_VERSION"),
        "pool_initialized": manager.is_initialized(),
        "connections_in_use": manager.outstanding()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
