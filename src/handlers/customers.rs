// src/handlers/customers.rs
// DOCUMENTATION: HTTP handlers for customer operations
// PURPOSE: Parse requests, call the repository, return responses

use crate::config::PoolManager;
use crate::db::CustomerRepository;
use crate::errors::ClientesError;
use crate::models::CustomerRequest;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// GET /clientes
pub async fn list_customers(
    manager: web::Data<PoolManager>,
) -> Result<impl Responder, ClientesError> {
    let customers = CustomerRepository::list_customers(manager.get_ref()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /clientes/{id}
/// Always a JSON array, empty when the id is unknown
pub async fn get_customer(
    manager: web::Data<PoolManager>,
    path: web::Path<i32>,
) -> Result<impl Responder, ClientesError> {
    let customers = CustomerRepository::get_customer(manager.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// POST /clientes
pub async fn insert_customer(
    manager: web::Data<PoolManager>,
    req: web::Json<CustomerRequest>,
) -> Result<impl Responder, ClientesError> {
    req.validate()?;

    CustomerRepository::insert_customer(manager.get_ref(), &req).await?;
    Ok(HttpResponse::Created().finish())
}

/// PATCH /clientes/{id}
pub async fn update_customer(
    manager: web::Data<PoolManager>,
    path: web::Path<i32>,
    req: web::Json<CustomerRequest>,
) -> Result<impl Responder, ClientesError> {
    req.validate()?;

    let id = path.into_inner();
    let rows = CustomerRepository::update_customer(manager.get_ref(), id, &req).await?;
    no_content_or_not_found(rows, id)
}

/// PUT /clientes/{id}
pub async fn replace_customer(
    manager: web::Data<PoolManager>,
    path: web::Path<i32>,
    req: web::Json<CustomerRequest>,
) -> Result<impl Responder, ClientesError> {
    req.validate()?;

    let id = path.into_inner();
    let rows = CustomerRepository::replace_customer(manager.get_ref(), id, &req).await?;
    no_content_or_not_found(rows, id)
}

/// DELETE /clientes/{id}
pub async fn delete_customer(
    manager: web::Data<PoolManager>,
    path: web::Path<i32>,
) -> Result<impl Responder, ClientesError> {
    let id = path.into_inner();
    let rows = CustomerRepository::delete_customer(manager.get_ref(), id).await?;
    no_content_or_not_found(rows, id)
}

fn no_content_or_not_found(rows: u64, id: i32) -> Result<HttpResponse, ClientesError> {
    if rows == 0 {
        return Err(ClientesError::NotFound(id));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Malformed JSON bodies get the same error shape as everything else
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ClientesError::InvalidInput(err.to_string()).into())
}

/// Configuration for customer routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clientes")
            .app_data(json_config())
            .route("", web::get().to(list_customers))
            .route("", web::post().to(insert_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::patch().to(update_customer))
            .route("/{id}", web::put().to(replace_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
