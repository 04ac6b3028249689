// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Expose schema bootstrap, the pool manager and customer operations to the binary and to other backends

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;

pub use config::{Config, PoolManager};
pub use db::{ensure_database, ensure_table, initialize_database, CustomerRepository};
pub use errors::ClientesError;
pub use models::{Customer, CustomerRequest};
