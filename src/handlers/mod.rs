// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod customers;
pub mod health;

pub use customers::config as customers_config;
pub use health::config as health_config;
