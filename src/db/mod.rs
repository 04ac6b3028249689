// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod bootstrap;
pub mod customer_repository;

pub use bootstrap::*;
pub use customer_repository::*;
