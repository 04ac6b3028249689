// src/models/customer.rs
// DOCUMENTATION: Data structures for customers
// PURPOSE: Row mapping for the clientes table and validated request bodies

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a row of the clientes table
/// DOCUMENTATION: id is assigned by the SERIAL column, never by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i32,

    /// Customer name (required, up to 100 characters)
    pub nome: String,

    /// Age in years
    pub idade: Option<i32>,

    /// Two-letter state code, e.g. "SP"
    pub uf: Option<String>,
}

/// Request DTO for insert, update and replace
/// DOCUMENTATION: Carries every mutable column; update and replace both overwrite all of them
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub nome: String,

    #[serde(default)]
    pub idade: Option<i32>,

    #[serde(default)]
    #[validate(length(equal = 2))]
    pub uf: Option<String>,
}
