// src/db/customer_repository.rs
// DOCUMENTATION: Customer database operations
// PURPOSE: CRUD over the clientes table, one checked-out connection per call

use crate::config::PoolManager;
use crate::errors::ClientesError;
use crate::models::{Customer, CustomerRequest};

/// CustomerRepository: All database operations for customers
/// DOCUMENTATION: Every method checks out one connection, runs exactly one
/// parameterized statement and drops the connection on return, so it goes back
/// to the pool whether the statement succeeded or not
pub struct CustomerRepository;

impl CustomerRepository {
    /// List every customer ordered by id
    pub async fn list_customers(manager: &PoolManager) -> Result<Vec<Customer>, ClientesError> {
        let mut conn = manager.get_connection().await?;

        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, nome, idade, uf FROM clientes ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            log::error!("Failed to list customers: {}", e);
            ClientesError::from(e)
        })?;

        Ok(customers)
    }

    /// Fetch customers matching id
    /// DOCUMENTATION: Returns zero or one rows; a missing id is an empty Vec, not an error
    pub async fn get_customer(
        manager: &PoolManager,
        id: i32,
    ) -> Result<Vec<Customer>, ClientesError> {
        let mut conn = manager.get_connection().await?;

        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, nome, idade, uf FROM clientes WHERE id = $1",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch customer {}: {}", id, e);
            ClientesError::from(e)
        })?;

        Ok(customers)
    }

    /// Insert a new customer
    /// DOCUMENTATION: The generated id is not returned
    pub async fn insert_customer(
        manager: &PoolManager,
        req: &CustomerRequest,
    ) -> Result<(), ClientesError> {
        let mut conn = manager.get_connection().await?;

        sqlx::query("INSERT INTO clientes (nome, idade, uf) VALUES ($1, $2, $3)")
            .bind(&req.nome)
            .bind(req.idade)
            .bind(&req.uf)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                log::error!("Failed to insert customer {}: {}", req.nome, e);
                ClientesError::from(e)
            })?;

        log::info!("Inserted customer: {}", req.nome);
        Ok(())
    }

    /// Overwrite nome, idade and uf of the customer with id
    /// Returns the number of rows changed (0 when id does not exist)
    pub async fn update_customer(
        manager: &PoolManager,
        id: i32,
        req: &CustomerRequest,
    ) -> Result<u64, ClientesError> {
        Self::overwrite(manager, id, req).await
    }

    /// Full replacement of a customer
    /// DOCUMENTATION: Same statement as update_customer; both overwrite every mutable column
    pub async fn replace_customer(
        manager: &PoolManager,
        id: i32,
        req: &CustomerRequest,
    ) -> Result<u64, ClientesError> {
        Self::overwrite(manager, id, req).await
    }

    async fn overwrite(
        manager: &PoolManager,
        id: i32,
        req: &CustomerRequest,
    ) -> Result<u64, ClientesError> {
        let mut conn = manager.get_connection().await?;

        let rows = sqlx::query("UPDATE clientes SET nome = $1, idade = $2, uf = $3 WHERE id = $4")
            .bind(&req.nome)
            .bind(req.idade)
            .bind(&req.uf)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                log::error!("Update failed for customer {}: {}", id, e);
                ClientesError::from(e)
            })?
            .rows_affected();

        log::info!("Updated customer {} ({} row(s))", id, rows);
        Ok(rows)
    }

    /// Delete the customer with id
    /// Returns the number of rows removed
    pub async fn delete_customer(manager: &PoolManager, id: i32) -> Result<u64, ClientesError> {
        let mut conn = manager.get_connection().await?;

        let rows = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                log::error!("Delete failed for customer {}: {}", id, e);
                ClientesError::from(e)
            })?
            .rows_affected();

        log::info!("Deleted customer {} ({} row(s))", id, rows);
        Ok(rows)
    }
}
