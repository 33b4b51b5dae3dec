// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerKey, NewCustomer},
};

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Primeira chave única já usada por outro cliente, se houver.
    async fn find_conflict(
        &self,
        customer_id: &str,
        phone_number: &str,
    ) -> Result<Option<CustomerKey>, AppError>;

    /// Insere; uma corrida na chave única vira `AppError::Conflict`.
    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, AppError>;
}

pub fn conflict_error(key: CustomerKey) -> AppError {
    AppError::Conflict(format!("{} already exists", key.field_name()))
}

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn find_conflict(
        &self,
        customer_id: &str,
        phone_number: &str,
    ) -> Result<Option<CustomerKey>, AppError> {
        let row = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT customer_id, phone_number
            FROM customers
            WHERE customer_id = $1 OR phone_number = $2
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(existing_id, _)| {
            if existing_id == customer_id {
                CustomerKey::CustomerId
            } else {
                CustomerKey::PhoneNumber
            }
        }))
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                customer_id, name, phone_number, alternate_number, address, town,
                district, state, date_of_birth, marital_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&customer.customer_id)
        .bind(&customer.name)
        .bind(&customer.phone_number)
        .bind(&customer.alternate_number)
        .bind(&customer.address)
        .bind(&customer.town)
        .bind(&customer.district)
        .bind(&customer.state)
        .bind(&customer.date_of_birth)
        .bind(&customer.marital_status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let key = match db_err.constraint() {
                        Some("customers_phone_number_key") => CustomerKey::PhoneNumber,
                        _ => CustomerKey::CustomerId,
                    };
                    return conflict_error(key);
                }
            }
            e.into()
        })
    }
}
