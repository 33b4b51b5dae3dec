// src/db/aari_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Pagination},
    models::aari::{
        AariOrder, AariStatus, ClientPriceSelector, CompletedAariSummary, NewAariOrder,
        PendingAariSummary,
    },
};

/// Porta de persistência dos pedidos Aari.
#[async_trait]
pub trait AariStore: Send + Sync {
    /// Insere um pedido pendente. `order_id` duplicado é `AppError::Conflict`.
    async fn insert(&self, order: &NewAariOrder, designs: &[String]) -> Result<AariOrder, AppError>;

    /// Pedidos pendentes, `delivery_date` crescente.
    async fn list_pending(&self, page: Pagination) -> Result<Vec<PendingAariSummary>, AppError>;

    /// Pedidos concluídos, `completed_date` decrescente.
    async fn list_completed(&self, page: Pagination) -> Result<Vec<CompletedAariSummary>, AppError>;

    async fn find_designs(&self, order_id: &str) -> Result<Option<Vec<String>>, AppError>;

    /// `true` quando uma linha foi removida.
    async fn delete(&self, order_id: &str) -> Result<bool, AppError>;

    /// Define status e preço do artesão; `completed_date` mantém o primeiro valor.
    async fn mark_completed(
        &self,
        order_id: &str,
        worker_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError>;

    async fn set_client_price(
        &self,
        selector: &ClientPriceSelector,
        client_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError>;
}

const ORDER_COLUMNS: &str = r#"
    id, order_id, customer_id, name, phone_number, address, staff_name,
    additional_information, submission_date, delivery_date, work_type, designs,
    quoted_price, worker_price, client_price, status, completed_date,
    created_at, updated_at
"#;

// Responsável por todas as interações com a tabela 'aari_orders'
#[derive(Clone)]
pub struct AariRepository {
    pool: PgPool,
}

impl AariRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AariStore for AariRepository {
    async fn insert(&self, order: &NewAariOrder, designs: &[String]) -> Result<AariOrder, AppError> {
        let sql = format!(
            r#"
            INSERT INTO aari_orders (
                order_id, customer_id, name, phone_number, address, staff_name,
                additional_information, submission_date, delivery_date, work_type,
                designs, quoted_price, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, AariOrder>(&sql)
            .bind(&order.order_id)
            .bind(&order.customer_id)
            .bind(&order.name)
            .bind(&order.phone_number)
            .bind(&order.address)
            .bind(&order.staff_name)
            .bind(&order.additional_information)
            .bind(order.submission_date)
            .bind(order.delivery_date)
            .bind(order.work_type)
            .bind(designs)
            .bind(order.quoted_price)
            .bind(AariStatus::Pending)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // O único índice único da tabela é order_id
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict("Order ID already exists".into());
                    }
                }
                e.into()
            })
    }

    async fn list_pending(&self, page: Pagination) -> Result<Vec<PendingAariSummary>, AppError> {
        let orders = sqlx::query_as::<_, PendingAariSummary>(
            r#"
            SELECT order_id, name, designs, status, address, delivery_date, worker_price, work_type
            FROM aari_orders
            WHERE status = $1
            ORDER BY delivery_date ASC, order_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(AariStatus::Pending)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn list_completed(&self, page: Pagination) -> Result<Vec<CompletedAariSummary>, AppError> {
        let orders = sqlx::query_as::<_, CompletedAariSummary>(
            r#"
            SELECT
                order_id, name, phone_number,
                designs[1] AS design,
                status, completed_date, client_price, worker_price
            FROM aari_orders
            WHERE status = $1
            ORDER BY completed_date DESC, order_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(AariStatus::Completed)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn find_designs(&self, order_id: &str) -> Result<Option<Vec<String>>, AppError> {
        let designs = sqlx::query_scalar::<_, Vec<String>>(
            "SELECT designs FROM aari_orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(designs)
    }

    async fn delete(&self, order_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM aari_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_completed(
        &self,
        order_id: &str,
        worker_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError> {
        // Um único comando: uma segunda chamada concorrente não sobrescreve completed_date.
        let sql = format!(
            r#"
            UPDATE aari_orders
            SET status = $2,
                completed_date = COALESCE(completed_date, NOW()),
                worker_price = $3,
                updated_at = NOW()
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, AariOrder>(&sql)
            .bind(order_id)
            .bind(AariStatus::Completed)
            .bind(worker_price)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn set_client_price(
        &self,
        selector: &ClientPriceSelector,
        client_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError> {
        let (target, value) = match selector {
            ClientPriceSelector::OrderId(order_id) => (
                "SELECT id FROM aari_orders WHERE order_id = $1",
                order_id,
            ),
            ClientPriceSelector::PhoneNumber(phone) => (
                "SELECT id FROM aari_orders WHERE phone_number = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
                phone,
            ),
        };

        let sql = format!(
            r#"
            UPDATE aari_orders
            SET client_price = $2, updated_at = NOW()
            WHERE id = ({target})
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, AariOrder>(&sql)
            .bind(value)
            .bind(client_price)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }
}
