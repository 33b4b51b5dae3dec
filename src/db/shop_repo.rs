// src/db/shop_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::shop::Shop};

#[async_trait]
pub trait ShopStore: Send + Sync {
    /// A linha da loja (só existe uma).
    async fn find_shop(&self) -> Result<Option<Shop>, AppError>;
}

#[derive(Clone)]
pub struct ShopRepository {
    pool: PgPool,
}

impl ShopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopStore for ShopRepository {
    async fn find_shop(&self) -> Result<Option<Shop>, AppError> {
        let shop = sqlx::query_as::<_, Shop>(
            "SELECT name, logo_url, auth_logo_url FROM shops ORDER BY id ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(shop)
    }
}
