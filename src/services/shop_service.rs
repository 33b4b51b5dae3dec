// src/services/shop_service.rs

use std::{sync::Arc, time::Duration};

use crate::{cache::Cache, common::error::AppError, db::ShopStore, models::shop::Shop};

pub const SHOP_CACHE_KEY: &str = "shopDetails";

#[derive(Clone)]
pub struct ShopService {
    store: Arc<dyn ShopStore>,
    cache: Option<Arc<dyn Cache>>,
    ttl: Duration,
}

impl ShopService {
    pub fn new(store: Arc<dyn ShopStore>, cache: Option<Arc<dyn Cache>>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Read-through: uma falha do cache só custa uma ida ao banco.
    pub async fn get_shop_details(&self) -> Result<Shop, AppError> {
        if let Some(shop) = self.cached().await {
            return Ok(shop);
        }

        let shop = self
            .store
            .find_shop()
            .await?
            .ok_or_else(|| AppError::NotFound("Shop not found".into()))?;

        self.remember(&shop).await;
        Ok(shop)
    }

    async fn cached(&self) -> Option<Shop> {
        let cache = self.cache.as_ref()?;
        match cache.get(SHOP_CACHE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(shop) => Some(shop),
                Err(e) => {
                    tracing::warn!(error = %e, "Descartando detalhes da loja ilegíveis no cache");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Falha ao ler do cache");
                None
            }
        }
    }

    async fn remember(&self, shop: &Shop) {
        let Some(cache) = &self.cache else {
            return;
        };
        let raw = match serde_json::to_string(shop) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Não foi possível serializar os detalhes da loja para o cache");
                return;
            }
        };
        if let Err(e) = cache.set_ex(SHOP_CACHE_KEY, &raw, self.ttl).await {
            tracing::warn!(error = %e, "Falha ao gravar no cache");
        }
    }
}
