// src/models/shop.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Deserialize é necessário para ler de volta do cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[schema(example = "Sri Aari Works")]
    pub name: String,
    #[schema(example = "https://cdn.example.com/logo.png")]
    pub logo_url: Option<String>,
    pub auth_logo_url: Option<String>,
}
