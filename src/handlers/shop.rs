// src/handlers/shop.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::shop::Shop,
};

// GET /{ver}/shop/getShopDetails
#[utoipa::path(
    get,
    path = "/v1/shop/getShopDetails",
    tag = "Shop",
    responses(
        (status = 200, description = "Shop name and logos", body = ApiResponse<Shop>),
        (status = 404, description = "Shop not found")
    )
)]
pub async fn get_shop_details(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let shop = app_state.shop_service.get_shop_details().await?;
    Ok(Json(ApiResponse::ok(shop)))
}
