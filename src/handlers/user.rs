// src/handlers/user.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, response::ApiResponse, validation::json_body},
    config::AppState,
    models::user::{User, UserLookupPayload},
};

// POST /{ver}/user/getUserDetails
#[utoipa::path(
    post,
    path = "/v1/user/getUserDetails",
    tag = "Users",
    request_body = UserLookupPayload,
    responses(
        (status = 200, description = "Matching user", body = ApiResponse<User>),
        (status = 400, description = "Email or phone missing"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_details(
    State(app_state): State<AppState>,
    payload: Result<Json<UserLookupPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_service
        .get_user_details(json_body(payload)?)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
