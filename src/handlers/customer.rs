// src/handlers/customer.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, response::ApiResponse, validation::json_body},
    config::AppState,
    models::customer::{CustomerCreated, RegisterCustomerPayload},
};

// POST /{ver}/customer/submitCustomers
#[utoipa::path(
    post,
    path = "/v1/customer/submitCustomers",
    tag = "Customers",
    request_body = RegisterCustomerPayload,
    responses(
        (status = 201, description = "Customer registered", body = ApiResponse<CustomerCreated>),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "customerId or phoneNumber already exists")
    )
)]
pub async fn submit_customers(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterCustomerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state
        .customer_service
        .register(json_body(payload)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            CustomerCreated {
                customer_id: customer.customer_id,
            },
            "Customer saved successfully",
        )),
    ))
}
