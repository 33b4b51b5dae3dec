// src/handlers/aari.rs

use axum::{
    extract::{
        multipart::Field,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{Pagination, PaginationQuery},
        response::ApiResponse,
        validation::{bare_phone_number, json_body, query_params, PHONE_PREFIX},
    },
    config::AppState,
    middleware::auth::AuthenticatedStaff,
    models::aari::{
        AariOrderView, ClientPricePayload, ClientPriceSelector, CompletedAariSummary, DesignUpload,
        DesignUrls, OrderRef, PendingAariSummary, SubmitAariForm, WorkerPricePayload,
    },
};

/// Nome da parte multipart que carrega as imagens de design.
pub const DESIGN_FIELD: &str = "design";

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::InvalidInput(format!("Invalid multipart body: {e}"))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

/// Separa o envio em formulário de texto e arquivos de design.
/// Aceita os nomes em camelCase e os antigos, todos minúsculos.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(SubmitAariForm, Vec<DesignUpload>), AppError> {
    let mut form = SubmitAariForm::default();
    let mut designs = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == DESIGN_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
            designs.push(DesignUpload {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let slot = match name.as_str() {
            "customerId" | "customerid" => &mut form.customer_id,
            "orderId" | "orderid" => &mut form.order_id,
            "name" => &mut form.name,
            "phoneNumber" | "phonenumber" => &mut form.phone_number,
            "submissionDate" | "submissiondate" => &mut form.submission_date,
            "deliveryDate" | "deliverydate" => &mut form.delivery_date,
            "address" => &mut form.address,
            "additionalInformation" | "additionalinformation" => &mut form.additional_information,
            "staffName" | "staffname" => &mut form.staff_name,
            "workType" | "worktype" => &mut form.work_type,
            "quotedPrice" | "quotedprice" => &mut form.quoted_price,
            _ => {
                tracing::debug!(field = %name, "Ignorando campo desconhecido no envio");
                continue;
            }
        };
        *slot = Some(read_text(field).await?);
    }

    Ok((form, designs))
}

// POST /{ver}/aari/submitAariInput
#[utoipa::path(
    post,
    path = "/v1/aari/submitAariInput",
    tag = "Aari",
    request_body(content = SubmitAariForm, content_type = "multipart/form-data",
        description = "Order fields plus 1 to 5 `design` image parts (JPEG/PNG, < 20 MB each)"),
    responses(
        (status = 201, description = "Order stored", body = ApiResponse<OrderRef>),
        (status = 400, description = "Invalid fields or files"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Order ID already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_aari_input(
    State(app_state): State<AppState>,
    AuthenticatedStaff(staff): AuthenticatedStaff,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, designs) = read_submission(multipart).await?;
    tracing::debug!(staff = %staff.sub, files = designs.len(), "Envio Aari recebido");

    let order_id = app_state.aari_service.submit_order(form, designs).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            OrderRef { order_id },
            "Aari input submitted successfully",
        )),
    ))
}

fn pagination(query: Result<Query<PaginationQuery>, QueryRejection>) -> Result<Pagination, AppError> {
    let query = query_params(query)?;
    query.validate()?;
    Ok(Pagination::from(&query))
}

// GET /{ver}/aari/getAariPending
#[utoipa::path(
    get,
    path = "/v1/aari/getAariPending",
    tag = "Aari",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Pending orders, earliest delivery first", body = ApiResponse<Vec<PendingAariSummary>>),
        (status = 400, description = "Invalid page or limit")
    )
)]
pub async fn get_aari_pending(
    State(app_state): State<AppState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.aari_service.list_pending(pagination(query)?).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

// GET /{ver}/aari/getAariCompleted
#[utoipa::path(
    get,
    path = "/v1/aari/getAariCompleted",
    tag = "Aari",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Completed orders, most recent first", body = ApiResponse<Vec<CompletedAariSummary>>),
        (status = 400, description = "Invalid page or limit")
    )
)]
pub async fn get_aari_completed(
    State(app_state): State<AppState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.aari_service.list_completed(pagination(query)?).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

// GET /{ver}/aari/getDesignUrl/{orderId}
#[utoipa::path(
    get,
    path = "/v1/aari/getDesignUrl/{orderId}",
    tag = "Aari",
    params(("orderId" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Design URLs in upload order", body = ApiResponse<DesignUrls>),
        (status = 404, description = "Order not found or has no designs")
    )
)]
pub async fn get_design_url(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let designs = app_state.aari_service.get_design_urls(&order_id).await?;
    Ok(Json(ApiResponse::ok(DesignUrls { designs })))
}

// PUT /{ver}/aari/updateAariPendingStatus/{orderId}
#[utoipa::path(
    put,
    path = "/v1/aari/updateAariPendingStatus/{orderId}",
    tag = "Aari",
    params(("orderId" = String, Path, description = "Order ID")),
    request_body = WorkerPricePayload,
    responses(
        (status = 200, description = "Order completed", body = ApiResponse<AariOrderView>),
        (status = 400, description = "Worker price missing or not positive"),
        (status = 404, description = "Order not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_aari_pending_status(
    State(app_state): State<AppState>,
    AuthenticatedStaff(staff): AuthenticatedStaff,
    Path(order_id): Path<String>,
    payload: Result<Json<WorkerPricePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    let order = app_state
        .aari_service
        .mark_completed(&order_id, payload)
        .await?;

    tracing::debug!(staff = %staff.sub, order_id = %order_id, "Status atualizado");
    Ok(Json(ApiResponse::ok_with_message(
        order,
        "Status and worker price updated successfully",
    )))
}

// PUT /{ver}/aari/updateClientPriceByPhone/{phoneNumber}
#[utoipa::path(
    put,
    path = "/v1/aari/updateClientPriceByPhone/{phoneNumber}",
    tag = "Aari",
    params(("phoneNumber" = String, Path, description = "Phone number, with or without +91-")),
    request_body = ClientPricePayload,
    responses(
        (status = 200, description = "Client price set on the latest order for this phone", body = ApiResponse<AariOrderView>),
        (status = 400, description = "Client price missing or not positive"),
        (status = 404, description = "No order for this phone number")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client_price_by_phone(
    State(app_state): State<AppState>,
    AuthenticatedStaff(staff): AuthenticatedStaff,
    Path(phone_number): Path<String>,
    payload: Result<Json<ClientPricePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    let phone_number = format!("{PHONE_PREFIX}{}", bare_phone_number(&phone_number));

    let order = app_state
        .aari_service
        .set_client_price(ClientPriceSelector::PhoneNumber(phone_number), payload)
        .await?;

    tracing::debug!(staff = %staff.sub, order_id = %order.order.order_id, "Preço do cliente atualizado pelo telefone");
    Ok(Json(ApiResponse::ok_with_message(order, "Client price updated successfully")))
}

// PUT /{ver}/aari/updateClientPrice/{orderId}
#[utoipa::path(
    put,
    path = "/v1/aari/updateClientPrice/{orderId}",
    tag = "Aari",
    params(("orderId" = String, Path, description = "Order ID")),
    request_body = ClientPricePayload,
    responses(
        (status = 200, description = "Client price set", body = ApiResponse<AariOrderView>),
        (status = 400, description = "Client price missing or not positive"),
        (status = 404, description = "Order not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client_price(
    State(app_state): State<AppState>,
    AuthenticatedStaff(staff): AuthenticatedStaff,
    Path(order_id): Path<String>,
    payload: Result<Json<ClientPricePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    let order = app_state
        .aari_service
        .set_client_price(ClientPriceSelector::OrderId(order_id), payload)
        .await?;

    tracing::debug!(staff = %staff.sub, order_id = %order.order.order_id, "Preço do cliente atualizado");
    Ok(Json(ApiResponse::ok_with_message(order, "Client price updated successfully")))
}

// DELETE /{ver}/aari/deleteAariPendingOrder/{orderId}
#[utoipa::path(
    delete,
    path = "/v1/aari/deleteAariPendingOrder/{orderId}",
    tag = "Aari",
    params(("orderId" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<OrderRef>),
        (status = 404, description = "Order not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_aari_pending_order(
    State(app_state): State<AppState>,
    AuthenticatedStaff(staff): AuthenticatedStaff,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.aari_service.delete_order(&order_id).await?;

    tracing::debug!(staff = %staff.sub, order_id = %order_id, "Pedido excluído");
    Ok(Json(ApiResponse::ok_with_message(
        OrderRef { order_id },
        "Order deleted successfully",
    )))
}
