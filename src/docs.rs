// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Aari ---
        handlers::aari::submit_aari_input,
        handlers::aari::get_aari_pending,
        handlers::aari::get_aari_completed,
        handlers::aari::get_design_url,
        handlers::aari::update_aari_pending_status,
        handlers::aari::update_client_price_by_phone,
        handlers::aari::update_client_price,
        handlers::aari::delete_aari_pending_order,

        // --- Clientes ---
        handlers::customer::submit_customers,

        // --- Loja ---
        handlers::shop::get_shop_details,

        // --- Usuários ---
        handlers::user::get_user_details,
    ),
    components(
        schemas(
            // --- Aari ---
            models::aari::AariStatus,
            models::aari::WorkType,
            models::aari::AariOrder,
            models::aari::AariOrderView,
            models::aari::PendingAariSummary,
            models::aari::CompletedAariSummary,
            models::aari::OrderRef,
            models::aari::DesignUrls,
            models::aari::SubmitAariForm,
            models::aari::WorkerPricePayload,
            models::aari::ClientPricePayload,

            // --- Clientes ---
            models::customer::Customer,
            models::customer::RegisterCustomerPayload,
            models::customer::CustomerCreated,

            // --- Loja / Usuários ---
            models::shop::Shop,
            models::user::User,
            models::user::UserLookupPayload,
        )
    ),
    tags(
        (name = "Aari", description = "Aari work orders: submission, listings, completion and pricing"),
        (name = "Customers", description = "Customer registration"),
        (name = "Shop", description = "Shop details"),
        (name = "Users", description = "Staff user lookup"),
        (name = "Health", description = "Liveness")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
