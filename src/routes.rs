// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, rate_limit::rate_limit},
    models::aari::{MAX_DESIGNS, MAX_DESIGN_BYTES},
};

/// Espaço para cinco designs no tamanho máximo mais os campos de texto.
const SUBMISSION_BODY_LIMIT: usize = MAX_DESIGNS * MAX_DESIGN_BYTES + 1024 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignorando origem CORS inválida");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

fn aari_routes(app_state: &AppState) -> Router<AppState> {
    // Define as rotas da equipe (protegidas pelo middleware)
    let staff_routes = Router::new()
        .route(
            "/submitAariInput",
            post(handlers::aari::submit_aari_input)
                .layer(DefaultBodyLimit::max(SUBMISSION_BODY_LIMIT)),
        )
        .route(
            "/updateAariPendingStatus/{order_id}",
            put(handlers::aari::update_aari_pending_status),
        )
        .route(
            "/updateClientPriceByPhone/{phone_number}",
            put(handlers::aari::update_client_price_by_phone),
        )
        .route(
            "/updateClientPrice/{order_id}",
            put(handlers::aari::update_client_price),
        )
        .route(
            "/deleteAariPendingOrder/{order_id}",
            delete(handlers::aari::delete_aari_pending_order),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/getAariPending", get(handlers::aari::get_aari_pending))
        .route("/getAariCompleted", get(handlers::aari::get_aari_completed))
        .route("/getDesignUrl/{order_id}", get(handlers::aari::get_design_url))
        .merge(staff_routes)
}

pub fn create_router(app_state: AppState, api_version: &str, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .nest("/aari", aari_routes(&app_state))
        .route(
            "/customer/submitCustomers",
            post(handlers::customer::submit_customers),
        )
        .route("/shop/getShopDetails", get(handlers::shop::get_shop_details))
        .route("/user/getUserDetails", post(handlers::user::get_user_details))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit,
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest(&format!("/{api_version}"), api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Span em INFO: os erros internos herdam método e URI mesmo com o filtro padrão
        .layer(
            TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)),
        )
        .layer(cors_layer(cors_origins))
        .with_state(app_state)
}
