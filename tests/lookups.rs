mod common;

use std::{sync::Arc, time::Duration};

use aari_backend::{
    cache::{Cache, MemoryCache},
    common::error::{AppError, ErrorKind},
    db::memory::{MemoryCustomerStore, MemoryShopStore, MemoryUserStore},
    models::{customer::RegisterCustomerPayload, user::UserLookupPayload},
    services::{shop_service::SHOP_CACHE_KEY, CustomerService, ShopService, UserService},
};
use async_trait::async_trait;
use axum::http::StatusCode;
use common::{app, shop, staff_user};
use serde_json::{json, Value};

fn registration(phone: &str) -> RegisterCustomerPayload {
    RegisterCustomerPayload {
        name: Some("Meena".into()),
        phone_number: Some(phone.into()),
        alternate_number: Some("+91-".into()),
        address: Some("4 Temple Street".into()),
        date_of_birth: Some("21/04/1994".into()),
        ..Default::default()
    }
}

// =============================================================================
//  CLIENTES
// =============================================================================

#[tokio::test]
async fn registration_applies_defaults_and_generates_an_id() {
    let store = Arc::new(MemoryCustomerStore::new());
    let service = CustomerService::new(store.clone());

    let customer = service.register(registration("+91-9876543210")).await.unwrap();

    assert_eq!(customer.customer_id.len(), 24);
    assert!(customer.customer_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(customer.alternate_number, None);
    assert_eq!(customer.district, "Dindigul");
    assert_eq!(customer.state, "Tamil Nadu");
    assert_eq!(customer.marital_status, "Single");
    assert_eq!(store.all().await.len(), 1);
}

#[tokio::test]
async fn duplicate_keys_are_conflicts_naming_the_field() {
    let service = CustomerService::new(Arc::new(MemoryCustomerStore::new()));
    let first = service.register(registration("+91-9876543210")).await.unwrap();

    let err = service.register(registration("+91-9876543210")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "phoneNumber already exists");

    let same_id = RegisterCustomerPayload {
        customer_id: Some(first.customer_id.clone()),
        ..registration("+91-9000000000")
    };
    let err = service.register(same_id).await.unwrap_err();
    assert_eq!(err.to_string(), "customerId already exists");
}

#[tokio::test]
async fn invalid_registration_is_rejected_before_any_write() {
    let store = Arc::new(MemoryCustomerStore::new());
    let service = CustomerService::new(store.clone());

    let bad = RegisterCustomerPayload {
        date_of_birth: Some("1994-04-21".into()),
        ..registration("9876543210")
    };
    let err = service.register(bad).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(store.all().await.is_empty());
}

#[tokio::test]
async fn customers_are_registered_over_http() {
    let app = app();
    let response = app
        .server
        .post("/v1/customer/submitCustomers")
        .json(&json!({
            "name": "Meena",
            "phoneNumber": "+91-9876543210",
            "address": "4 Temple Street",
            "town": "Palani",
            "dateOfBirth": "21/04/1994",
            "maritalStatus": "Married"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Customer saved successfully");
    let id = body["data"]["customerId"].as_str().unwrap();

    let stored = app.customers.all().await;
    assert_eq!(stored[0].customer_id, id);
    assert_eq!(stored[0].marital_status, "Married");
    assert_eq!(stored[0].town.as_deref(), Some("Palani"));

    let response = app
        .server
        .post("/v1/customer/submitCustomers")
        .text("not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
//  LOJA
// =============================================================================

/// Um cache que está sempre fora do ar.
struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::CacheError("connection refused".into()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), AppError> {
        Err(AppError::CacheError("connection refused".into()))
    }
}

#[tokio::test]
async fn shop_details_are_served_from_the_cache_after_the_first_read() {
    let store = Arc::new(MemoryShopStore::with_shop(shop()));
    let cache = Arc::new(MemoryCache::new());
    let shared: Arc<dyn Cache> = cache.clone();
    let service = ShopService::new(store.clone(), Some(shared), Duration::from_secs(60));

    assert_eq!(service.get_shop_details().await.unwrap(), shop());
    assert_eq!(service.get_shop_details().await.unwrap(), shop());

    assert_eq!(store.reads().await, 1);
    assert!(cache.get(SHOP_CACHE_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn shop_details_are_identical_without_a_working_cache() {
    let store = Arc::new(MemoryShopStore::with_shop(shop()));
    let broken_cache: Arc<dyn Cache> = Arc::new(BrokenCache);
    let broken = ShopService::new(store.clone(), Some(broken_cache), Duration::from_secs(60));
    let uncached = ShopService::new(store.clone(), None, Duration::from_secs(60));

    assert_eq!(broken.get_shop_details().await.unwrap(), shop());
    assert_eq!(uncached.get_shop_details().await.unwrap(), shop());
    assert_eq!(store.reads().await, 2);
}

#[tokio::test]
async fn missing_shop_is_not_found() {
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let service = ShopService::new(
        Arc::new(MemoryShopStore::default()),
        Some(cache),
        Duration::from_secs(60),
    );
    let err = service.get_shop_details().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn shop_details_over_http() {
    let app = app();
    let body: Value = app.server.get("/v1/shop/getShopDetails").await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Sri Aari Works");
    assert_eq!(body["data"]["authLogoUrl"], "https://cdn.example.com/auth-logo.png");
    assert_eq!(app.shops.reads().await, 1);
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

#[tokio::test]
async fn user_lookup_ignores_email_case_and_phone_prefix() {
    let service = UserService::new(Arc::new(MemoryUserStore::with_users(vec![staff_user()])));

    for phone in ["9876543210", "+919876543210", "+91-9876543210"] {
        let user = service
            .get_user_details(UserLookupPayload {
                email: Some("priya@example.com".into()),
                phone: Some(phone.into()),
            })
            .await
            .unwrap();
        assert_eq!(user, staff_user(), "{phone}");
    }

    let err = service
        .get_user_details(UserLookupPayload {
            email: Some("priya@example.com".into()),
            phone: Some("9000000000".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn user_lookup_over_http() {
    let app = app();

    let response = app
        .server
        .post("/v1/user/getUserDetails")
        .json(&json!({ "email": "PRIYA@example.com", "phone": "+91-9876543210" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "Priya");

    let response = app
        .server
        .post("/v1/user/getUserDetails")
        .json(&json!({ "email": "priya@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/v1/user/getUserDetails")
        .json(&json!({ "email": "nobody@example.com", "phone": "9876543210" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "User not found");
}
