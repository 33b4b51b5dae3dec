#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use aari_backend::{
    cache::{Cache, MemoryCache},
    common::error::AppError,
    config::{AppState, Collaborators},
    db::memory::{MemoryAariStore, MemoryCustomerStore, MemoryShopStore, MemoryUserStore},
    middleware::{
        auth::issue_token,
        rate_limit::{RateLimiter, DEFAULT_WINDOW},
    },
    models::{
        aari::{DesignUpload, SubmitAariForm},
        shop::Shop,
        user::User,
    },
    routes::create_router,
    storage::{public_object_url, ObjectStorage},
};
use async_trait::async_trait;
use axum_test::TestServer;
use tokio::sync::Mutex;

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const BUCKET: &str = "aari-designs";
pub const REGION: &str = "ap-south-1";

/// Armazenamento de objetos que guarda tudo em memória.
/// Os uploads terminam na ordem inversa do primeiro byte: a ordem de conclusão difere da dos arquivos.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object_for_url(&self, url: &str) -> Option<Vec<u8>> {
        let prefix = public_object_url(BUCKET, REGION, "");
        let key = url.strip_prefix(&prefix)?;
        self.objects.lock().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<String, AppError> {
        let delay = 10u64.saturating_sub(body.first().copied().unwrap_or(0) as u64);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.objects.lock().await.insert(key.to_string(), body);
        Ok(public_object_url(BUCKET, REGION, key))
    }
}

pub fn png(first_byte: u8) -> DesignUpload {
    DesignUpload {
        file_name: format!("design-{first_byte}.png"),
        content_type: "image/png".into(),
        bytes: vec![first_byte, 0x50, 0x4e, 0x47],
    }
}

pub fn form(order_id: &str) -> SubmitAariForm {
    SubmitAariForm {
        customer_id: Some("65f1c2a9b3e4d5f6a7b8c9d0".into()),
        order_id: Some(order_id.into()),
        name: Some("Lakshmi".into()),
        phone_number: Some("+91-9876543210".into()),
        submission_date: Some("2025-03-01".into()),
        delivery_date: Some("2025-03-15".into()),
        address: Some("12 Main Road, Dindigul".into()),
        additional_information: Some("Gold zari on the sleeves".into()),
        staff_name: Some("Revathi".into()),
        work_type: Some("bridal".into()),
        quoted_price: Some("2500".into()),
    }
}

pub fn shop() -> Shop {
    Shop {
        name: "Sri Aari Works".into(),
        logo_url: Some("https://cdn.example.com/logo.png".into()),
        auth_logo_url: Some("https://cdn.example.com/auth-logo.png".into()),
    }
}

pub fn staff_user() -> User {
    User {
        name: "Priya".into(),
        phone_number: "9876543210".into(),
        email: "Priya@Example.com".into(),
    }
}

pub fn token() -> String {
    issue_token("revathi", TEST_SECRET, chrono::Duration::hours(1)).expect("token")
}

/// Um router completo sobre colaboradores em memória.
pub struct TestApp {
    pub server: TestServer,
    pub orders: Arc<MemoryAariStore>,
    pub customers: Arc<MemoryCustomerStore>,
    pub shops: Arc<MemoryShopStore>,
    pub storage: Arc<MemoryStorage>,
}

pub fn app_with(storage: Arc<dyn ObjectStorage>, rate_limit_max: u32) -> (TestServer, Arc<MemoryAariStore>) {
    let orders = Arc::new(MemoryAariStore::new());
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let state = AppState::from_collaborators(
        Collaborators {
            aari_store: orders.clone(),
            customer_store: Arc::new(MemoryCustomerStore::new()),
            shop_store: Arc::new(MemoryShopStore::with_shop(shop())),
            user_store: Arc::new(MemoryUserStore::with_users(vec![staff_user()])),
            storage,
            cache: Some(cache),
        },
        TEST_SECRET.into(),
        Duration::from_secs(60),
        RateLimiter::new(rate_limit_max, DEFAULT_WINDOW),
    );
    let server = TestServer::try_new(create_router(state, "v1", &[])).expect("test server");
    (server, orders)
}

pub fn app() -> TestApp {
    let orders = Arc::new(MemoryAariStore::new());
    let customers = Arc::new(MemoryCustomerStore::new());
    let shops = Arc::new(MemoryShopStore::with_shop(shop()));
    let storage = Arc::new(MemoryStorage::new());
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

    let state = AppState::from_collaborators(
        Collaborators {
            aari_store: orders.clone(),
            customer_store: customers.clone(),
            shop_store: shops.clone(),
            user_store: Arc::new(MemoryUserStore::with_users(vec![staff_user()])),
            storage: storage.clone(),
            cache: Some(cache),
        },
        TEST_SECRET.into(),
        Duration::from_secs(60),
        RateLimiter::new(1000, DEFAULT_WINDOW),
    );

    TestApp {
        server: TestServer::try_new(create_router(state, "v1", &[])).expect("test server"),
        orders,
        customers,
        shops,
        storage,
    }
}
