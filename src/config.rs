// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    cache::{Cache, RedisCache},
    db::{
        AariRepository, AariStore, CustomerRepository, CustomerStore, ShopRepository, ShopStore,
        UserRepository, UserStore,
    },
    middleware::rate_limit::{RateLimiter, DEFAULT_WINDOW},
    services::{AariService, CustomerService, ShopService, UserService},
    storage::{ObjectStorage, S3Storage},
};

const REQUIRED_VARS: &[&str] = &[
    "DATABASE_URL",
    "AWS_REGION",
    "KEY_ID",
    "ACCESS_KEY",
    "S3_BUCKET_NAME",
    "PORT",
    "JWT_SECRET",
];

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_API_VERSION: &str = "v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub aws_region: String,
    pub aws_key_id: String,
    pub aws_secret_key: String,
    pub s3_bucket: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Vazio significa qualquer origem.
    pub cors_origins: Vec<String>,
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub rate_limit_max: u32,
    pub api_version: String,
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Lê cada variável via `lookup`; todas as obrigatórias ausentes são reportadas juntas.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        let required = |name: &str| get(name).unwrap_or_default();

        let port_raw = required("PORT");
        let port = port_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name: "PORT", value: port_raw.clone() })?;

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty() && o != "*")
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url: required("DATABASE_URL"),
            aws_region: required("AWS_REGION"),
            aws_key_id: required("KEY_ID"),
            aws_secret_key: required("ACCESS_KEY"),
            s3_bucket: required("S3_BUCKET_NAME"),
            port,
            jwt_secret: required("JWT_SECRET"),
            cors_origins,
            redis_url: get("REDIS_URL"),
            cache_ttl: Duration::from_secs(parse_or(
                "CACHE_TTL_SECS",
                get("CACHE_TTL_SECS"),
                DEFAULT_CACHE_TTL_SECS,
            )?),
            rate_limit_max: parse_or("RATE_LIMIT_MAX", get("RATE_LIMIT_MAX"), DEFAULT_RATE_LIMIT_MAX)?,
            api_version: get("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}

pub async fn connect_database(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

/// Os colaboradores externos a partir dos quais os serviços são montados.
pub struct Collaborators {
    pub aari_store: Arc<dyn AariStore>,
    pub customer_store: Arc<dyn CustomerStore>,
    pub shop_store: Arc<dyn ShopStore>,
    pub user_store: Arc<dyn UserStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub cache: Option<Arc<dyn Cache>>,
}

// Estado compartilhado, acessível a todos os handlers
#[derive(Clone)]
pub struct AppState {
    pub aari_service: AariService,
    pub customer_service: CustomerService,
    pub shop_service: ShopService,
    pub user_service: UserService,
    pub jwt_secret: String,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn from_collaborators(
        collaborators: Collaborators,
        jwt_secret: String,
        cache_ttl: Duration,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            aari_service: AariService::new(collaborators.aari_store, collaborators.storage),
            customer_service: CustomerService::new(collaborators.customer_store),
            shop_service: ShopService::new(collaborators.shop_store, collaborators.cache, cache_ttl),
            user_service: UserService::new(collaborators.user_store),
            jwt_secret,
            rate_limiter,
        }
    }

    /// Montagem de produção: repositórios Postgres, S3 e (quando configurado) Redis.
    pub async fn new(config: &Config, pool: PgPool) -> Self {
        let storage = S3Storage::new(
            &config.aws_region,
            &config.aws_key_id,
            &config.aws_secret_key,
            &config.s3_bucket,
        )
        .await;

        let cache: Option<Arc<dyn Cache>> = match &config.redis_url {
            Some(url) => match RedisCache::connect(url).await {
                Ok(cache) => {
                    tracing::info!("✅ Cache Redis conectado");
                    Some(Arc::new(cache))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Redis indisponível, os detalhes da loja não serão cacheados");
                    None
                }
            },
            None => None,
        };

        let collaborators = Collaborators {
            aari_store: Arc::new(AariRepository::new(pool.clone())),
            customer_store: Arc::new(CustomerRepository::new(pool.clone())),
            shop_store: Arc::new(ShopRepository::new(pool.clone())),
            user_store: Arc::new(UserRepository::new(pool)),
            storage: Arc::new(storage),
            cache,
        };

        Self::from_collaborators(
            collaborators,
            config.jwt_secret.clone(),
            config.cache_ttl,
            RateLimiter::new(config.rate_limit_max, DEFAULT_WINDOW),
        )
    }
}
