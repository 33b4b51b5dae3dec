use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::user::User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// E-mail sem diferenciar maiúsculas; o telefone precisa ser uma das `phone_variants`.
    async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone_variants: &[String],
    ) -> Result<Option<User>, AppError>;
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone_variants: &[String],
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT name, phone_number, email
            FROM users
            WHERE LOWER(email) = LOWER($1) AND phone_number = ANY($2)
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(email.trim())
        .bind(phone_variants)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
