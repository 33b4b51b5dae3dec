// src/services/user_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{bare_phone_number, PHONE_PREFIX},
    },
    db::UserStore,
    models::user::{User, UserLookupPayload},
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

/// Todas as grafias que um telefone gravado pode ter: como veio, só dígitos, `+91` e `+91-`.
pub fn phone_variants(phone: &str) -> Vec<String> {
    let given = phone.trim();
    let bare = bare_phone_number(given);
    let mut variants = vec![
        given.to_string(),
        bare.to_string(),
        format!("+91{bare}"),
        format!("{PHONE_PREFIX}{bare}"),
    ];
    variants.sort();
    variants.dedup();
    variants
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get_user_details(&self, payload: UserLookupPayload) -> Result<User, AppError> {
        payload.validate()?;
        let (Some(email), Some(phone)) = (payload.email, payload.phone) else {
            return Err(AppError::InvalidInput("Email and phone number are required".into()));
        };

        self.store
            .find_by_email_and_phone(&email, &phone_variants(&phone))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
