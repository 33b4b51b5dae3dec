// src/services/customer_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        validation::{non_empty, PHONE_PREFIX},
    },
    db::{customer_repo::conflict_error, CustomerStore},
    models::customer::{
        Customer, NewCustomer, RegisterCustomerPayload, DEFAULT_DISTRICT, DEFAULT_MARITAL_STATUS,
        DEFAULT_STATE,
    },
};

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

/// 24 caracteres hexadecimais minúsculos, o mesmo formato que os clientes já guardam.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    non_empty(value).ok_or_else(|| AppError::InvalidInput(message.into()))
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, payload: RegisterCustomerPayload) -> Result<Customer, AppError> {
        payload.validate()?;

        let alternate_number =
            non_empty(payload.alternate_number).filter(|number| number != PHONE_PREFIX);

        let customer = NewCustomer {
            customer_id: non_empty(payload.customer_id).unwrap_or_else(generate_customer_id),
            name: required(payload.name, "Name is required")?,
            phone_number: required(payload.phone_number, "Phone number is required")?,
            alternate_number,
            address: required(payload.address, "Address is required")?,
            town: non_empty(payload.town),
            district: non_empty(payload.district).unwrap_or_else(|| DEFAULT_DISTRICT.into()),
            state: non_empty(payload.state).unwrap_or_else(|| DEFAULT_STATE.into()),
            date_of_birth: required(payload.date_of_birth, "Date of birth is required")?,
            marital_status: non_empty(payload.marital_status)
                .unwrap_or_else(|| DEFAULT_MARITAL_STATUS.into()),
        };

        if let Some(key) = self
            .store
            .find_conflict(&customer.customer_id, &customer.phone_number)
            .await?
        {
            return Err(conflict_error(key));
        }

        // O insert ainda pode perder uma corrida; o repositório também devolve Conflict.
        let saved = self.store.insert(&customer).await?;
        tracing::info!(customer_id = %saved.customer_id, "✅ Cliente salvo");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_match_the_customer_id_shape() {
        let id = generate_customer_id();
        assert!(crate::common::validation::CUSTOMER_ID_RE.is_match(&id));
        assert_ne!(id, generate_customer_id());
    }
}
