// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::validation::{
    validate_not_blank, CUSTOMER_ID_RE, DATE_OF_BIRTH_RE, PHONE_PREFIX, PHONE_RE,
};

pub const DEFAULT_DISTRICT: &str = "Dindigul";
pub const DEFAULT_STATE: &str = "Tamil Nadu";
pub const DEFAULT_MARITAL_STATUS: &str = "Single";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub id: i64,

    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d0")]
    pub customer_id: String,
    #[schema(example = "Meena")]
    pub name: String,
    #[schema(example = "+91-9876543210")]
    pub phone_number: String,
    pub alternate_number: Option<String>,

    pub address: String,
    pub town: Option<String>,
    #[schema(example = "Dindigul")]
    pub district: String,
    #[schema(example = "Tamil Nadu")]
    pub state: String,

    /// DD/MM/YYYY, gravado como digitado.
    #[schema(example = "21/04/1994")]
    pub date_of_birth: String,
    #[schema(example = "Married")]
    pub marital_status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados de cadastro validados e normalizados.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub customer_id: String,
    pub name: String,
    pub phone_number: String,
    pub alternate_number: Option<String>,
    pub address: String,
    pub town: Option<String>,
    pub district: String,
    pub state: String,
    pub date_of_birth: String,
    pub marital_status: String,
}

/// Campo único com que um insert colidiu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerKey {
    CustomerId,
    PhoneNumber,
}

impl CustomerKey {
    pub fn field_name(self) -> &'static str {
        match self {
            CustomerKey::CustomerId => "customerId",
            CustomerKey::PhoneNumber => "phoneNumber",
        }
    }
}

/// O prefixo sozinho é o que o formulário envia quando o campo fica vazio.
fn validate_alternate_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value == PHONE_PREFIX || PHONE_RE.is_match(value) {
        return Ok(());
    }
    let mut err = ValidationError::new("regex");
    err.message = Some("Alternate number must be in format +91-XXXXXXXXXX".into());
    Err(err)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerPayload {
    /// Gerado quando ausente.
    #[validate(regex(path = *CUSTOMER_ID_RE, message = "Customer ID must be 24 hexadecimal characters"))]
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d0")]
    pub customer_id: Option<String>,

    #[validate(
        required(message = "Name is required"),
        custom(function = "validate_not_blank", message = "Name is required"),
        length(max = 100, message = "Name cannot exceed 100 characters")
    )]
    #[schema(example = "Meena")]
    pub name: Option<String>,

    #[validate(
        required(message = "Phone number is required"),
        regex(path = *PHONE_RE, message = "Phone number must be in format +91-XXXXXXXXXX")
    )]
    #[schema(example = "+91-9876543210")]
    pub phone_number: Option<String>,

    #[validate(custom(function = "validate_alternate_number"))]
    #[schema(example = "+91-")]
    pub alternate_number: Option<String>,

    #[validate(
        required(message = "Address is required"),
        custom(function = "validate_not_blank", message = "Address is required"),
        length(max = 500, message = "Address cannot exceed 500 characters")
    )]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "Town/Village cannot exceed 100 characters"))]
    pub town: Option<String>,

    pub district: Option<String>,
    pub state: Option<String>,

    #[validate(
        required(message = "Date of birth is required"),
        regex(path = *DATE_OF_BIRTH_RE, message = "Date of birth must be in DD/MM/YYYY format")
    )]
    #[schema(example = "21/04/1994")]
    pub date_of_birth: Option<String>,

    pub marital_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub customer_id: String,
}
