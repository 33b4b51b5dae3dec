// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "Priya")]
    pub name: String,
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[schema(example = "priya@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UserLookupPayload {
    #[validate(
        required(message = "Email and phone number are required"),
        email(message = "Email must be a valid email address")
    )]
    #[schema(example = "priya@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Email and phone number are required"),
        custom(function = "validate_not_blank", message = "Email and phone number are required")
    )]
    #[schema(example = "+91-9876543210")]
    pub phone: Option<String>,
}
