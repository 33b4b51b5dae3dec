// src/models/aari.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::{
    error::AppError,
    validation::{
        non_empty, parse_decimal, parse_instant, validate_instant, validate_not_blank,
        validate_positive_decimal, validate_positive_number_text, PHONE_RE,
    },
};

/// Máximo de imagens de design por pedido.
pub const MAX_DESIGNS: usize = 5;

/// Limite de upload por imagem (20 MiB, exclusivo).
pub const MAX_DESIGN_BYTES: usize = 20 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Prefixo da chave de todo design no bucket.
pub const DESIGN_KEY_PREFIX: &str = "Aari";

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "aari_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AariStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "aari_work_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Bridal,
    Normal,
}

impl FromStr for WorkType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bridal" => Ok(WorkType::Bridal),
            "normal" => Ok(WorkType::Normal),
            _ => Err(()),
        }
    }
}

// --- O PEDIDO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AariOrder {
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub id: i64,

    #[schema(example = "AARI-1042")]
    pub order_id: String,
    #[schema(example = "65f1c2a9b3e4d5f6a7b8c9d0")]
    pub customer_id: String,

    #[schema(example = "Lakshmi")]
    pub name: String,
    #[schema(example = "+91-9876543210")]
    pub phone_number: String,
    pub address: String,
    pub staff_name: String,
    pub additional_information: Option<String>,

    pub submission_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,

    pub work_type: WorkType,

    pub designs: Vec<String>,

    #[schema(value_type = f64, example = 2500.0)]
    pub quoted_price: Decimal,
    #[schema(value_type = Option<f64>)]
    pub worker_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub client_price: Option<Decimal>,

    pub status: AariStatus,
    pub completed_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pedido já validado e pronto para gravar, sem os designs.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAariOrder {
    pub order_id: String,
    pub customer_id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub staff_name: String,
    pub additional_information: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub work_type: WorkType,
    pub quoted_price: Decimal,
}

/// Clientes antigos leem `design1..design5`. Calculado a partir de `designs`, nunca gravado.
pub fn design_slots(designs: &[String]) -> [Option<String>; MAX_DESIGNS] {
    std::array::from_fn(|i| designs.get(i).cloned())
}

/// Pedido completo como os endpoints de atualização devolvem, com os slots antigos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AariOrderView {
    #[serde(flatten)]
    pub order: AariOrder,
    pub design1: Option<String>,
    pub design2: Option<String>,
    pub design3: Option<String>,
    pub design4: Option<String>,
    pub design5: Option<String>,
}

impl From<AariOrder> for AariOrderView {
    fn from(order: AariOrder) -> Self {
        let [design1, design2, design3, design4, design5] = design_slots(&order.designs);
        Self {
            order,
            design1,
            design2,
            design3,
            design4,
            design5,
        }
    }
}

// --- PROJEÇÕES DAS LISTAGENS ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingAariSummary {
    pub order_id: String,
    pub name: String,
    pub designs: Vec<String>,
    pub status: AariStatus,
    pub address: String,
    pub delivery_date: DateTime<Utc>,
    #[schema(value_type = Option<f64>)]
    pub worker_price: Option<Decimal>,
    pub work_type: WorkType,
}

impl From<&AariOrder> for PendingAariSummary {
    fn from(order: &AariOrder) -> Self {
        Self {
            order_id: order.order_id.clone(),
            name: order.name.clone(),
            designs: order.designs.clone(),
            status: order.status,
            address: order.address.clone(),
            delivery_date: order.delivery_date,
            worker_price: order.worker_price,
            work_type: order.work_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedAariSummary {
    pub order_id: String,
    pub name: String,
    pub phone_number: String,
    /// Primeiro design do pedido.
    pub design: Option<String>,
    pub status: AariStatus,
    pub completed_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>)]
    pub client_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub worker_price: Option<Decimal>,
}

impl From<&AariOrder> for CompletedAariSummary {
    fn from(order: &AariOrder) -> Self {
        Self {
            order_id: order.order_id.clone(),
            name: order.name.clone(),
            phone_number: order.phone_number.clone(),
            design: order.designs.first().cloned(),
            status: order.status,
            completed_date: order.completed_date,
            client_price: order.client_price,
            worker_price: order.worker_price,
        }
    }
}

/// Como `setClientPrice` encontra o pedido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientPriceSelector {
    OrderId(String),
    /// Pedido mais recente (por criação) com este telefone.
    PhoneNumber(String),
}

// --- PAYLOADS ---

fn validate_work_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<WorkType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("work_type");
        err.message = Some("Work type must be either 'bridal' or 'normal'".into());
        err
    })
}

fn validate_schedule(form: &SubmitAariForm) -> Result<(), ValidationError> {
    let submission = form.submission_date.as_deref().and_then(parse_instant);
    let delivery = form.delivery_date.as_deref().and_then(parse_instant);

    // Datas inválidas já são reportadas nos próprios campos.
    if let (Some(submission), Some(delivery)) = (submission, delivery) {
        if delivery <= submission {
            let mut err = ValidationError::new("delivery_before_submission");
            err.message = Some("Delivery date must be after submission date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Campos de texto do envio multipart. Tudo chega como texto e é
/// checado aqui antes de virar um `NewAariOrder`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_schedule", skip_on_field_errors = false))]
pub struct SubmitAariForm {
    #[validate(
        required(message = "Customer ID is required"),
        custom(function = "validate_not_blank", message = "Customer ID is required")
    )]
    pub customer_id: Option<String>,

    #[validate(
        required(message = "Order ID is required"),
        custom(function = "validate_not_blank", message = "Order ID is required"),
        length(max = 64, message = "Order ID cannot exceed 64 characters")
    )]
    #[schema(example = "AARI-1042")]
    pub order_id: Option<String>,

    #[validate(
        required(message = "Name is required"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Phone number is required"),
        regex(path = *PHONE_RE, message = "Phone number must be in format +91-XXXXXXXXXX")
    )]
    #[schema(example = "+91-9876543210")]
    pub phone_number: Option<String>,

    #[validate(
        required(message = "Submission date is required"),
        custom(function = "validate_instant")
    )]
    #[schema(example = "2025-03-01")]
    pub submission_date: Option<String>,

    #[validate(
        required(message = "Delivery date is required"),
        custom(function = "validate_instant")
    )]
    #[schema(example = "2025-03-15")]
    pub delivery_date: Option<String>,

    #[validate(
        required(message = "Address is required"),
        custom(function = "validate_not_blank", message = "Address is required")
    )]
    pub address: Option<String>,

    #[validate(length(max = 1000, message = "Additional information cannot exceed 1000 characters"))]
    pub additional_information: Option<String>,

    #[validate(
        required(message = "Staff name is required"),
        custom(function = "validate_not_blank", message = "Staff name is required")
    )]
    pub staff_name: Option<String>,

    #[validate(
        required(message = "Work type is required"),
        custom(function = "validate_work_type")
    )]
    #[schema(example = "bridal")]
    pub work_type: Option<String>,

    #[validate(
        required(message = "Quoted price is required"),
        custom(function = "validate_positive_number_text")
    )]
    #[schema(example = "2500")]
    pub quoted_price: Option<String>,
}

fn required_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{field} is required")))
}

impl SubmitAariForm {
    /// Monta o pedido tipado. Chamar depois de `validate()`; refaz o parse para nunca dar panic.
    pub fn into_new_order(self) -> Result<NewAariOrder, AppError> {
        let submission_date = required_field(self.submission_date, "submissionDate")?;
        let delivery_date = required_field(self.delivery_date, "deliveryDate")?;
        let work_type = required_field(self.work_type, "workType")?;
        let quoted_price = required_field(self.quoted_price, "quotedPrice")?;

        Ok(NewAariOrder {
            order_id: required_field(self.order_id, "orderId")?,
            customer_id: required_field(self.customer_id, "customerId")?,
            name: required_field(self.name, "name")?,
            phone_number: required_field(self.phone_number, "phoneNumber")?,
            address: required_field(self.address, "address")?,
            staff_name: required_field(self.staff_name, "staffName")?,
            additional_information: non_empty(self.additional_information),
            submission_date: parse_instant(&submission_date)
                .ok_or_else(|| AppError::InvalidInput("Invalid submission date".into()))?,
            delivery_date: parse_instant(&delivery_date)
                .ok_or_else(|| AppError::InvalidInput("Invalid delivery date".into()))?,
            work_type: work_type
                .parse()
                .map_err(|_| AppError::InvalidInput("Invalid work type".into()))?,
            quoted_price: parse_decimal(&quoted_price)
                .ok_or_else(|| AppError::InvalidInput("Invalid quoted price".into()))?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPricePayload {
    #[validate(
        required(message = "Worker price is required"),
        custom(function = "validate_positive_decimal")
    )]
    #[schema(value_type = f64, example = 800.0)]
    pub worker_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPricePayload {
    #[validate(
        required(message = "Client price is required"),
        custom(function = "validate_positive_decimal")
    )]
    #[schema(value_type = f64, example = 3000.0)]
    pub client_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRef {
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesignUrls {
    pub designs: Vec<String>,
}

// --- UPLOADS DE DESIGN ---

/// Uma parte de imagem do envio, já lida para a memória.
#[derive(Debug, Clone)]
pub struct DesignUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DesignUpload {
    pub fn has_allowed_type(&self) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&self.content_type.as_str())
    }

    /// Extensão da chave do objeto: a do nome do arquivo, senão a derivada do content type.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| match self.content_type.as_str() {
                "image/png" => "png".to_string(),
                _ => "jpg".to_string(),
            })
    }
}
