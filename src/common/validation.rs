// src/common/validation.rs
//
// Regras compartilhadas pelos derives do `validator` nos payloads.

use std::borrow::Cow;
use std::sync::LazyLock;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;

/// Prefixo de país que todo telefone gravado carrega.
pub const PHONE_PREFIX: &str = "+91-";

// Só dígitos ASCII: `\d` do crate regex aceita qualquer dígito Unicode.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+91-[0-9]{10}$").expect("valid phone regex"));

pub static DATE_OF_BIRTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("valid date-of-birth regex"));

/// IDs de cliente: 24 caracteres hexadecimais minúsculos.
pub static CUSTOMER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-f0-9]{24}$").expect("valid customer id regex"));

/// Casas decimais das colunas de preço (NUMERIC(12, 2)).
pub const PRICE_SCALE: u32 = 2;

/// Limite exclusivo da parte inteira de um preço (10 dígitos).
pub const PRICE_LIMIT: i64 = 10_000_000_000;

fn error_with_message(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Aceita instantes RFC 3339 e datas simples `YYYY-MM-DD` (meia-noite UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn validate_instant(value: &str) -> Result<(), ValidationError> {
    match parse_instant(value) {
        Some(_) => Ok(()),
        None => Err(error_with_message(
            "invalid_date",
            "Date must be an ISO 8601 date (YYYY-MM-DD or RFC 3339)",
        )),
    }
}

/// Texto obrigatório: só espaços conta como vazio.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error_with_message("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

pub fn parse_decimal(value: &str) -> Option<Decimal> {
    value.trim().parse::<Decimal>().ok()
}

// Positivo e dentro do que a coluna guarda sem arredondar nem estourar.
fn check_price(value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(error_with_message("not_positive", "Must be a positive number"));
    }
    if value >= Decimal::from(PRICE_LIMIT) {
        return Err(error_with_message("too_large", "Must be less than 10000000000"));
    }
    if value.normalize().scale() > PRICE_SCALE {
        return Err(error_with_message("too_precise", "Must have at most 2 decimal places"));
    }
    Ok(())
}

/// Campos de formulário chegam como texto; o número precisa ser um preço válido.
pub fn validate_positive_number_text(value: &str) -> Result<(), ValidationError> {
    match parse_decimal(value) {
        Some(n) => check_price(n),
        None => Err(error_with_message("not_a_number", "Must be a number")),
    }
}

pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    check_price(*value)
}

/// Dígitos do telefone sem o código do país, seja qual for a forma enviada.
pub fn bare_phone_number(phone: &str) -> &str {
    let phone = phone.trim();
    phone
        .strip_prefix(PHONE_PREFIX)
        .or_else(|| phone.strip_prefix("+91"))
        .unwrap_or(phone)
}

/// Desembrulha o corpo JSON; um corpo malformado vira `InvalidInput` em vez do 4xx em texto do axum.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// Apara e descarta texto opcional vazio.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
