// src/common/pagination.rs

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// `?page=&limit=` como o cliente envia. Ambos opcionais e positivos (page começa em 1).
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    #[param(example = 1)]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[param(example = 10)]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl From<&PaginationQuery> for Pagination {
    fn from(query: &PaginationQuery) -> Self {
        Self::new(
            query.page.unwrap_or(DEFAULT_PAGE),
            query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(2, 10).offset(), 10);
        assert_eq!(Pagination::new(3, 7).offset(), 14);
    }

    #[test]
    fn query_defaults() {
        let p = Pagination::from(&PaginationQuery::default());
        assert_eq!(p, Pagination::new(1, 10));
    }

    #[test]
    fn query_rejects_non_positive_values() {
        let q = PaginationQuery { page: Some(0), limit: Some(0) };
        let errors = q.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
        assert!(errors.field_errors().contains_key("limit"));

        let q = PaginationQuery { page: Some(1), limit: Some(101) };
        assert!(q.validate().is_err());
    }
}
