//! Request/response data transfer objects

pub mod invoice;
pub mod lorry_receipt;
pub mod numbering;
pub mod party;
pub mod payment;
pub mod truck_hiring_note;

use core_kernel::Currency;
use serde::Deserialize;

use crate::error::ApiError;

/// Shared list pagination query
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 500)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Resolves an optional currency code, defaulting to INR
pub(crate) fn parse_currency(code: &Option<String>) -> Result<Currency, ApiError> {
    match code {
        Some(code) => code
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("unknown currency: {code}"))),
        None => Ok(Currency::INR),
    }
}
