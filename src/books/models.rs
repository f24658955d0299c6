// Book data models and request DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Book record as stored and returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub launch_date: DateTime<Utc>,
    pub price: Decimal,
    pub title: String,
}

/// Request body for creating and updating a book
///
/// `id` is ignored on create and required on update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: Option<i64>,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub author: String,
    pub launch_date: DateTime<Utc>,
    #[validate(custom = "crate::validation::validate_non_negative_price")]
    pub price: Decimal,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub title: String,
}
