// Person data models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Person record as stored and returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub enabled: bool,
}

/// Request body for creating and updating a person
///
/// `id` is ignored on create and required on update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    pub id: Option<i64>,
    #[validate(
        length(max = 80, message = "First name must be at most 80 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub first_name: String,
    #[validate(
        length(max = 80, message = "Last name must be at most 80 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub last_name: String,
    #[validate(
        length(max = 100, message = "Address must be at most 100 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub address: String,
    #[validate(
        length(max = 6, message = "Gender must be at most 6 characters"),
        custom = "crate::validation::validate_gender"
    )]
    pub gender: String,
}
