// Validation utilities module
// Custom validation functions used by the request DTOs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Rejects strings that are empty or whitespace-only
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}

/// Validates that a gender is one of the accepted values (case-insensitive)
pub fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    let valid = ["male", "female"];
    if valid.contains(&gender.trim().to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_gender"))
    }
}

/// Validates that a price is zero or positive
pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        Err(ValidationError::new("price_must_not_be_negative"))
    } else {
        Ok(())
    }
}
