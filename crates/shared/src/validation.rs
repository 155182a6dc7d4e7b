//! Common validation utilities for registration fields.

use validator::ValidationError;

lazy_static::lazy_static! {
    static ref ALPHA_SPACES: regex::Regex = regex::Regex::new(r"^[A-Za-z\s]+$").unwrap();
    static ref REG_NO: regex::Regex = regex::Regex::new(r"^[0-9]{12}$").unwrap();
    static ref PHONE: regex::Regex = regex::Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Validates that a name-like field contains only letters and spaces.
pub fn validate_alpha_name(value: &str) -> Result<(), ValidationError> {
    if ALPHA_SPACES.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("alpha_name");
        err.message = Some("Must contain only letters and spaces".into());
        Err(err)
    }
}

/// Validates a register number (exactly 12 digits).
pub fn validate_reg_no(value: &str) -> Result<(), ValidationError> {
    if REG_NO.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("reg_no_format");
        err.message = Some("Register number must be exactly 12 digits".into());
        Err(err)
    }
}

/// Validates a phone number (exactly 10 digits).
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be 10 digits".into());
        Err(err)
    }
}

/// Validates a year of study (1 to 4).
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    if (1..=4).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("year_range");
        err.message = Some("Year must be between 1 and 4".into());
        Err(err)
    }
}
