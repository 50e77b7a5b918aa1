//! Input validation functions
//!
//! Limits applied to user records before they are stored.

use crate::errors::ValidationError;
use validator::ValidateEmail;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_FULL_NAME_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate password length
///
/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooLong {
            max: MAX_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Validate optional display name
pub fn validate_full_name(full_name: Option<&str>) -> Result<(), ValidationError> {
    match full_name {
        Some(name) if name.chars().count() > MAX_FULL_NAME_LEN => {
            Err(ValidationError::FullNameTooLong {
                max: MAX_FULL_NAME_LEN,
            })
        }
        _ => Ok(()),
    }
}
