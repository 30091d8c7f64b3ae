use lazy_static::lazy_static;
use regex::Regex;

use crate::store::StoreError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed, lower-cased email, or a validation error.
pub fn normalize_email(raw: &str) -> Result<String, StoreError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(StoreError::Validation("invalid email".into()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Cook@Example.COM ").unwrap(),
            "cook@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_garbage() {
        for bad in ["", "cook", "cook@", "cook@example", "co ok@example.com"] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
