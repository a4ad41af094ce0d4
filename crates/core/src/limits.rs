//! Column widths for free-text fields.
//!
//! Values are measured in characters, matching `VARCHAR(n)`.

use thiserror::Error;

pub const PRODUCT_NAME: usize = 100;
pub const IMAGE_URL: usize = 500;
pub const SHOP_NAME: usize = 100;
pub const CATEGORY: usize = 50;
pub const SHOP_NUMBER: usize = 20;
pub const EVENT_NAME: usize = 100;
pub const DELIVERY_ADDRESS: usize = 255;
pub const CONTACT_NUMBER: usize = 100;

/// A text field longer than its column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be at most {max} characters")]
pub struct TooLong {
    pub field: &'static str,
    pub max: usize,
}

/// Check that `value` fits in `max` characters.
///
/// # Errors
///
/// Returns [`TooLong`] naming `field` when it does not.
pub fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), TooLong> {
    if value.chars().count() > max {
        return Err(TooLong { field, max });
    }
    Ok(())
}

/// [`check_len`] for optional fields; `None` always fits.
///
/// # Errors
///
/// Returns [`TooLong`] naming `field` when the value does not fit.
pub fn check_opt_len(field: &'static str, value: Option<&str>, max: usize) -> Result<(), TooLong> {
    value.map_or(Ok(()), |v| check_len(field, v, max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_characters_not_bytes() {
        let name = "é".repeat(PRODUCT_NAME);
        assert_eq!(check_len("name", &name, PRODUCT_NAME), Ok(()));
    }

    #[test]
    fn test_rejects_one_over() {
        let name = "a".repeat(PRODUCT_NAME + 1);
        let err = check_len("name", &name, PRODUCT_NAME).unwrap_err();
        assert_eq!(err.to_string(), "name must be at most 100 characters");
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(check_opt_len("category", None, CATEGORY), Ok(()));
        assert!(check_opt_len("category", Some(&"x".repeat(51)), CATEGORY).is_err());
    }
}
