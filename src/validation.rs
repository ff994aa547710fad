//! Input validation for the issue and admin endpoints.

use std::fmt;

pub const DEFAULT_PRODUCT_TYPE: &str = "item";

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// The issuer requires an owner, a product and a positive amount. Any
/// missing piece fails with one combined message naming all three.
pub fn validate_issue(
    user_id: Option<&str>,
    product: Option<&str>,
    amount: Option<i32>,
) -> Result<(), ValidationError> {
    if is_blank(user_id) || is_blank(product) || amount.map_or(true, |a| a <= 0) {
        return Err(ValidationError::new(
            "Missing required fields: user_id, product, amount",
        ));
    }
    Ok(())
}

/// Coerce a requested page size into 1..=MAX_PAGE_LIMIT.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Negative offsets are treated as 0.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_issue_passes() {
        assert!(validate_issue(Some("u1"), Some("VIP Rank"), Some(100)).is_ok());
    }

    #[test]
    fn test_missing_user_id_fails() {
        assert!(validate_issue(None, Some("VIP Rank"), Some(100)).is_err());
        assert!(validate_issue(Some("  "), Some("VIP Rank"), Some(100)).is_err());
    }

    #[test]
    fn test_missing_product_fails() {
        assert!(validate_issue(Some("u1"), None, Some(100)).is_err());
        assert!(validate_issue(Some("u1"), Some(""), Some(100)).is_err());
    }

    #[test]
    fn test_non_positive_amount_fails() {
        assert!(validate_issue(Some("u1"), Some("VIP Rank"), None).is_err());
        assert!(validate_issue(Some("u1"), Some("VIP Rank"), Some(0)).is_err());
        assert!(validate_issue(Some("u1"), Some("VIP Rank"), Some(-5)).is_err());
    }

    #[test]
    fn test_validation_message_names_all_fields() {
        let err = validate_issue(None, None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: user_id, product, amount"
        );
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_LIMIT);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-3)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_offset_clamping() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(20)), 20);
        assert_eq!(clamp_offset(Some(-1)), 0);
    }
}
