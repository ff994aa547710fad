//! Transaction domain entity and the token lifecycle state machine.
//!
//! The state machine has exactly one transition, `pending -> activated`,
//! performed by the redeemer. Administrators may overwrite `status` with
//! arbitrary strings outside the state machine, so the type keeps an
//! `Other` case carrying the raw value instead of rejecting it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Activated,
    /// Administrator-assigned status outside the state machine
    /// (e.g. "refunded").
    Other(String),
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => TransactionStatus::Pending,
            "activated" => TransactionStatus::Activated,
            other => TransactionStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Activated => "activated",
            TransactionStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TransactionStatus::parse(&raw))
    }
}

/// Why a token cannot be redeemed. Check order matters: an activated token
/// whose expiry has also passed reports "already used", not "expired".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedeemError {
    #[error("Token already used")]
    AlreadyUsed,
    #[error("Token expired")]
    Expired,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub username: Option<String>,
    pub product_name: String,
    pub product_type: String,
    pub amount: i32,
    pub token: String,
    pub status: TransactionStatus,
    pub game_account: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Build a fresh pending transaction with a newly generated token.
    /// `expires_at` is fixed at creation and never recomputed.
    pub fn new(
        user_id: String,
        username: Option<String>,
        product_name: String,
        product_type: String,
        amount: i32,
        ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            product_name,
            product_type,
            amount,
            token: token::generate(),
            status: TransactionStatus::Pending,
            game_account: None,
            notes: None,
            created_at: now,
            expires_at: Some(now + Duration::hours(ttl_hours)),
            activated_at: None,
        }
    }

    /// Validate this record against the redemption state machine as of
    /// `now`. A null expiry means the token never expires.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), RedeemError> {
        if self.status == TransactionStatus::Activated {
            return Err(RedeemError::AlreadyUsed);
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return Err(RedeemError::Expired);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction() -> Transaction {
        Transaction::new(
            "u1".to_string(),
            Some("alice".to_string()),
            "VIP Rank".to_string(),
            "item".to_string(),
            100,
            24,
        )
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(TransactionStatus::parse("pending"), TransactionStatus::Pending);
        assert_eq!(
            TransactionStatus::parse("activated"),
            TransactionStatus::Activated
        );
        assert_eq!(
            TransactionStatus::parse("refunded"),
            TransactionStatus::Other("refunded".to_string())
        );
        assert_eq!(TransactionStatus::parse("refunded").as_str(), "refunded");
        assert_eq!(TransactionStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_new_transaction_is_pending_with_24h_expiry() {
        let tx = sample_transaction();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.activated_at.is_none());
        assert!(tx.game_account.is_none());
        assert_eq!(
            tx.expires_at.unwrap(),
            tx.created_at + Duration::hours(24)
        );
        assert_eq!(tx.token.len(), crate::token::TOKEN_LEN);
    }

    #[test]
    fn test_pending_unexpired_is_redeemable() {
        let tx = sample_transaction();
        assert_eq!(tx.check_redeemable(Utc::now()), Ok(()));
    }

    #[test]
    fn test_activated_is_already_used() {
        let mut tx = sample_transaction();
        tx.status = TransactionStatus::Activated;
        assert_eq!(
            tx.check_redeemable(Utc::now()),
            Err(RedeemError::AlreadyUsed)
        );
    }

    #[test]
    fn test_expired_pending_is_expired() {
        let mut tx = sample_transaction();
        tx.expires_at = Some(Utc::now() - Duration::hours(1));
        assert_eq!(tx.check_redeemable(Utc::now()), Err(RedeemError::Expired));
    }

    #[test]
    fn test_activated_and_expired_reports_already_used() {
        // Check order is significant: "already used" wins over "expired".
        let mut tx = sample_transaction();
        tx.status = TransactionStatus::Activated;
        tx.expires_at = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            tx.check_redeemable(Utc::now()),
            Err(RedeemError::AlreadyUsed)
        );
    }

    #[test]
    fn test_null_expiry_never_expires() {
        let mut tx = sample_transaction();
        tx.expires_at = None;
        assert_eq!(
            tx.check_redeemable(Utc::now() + Duration::days(365)),
            Ok(())
        );
    }

    #[test]
    fn test_admin_status_does_not_block_redemption() {
        // Only "activated" is rejected by the state machine; an
        // administrator-assigned status like "refunded" falls through.
        let mut tx = sample_transaction();
        tx.status = TransactionStatus::Other("refunded".to_string());
        assert_eq!(tx.check_redeemable(Utc::now()), Ok(()));
    }
}
