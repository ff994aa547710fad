//! SQLx row type for the transactions table. Not exposed outside `db`;
//! everything above works with the domain [`Transaction`].

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionStatus};

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: String,
    pub username: Option<String>,
    pub product_name: String,
    pub product_type: String,
    pub amount: i32,
    pub token: String,
    pub status: String,
    pub game_account: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    pub fn into_domain(self) -> Transaction {
        Transaction {
            id: self.id,
            user_id: self.user_id,
            username: self.username,
            product_name: self.product_name,
            product_type: self.product_type,
            amount: self.amount,
            token: self.token,
            status: TransactionStatus::parse(&self.status),
            game_account: self.game_account,
            notes: self.notes,
            created_at: self.created_at,
            expires_at: self.expires_at,
            activated_at: self.activated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_domain_parses_status() {
        let now = Utc::now();
        let row = TransactionRow {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            username: None,
            product_name: "VIP Rank".to_string(),
            product_type: "item".to_string(),
            amount: 100,
            token: "ABCDEF123456".to_string(),
            status: "refunded".to_string(),
            game_account: None,
            notes: None,
            created_at: now,
            expires_at: None,
            activated_at: None,
        };

        let tx = row.into_domain();
        assert_eq!(tx.status, TransactionStatus::Other("refunded".to_string()));
        assert_eq!(tx.amount, 100);
    }
}
