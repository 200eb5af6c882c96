use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// Transaction record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub category_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Writable fields. A missing status means `pending` on create and
/// "unchanged" on update.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub amount: f64,
    pub kind: TransactionType,
    pub status: Option<TransactionStatus>,
    pub category_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Amount,
}

impl OrderBy {
    pub fn column(self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "created_at",
            OrderBy::UpdatedAt => "updated_at",
            OrderBy::Amount => "amount",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

impl OrderDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// One page of a listing. `page_number` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page_number: u32,
    pub items_per_page: u32,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
}

impl ListOptions {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page_number) - 1) * i64::from(self.items_per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.items_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_serializes_kind_as_type() {
        let now = OffsetDateTime::now_utc();
        let tx = Transaction {
            id: Uuid::new_v4(),
            amount: 12.5,
            kind: TransactionType::Expense,
            status: TransactionStatus::Pending,
            category_id: "food".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["status"], "pending");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn page_offsets() {
        let opts = ListOptions {
            page_number: 3,
            items_per_page: 20,
            order_by: OrderBy::default(),
            order_direction: OrderDirection::default(),
        };
        assert_eq!(opts.offset(), 40);
        assert_eq!(opts.limit(), 20);
        assert_eq!(opts.order_by.column(), "created_at");
        assert_eq!(opts.order_direction.keyword(), "DESC");
    }
}
