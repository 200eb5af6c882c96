use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::transactions::repo_types::{ListOptions, Transaction, TransactionInput};

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Transaction>>;
    async fn list(&self, opts: ListOptions) -> anyhow::Result<Vec<Transaction>>;
    async fn create(&self, input: TransactionInput) -> anyhow::Result<Transaction>;
    async fn update(&self, id: Uuid, input: TransactionInput)
        -> anyhow::Result<Option<Transaction>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

const TX_COLUMNS: &str = "id, amount, kind, status, category_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgTransactionStore {
    db: PgPool,
}

impl PgTransactionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get transaction")?;
        Ok(row)
    }

    async fn list(&self, opts: ListOptions) -> anyhow::Result<Vec<Transaction>> {
        // column and direction come from closed enums, never from raw input
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions ORDER BY {} {}, id LIMIT $1 OFFSET $2",
            opts.order_by.column(),
            opts.order_direction.keyword(),
        );
        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(opts.limit())
            .bind(opts.offset())
            .fetch_all(&self.db)
            .await
            .context("list transactions")?;
        Ok(rows)
    }

    async fn create(&self, input: TransactionInput) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions (amount, kind, status, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {TX_COLUMNS}"
        ))
        .bind(input.amount)
        .bind(input.kind)
        .bind(input.status.unwrap_or_default())
        .bind(&input.category_id)
        .fetch_one(&self.db)
        .await
        .context("insert transaction")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        input: TransactionInput,
    ) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "UPDATE transactions
                SET amount = $2,
                    kind = $3,
                    status = COALESCE($4, status),
                    category_id = $5,
                    updated_at = now()
              WHERE id = $1
          RETURNING {TX_COLUMNS}"
        ))
        .bind(id)
        .bind(input.amount)
        .bind(input.kind)
        .bind(input.status)
        .bind(&input.category_id)
        .fetch_optional(&self.db)
        .await
        .context("update transaction")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete transaction")?;
        Ok(res.rows_affected() > 0)
    }
}
