use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transactions::{
    repo::TransactionStore,
    repo_types::{ListOptions, OrderBy, OrderDirection, Transaction, TransactionInput},
};

#[derive(Clone, Default)]
pub struct MemoryTransactionStore {
    rows: Arc<Mutex<HashMap<Uuid, Transaction>>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, HashMap<Uuid, Transaction>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("transaction store lock poisoned"))
    }
}

fn compare(a: &Transaction, b: &Transaction, by: OrderBy) -> Ordering {
    let primary = match by {
        OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
        OrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        OrderBy::Amount => a.amount.total_cmp(&b.amount),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list(&self, opts: ListOptions) -> anyhow::Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self.lock()?.values().cloned().collect();
        rows.sort_by(|a, b| match opts.order_direction {
            OrderDirection::Asc => compare(a, b, opts.order_by),
            OrderDirection::Desc => compare(b, a, opts.order_by),
        });
        Ok(rows
            .into_iter()
            .skip(opts.offset() as usize)
            .take(opts.limit() as usize)
            .collect())
    }

    async fn create(&self, input: TransactionInput) -> anyhow::Result<Transaction> {
        let now = OffsetDateTime::now_utc();
        let tx = Transaction {
            id: Uuid::new_v4(),
            amount: input.amount,
            kind: input.kind,
            status: input.status.unwrap_or_default(),
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.insert(tx.id, tx.clone());
        Ok(tx)
    }

    async fn update(
        &self,
        id: Uuid,
        input: TransactionInput,
    ) -> anyhow::Result<Option<Transaction>> {
        let mut rows = self.lock()?;
        let Some(tx) = rows.get_mut(&id) else {
            return Ok(None);
        };
        tx.amount = input.amount;
        tx.kind = input.kind;
        if let Some(status) = input.status {
            tx.status = status;
        }
        tx.category_id = input.category_id;
        tx.updated_at = OffsetDateTime::now_utc();
        Ok(Some(tx.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock()?.remove(&id).is_some())
    }
}
