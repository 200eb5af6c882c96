use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    transactions::{
        repo::TransactionStore,
        repo_types::{ListOptions, Transaction, TransactionInput},
    },
};

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
}

fn not_found() -> AppError {
    AppError::NotFound("Transaction not found".into())
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: TransactionInput) -> AppResult<Transaction> {
        let tx = self.store.create(input).await?;
        info!(transaction_id = %tx.id, "new transaction has been inserted");
        Ok(tx)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Transaction> {
        self.store.get(id).await?.ok_or_else(not_found)
    }

    pub async fn list(&self, opts: ListOptions) -> AppResult<Vec<Transaction>> {
        Ok(self.store.list(opts).await?)
    }

    pub async fn update(&self, id: Uuid, input: TransactionInput) -> AppResult<Transaction> {
        if self.store.get(id).await?.is_none() {
            return Err(not_found());
        }
        // the row can vanish between the check and the write
        let tx = self.store.update(id, input).await?.ok_or_else(not_found)?;
        info!(transaction_id = %id, "transaction has been updated");
        Ok(tx)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.store.get(id).await?.is_none() {
            return Err(not_found());
        }
        if !self.store.delete(id).await? {
            return Err(not_found());
        }
        info!(transaction_id = %id, "transaction has been deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::{
        memory::MemoryTransactionStore,
        repo_types::{OrderBy, OrderDirection, TransactionStatus, TransactionType},
    };

    fn service() -> TransactionService {
        TransactionService::new(Arc::new(MemoryTransactionStore::new()))
    }

    fn input(amount: f64) -> TransactionInput {
        TransactionInput {
            amount,
            kind: TransactionType::Expense,
            status: None,
            category_id: "groceries".into(),
        }
    }

    fn page(number: u32, size: u32, by: OrderBy, dir: OrderDirection) -> ListOptions {
        ListOptions {
            page_number: number,
            items_per_page: size,
            order_by: by,
            order_direction: dir,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_pending() {
        let svc = service();
        let tx = svc.create(input(10.0)).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(svc.get(tx.id).await.unwrap(), tx);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let err = service().get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_keeps_status_when_absent() {
        let svc = service();
        let tx = svc
            .create(TransactionInput {
                status: Some(TransactionStatus::Completed),
                ..input(10.0)
            })
            .await
            .unwrap();
        let updated = svc.update(tx.id, input(99.5)).await.unwrap();
        assert_eq!(updated.amount, 99.5);
        assert_eq!(updated.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn update_and_delete_missing_are_not_found() {
        let svc = service();
        assert!(matches!(
            svc.update(Uuid::new_v4(), input(1.0)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let svc = service();
        let tx = svc.create(input(5.0)).await.unwrap();
        svc.delete(tx.id).await.unwrap();
        assert!(matches!(svc.get(tx.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_pages_by_amount() {
        let svc = service();
        for amount in [3.0, 1.0, 5.0, 2.0, 4.0] {
            svc.create(input(amount)).await.unwrap();
        }
        let first = svc
            .list(page(1, 2, OrderBy::Amount, OrderDirection::Asc))
            .await
            .unwrap();
        let amounts: Vec<f64> = first.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0]);

        let last = svc
            .list(page(3, 2, OrderBy::Amount, OrderDirection::Asc))
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].amount, 5.0);

        let desc = svc
            .list(page(1, 1, OrderBy::Amount, OrderDirection::Desc))
            .await
            .unwrap();
        assert_eq!(desc[0].amount, 5.0);
    }
}
