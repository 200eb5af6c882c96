use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::{
        jwt::TokenKeys,
        memory::MemoryUserStore,
        password::{Argon2Hasher, CredentialHasher},
        repo::{PgUserStore, UserStore},
        services::AuthService,
    },
    config::AppConfig,
    db,
    transactions::{
        memory::MemoryTransactionStore,
        repo::{PgTransactionStore, TransactionStore},
        services::TransactionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub transactions: TransactionService,
}

impl AppState {
    /// Connects to Postgres and wires the services against it.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let pool = db::connect(&config.database_url).await?;
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);
        let users = Arc::new(PgUserStore::new(pool.clone(), hasher.clone()));
        let transactions = Arc::new(PgTransactionStore::new(pool.clone()));
        Ok((Self::from_parts(config, users, hasher, transactions), pool))
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        transactions: Arc<dyn TransactionStore>,
    ) -> Self {
        let keys = TokenKeys::new(&config.jwt);
        Self {
            config: Arc::new(config),
            auth: AuthService::new(users, hasher, keys),
            transactions: TransactionService::new(transactions),
        }
    }

    /// Same services over process-local stores. Nothing survives a restart.
    pub fn in_memory(config: AppConfig) -> Self {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);
        let users = Arc::new(MemoryUserStore::new(hasher.clone()));
        let transactions = Arc::new(MemoryTransactionStore::new());
        Self::from_parts(config, users, hasher, transactions)
    }
}
