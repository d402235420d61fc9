use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod agenda;
pub mod hour_rule;
pub mod role;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Marker trait for a unit-of-work handle. dao traits only ever see this
/// trait so `service_impl` never depends on a specific storage backend.
pub trait Transaction: Clone + Send + Sync + 'static {}

#[derive(Clone, Debug, Default)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
