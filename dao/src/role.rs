use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{DaoError, MockTransaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait RoleDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<RoleEntity>, DaoError>;
    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[RoleEntity]>, DaoError>;
}
