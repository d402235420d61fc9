use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    role::{RoleDao, RoleEntity},
    DaoError,
};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{ResultDbErrorExt, TransactionImpl};

pub struct RoleDaoImpl {
    pub pool: Arc<SqlitePool>,
}
impl RoleDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RoleDb {
    id: Vec<u8>,
    name: String,
    description: Option<String>,
}
impl TryFrom<&RoleDb> for RoleEntity {
    type Error = DaoError;
    fn try_from(role: &RoleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&role.id).map_db_error()?,
            name: role.name.as_str().into(),
            description: role.description.as_deref().map(Into::into),
        })
    }
}

#[async_trait]
impl RoleDao for RoleDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<RoleEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        sqlx::query_as::<_, RoleDb>("SELECT id, name, description FROM roles WHERE id = ?")
            .bind(id_vec)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(RoleEntity::try_from)
            .transpose()
    }

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[RoleEntity]>, DaoError> {
        sqlx::query_as::<_, RoleDb>("SELECT id, name, description FROM roles")
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(RoleEntity::try_from)
            .collect()
    }
}
