use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    hour_rule::{AvailabilityRuleDao, AvailabilityRuleEntity, BusinessRuleDao, BusinessRuleEntity},
    DaoError,
};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    wire::{parse_date, parse_time},
    ResultDbErrorExt, TransactionImpl,
};

pub struct AvailabilityRuleDaoImpl {
    pub pool: Arc<SqlitePool>,
}
impl AvailabilityRuleDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

pub struct BusinessRuleDaoImpl {
    pub pool: Arc<SqlitePool>,
}
impl BusinessRuleDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AvailabilityRuleDb {
    id: Vec<u8>,
    person_id: Vec<u8>,
    role_id: Vec<u8>,
    start_time: String,
    end_time: String,
    specific_date: Option<String>,
    is_recurring: bool,
    day_of_week: Option<i64>,
    start_date: Option<String>,
    end_date: Option<String>,
}
impl TryFrom<&AvailabilityRuleDb> for AvailabilityRuleEntity {
    type Error = DaoError;
    fn try_from(row: &AvailabilityRuleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id).map_db_error()?,
            person_id: Uuid::from_slice(&row.person_id).map_db_error()?,
            role_id: Uuid::from_slice(&row.role_id).map_db_error()?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
            specific_date: row.specific_date.as_deref().map(parse_date).transpose()?,
            is_recurring: row.is_recurring,
            day_of_week: row.day_of_week.map(|value| value as u8),
            start_date: row.start_date.as_deref().map(parse_date).transpose()?,
            end_date: row.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(FromRow)]
struct BusinessRuleDb {
    id: Vec<u8>,
    role_id: Vec<u8>,
    start_time: String,
    end_time: String,
    specific_date: Option<String>,
    is_recurring: bool,
    day_of_week: Option<i64>,
    start_date: Option<String>,
    end_date: Option<String>,
}
impl TryFrom<&BusinessRuleDb> for BusinessRuleEntity {
    type Error = DaoError;
    fn try_from(row: &BusinessRuleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id).map_db_error()?,
            role_id: Uuid::from_slice(&row.role_id).map_db_error()?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
            specific_date: row.specific_date.as_deref().map(parse_date).transpose()?,
            is_recurring: row.is_recurring,
            day_of_week: row.day_of_week.map(|value| value as u8),
            start_date: row.start_date.as_deref().map(parse_date).transpose()?,
            end_date: row.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[async_trait]
impl AvailabilityRuleDao for AvailabilityRuleDaoImpl {
    type Transaction = TransactionImpl;

    async fn by_role(
        &self,
        role_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityRuleEntity]>, DaoError> {
        let role_id_vec = role_id.as_bytes().to_vec();
        sqlx::query_as::<_, AvailabilityRuleDb>(
            "SELECT id, person_id, role_id, start_time, end_time, specific_date, is_recurring, day_of_week, start_date, end_date \
             FROM availability_rules WHERE role_id = ?",
        )
        .bind(role_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AvailabilityRuleEntity::try_from)
        .collect()
    }
}

#[async_trait]
impl BusinessRuleDao for BusinessRuleDaoImpl {
    type Transaction = TransactionImpl;

    async fn by_role(
        &self,
        role_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BusinessRuleEntity]>, DaoError> {
        let role_id_vec = role_id.as_bytes().to_vec();
        sqlx::query_as::<_, BusinessRuleDb>(
            "SELECT id, role_id, start_time, end_time, specific_date, is_recurring, day_of_week, start_date, end_date \
             FROM business_rules WHERE role_id = ?",
        )
        .bind(role_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(BusinessRuleEntity::try_from)
        .collect()
    }
}
