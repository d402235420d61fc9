use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::{DaoError, MockTransaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgendaStatus {
    Draft,
}

impl AgendaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgendaStatus::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(AgendaStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgendaEntity {
    pub id: Uuid,
    pub role_id: Uuid,
    pub status: AgendaStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgendaEntryEntity {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgendaCoverageEntity {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub role_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub is_covered: bool,
    pub required_person_count: u32,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait AgendaDao {
    type Transaction: crate::Transaction;

    async fn create(
        &self,
        agenda: &AgendaEntity,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn create_entry(
        &self,
        entry: &AgendaEntryEntity,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn create_coverage(
        &self,
        coverage: &AgendaCoverageEntity,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn get_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AgendaEntity>, DaoError>;
    async fn by_role(
        &self,
        role_id: Uuid,
        status: Option<AgendaStatus>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaEntity]>, DaoError>;
    async fn entries_by_agenda(
        &self,
        agenda_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaEntryEntity]>, DaoError>;
    async fn coverage_by_agenda(
        &self,
        agenda_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaCoverageEntity]>, DaoError>;
}
