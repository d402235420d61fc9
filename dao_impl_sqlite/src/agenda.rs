use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    agenda::{
        AgendaCoverageEntity, AgendaDao, AgendaEntity, AgendaEntryEntity, AgendaStatus,
    },
    DaoError,
};
use sqlx::{FromRow, SqlitePool};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

use crate::{
    wire::{format_date, format_time, parse_date, parse_time},
    ResultDbErrorExt, TransactionImpl,
};

pub struct AgendaDaoImpl {
    pub pool: Arc<SqlitePool>,
}
impl AgendaDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AgendaDb {
    id: Vec<u8>,
    role_id: Vec<u8>,
    status: String,
    created_at: String,
    updated_at: String,
}
impl TryFrom<&AgendaDb> for AgendaEntity {
    type Error = DaoError;
    fn try_from(row: &AgendaDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id).map_db_error()?,
            role_id: Uuid::from_slice(&row.role_id).map_db_error()?,
            status: AgendaStatus::parse(&row.status).ok_or_else(|| {
                DaoError::DatabaseQueryError(
                    format!("unknown agenda status '{}'", row.status).into(),
                )
            })?,
            created_at: PrimitiveDateTime::parse(&row.created_at, &Iso8601::DATE_TIME)
                .map_db_error()?,
            updated_at: PrimitiveDateTime::parse(&row.updated_at, &Iso8601::DATE_TIME)
                .map_db_error()?,
        })
    }
}

#[derive(FromRow)]
struct AgendaEntryDb {
    id: Vec<u8>,
    agenda_id: Vec<u8>,
    person_id: Vec<u8>,
    role_id: Vec<u8>,
    date: String,
    start_time: String,
    end_time: String,
}
impl TryFrom<&AgendaEntryDb> for AgendaEntryEntity {
    type Error = DaoError;
    fn try_from(row: &AgendaEntryDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id).map_db_error()?,
            agenda_id: Uuid::from_slice(&row.agenda_id).map_db_error()?,
            person_id: Uuid::from_slice(&row.person_id).map_db_error()?,
            role_id: Uuid::from_slice(&row.role_id).map_db_error()?,
            date: parse_date(&row.date)?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
        })
    }
}

#[derive(FromRow)]
struct AgendaCoverageDb {
    id: Vec<u8>,
    agenda_id: Vec<u8>,
    role_id: Vec<u8>,
    date: String,
    start_time: String,
    end_time: String,
    is_covered: bool,
    required_person_count: i64,
}
impl TryFrom<&AgendaCoverageDb> for AgendaCoverageEntity {
    type Error = DaoError;
    fn try_from(row: &AgendaCoverageDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&row.id).map_db_error()?,
            agenda_id: Uuid::from_slice(&row.agenda_id).map_db_error()?,
            role_id: Uuid::from_slice(&row.role_id).map_db_error()?,
            date: parse_date(&row.date)?,
            start_time: parse_time(&row.start_time)?,
            end_time: parse_time(&row.end_time)?,
            is_covered: row.is_covered,
            required_person_count: row.required_person_count as u32,
        })
    }
}

fn format_primitive_date_time(value: PrimitiveDateTime) -> Result<String, DaoError> {
    value.format(&Iso8601::DATE_TIME).map_db_error()
}

#[async_trait]
impl AgendaDao for AgendaDaoImpl {
    type Transaction = TransactionImpl;

    async fn create(&self, agenda: &AgendaEntity, tx: Self::Transaction) -> Result<(), DaoError> {
        let id = agenda.id.as_bytes().to_vec();
        let role_id = agenda.role_id.as_bytes().to_vec();
        let status = agenda.status.as_str();
        let created_at = format_primitive_date_time(agenda.created_at)?;
        let updated_at = format_primitive_date_time(agenda.updated_at)?;
        sqlx::query(
            "INSERT INTO agendas (id, role_id, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(role_id)
        .bind(status)
        .bind(created_at)
        .bind(updated_at)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn create_entry(
        &self,
        entry: &AgendaEntryEntity,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id = entry.id.as_bytes().to_vec();
        let agenda_id = entry.agenda_id.as_bytes().to_vec();
        let person_id = entry.person_id.as_bytes().to_vec();
        let role_id = entry.role_id.as_bytes().to_vec();
        let date = format_date(entry.date);
        let start_time = format_time(entry.start_time);
        let end_time = format_time(entry.end_time);
        sqlx::query(
            "INSERT INTO agenda_entries (id, agenda_id, person_id, role_id, date, start_time, end_time) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(agenda_id)
        .bind(person_id)
        .bind(role_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn create_coverage(
        &self,
        coverage: &AgendaCoverageEntity,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id = coverage.id.as_bytes().to_vec();
        let agenda_id = coverage.agenda_id.as_bytes().to_vec();
        let role_id = coverage.role_id.as_bytes().to_vec();
        let date = format_date(coverage.date);
        let start_time = format_time(coverage.start_time);
        let end_time = format_time(coverage.end_time);
        let required_person_count = coverage.required_person_count as i64;
        sqlx::query(
            "INSERT INTO agenda_coverage (id, agenda_id, role_id, date, start_time, end_time, is_covered, required_person_count) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(agenda_id)
        .bind(role_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(coverage.is_covered)
        .bind(required_person_count)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AgendaEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        sqlx::query_as::<_, AgendaDb>(
            "SELECT id, role_id, status, created_at, updated_at FROM agendas WHERE id = ?",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AgendaEntity::try_from)
        .transpose()
    }

    async fn by_role(
        &self,
        role_id: Uuid,
        status: Option<AgendaStatus>,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaEntity]>, DaoError> {
        let role_id_vec = role_id.as_bytes().to_vec();
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, AgendaDb>(
                    "SELECT id, role_id, status, created_at, updated_at FROM agendas WHERE role_id = ? AND status = ?",
                )
                .bind(role_id_vec)
                .bind(status.as_str())
                .fetch_all(tx.tx.lock().await.as_mut())
                .await
            }
            None => {
                sqlx::query_as::<_, AgendaDb>(
                    "SELECT id, role_id, status, created_at, updated_at FROM agendas WHERE role_id = ?",
                )
                .bind(role_id_vec)
                .fetch_all(tx.tx.lock().await.as_mut())
                .await
            }
        };
        rows.map_db_error()?
            .iter()
            .map(AgendaEntity::try_from)
            .collect()
    }

    async fn entries_by_agenda(
        &self,
        agenda_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaEntryEntity]>, DaoError> {
        let agenda_id_vec = agenda_id.as_bytes().to_vec();
        sqlx::query_as::<_, AgendaEntryDb>(
            "SELECT id, agenda_id, person_id, role_id, date, start_time, end_time FROM agenda_entries WHERE agenda_id = ?",
        )
        .bind(agenda_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AgendaEntryEntity::try_from)
        .collect()
    }

    async fn coverage_by_agenda(
        &self,
        agenda_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AgendaCoverageEntity]>, DaoError> {
        let agenda_id_vec = agenda_id.as_bytes().to_vec();
        sqlx::query_as::<_, AgendaCoverageDb>(
            "SELECT id, agenda_id, role_id, date, start_time, end_time, is_covered, required_person_count \
             FROM agenda_coverage WHERE agenda_id = ?",
        )
        .bind(agenda_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AgendaCoverageEntity::try_from)
        .collect()
    }
}
