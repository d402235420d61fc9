use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, Time};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "service-impl")]
use service::{Agenda, AgendaCoverage, AgendaEntry, AgendaStatus, GeneratedAgenda};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateAgendaRequestTO {
    pub role_id: Uuid,
    pub weeks: Vec<u32>,
    pub year: i32,
    pub optimization_strategy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgendaStatusTO {
    Draft,
}
#[cfg(feature = "service-impl")]
impl From<AgendaStatus> for AgendaStatusTO {
    fn from(status: AgendaStatus) -> Self {
        match status {
            AgendaStatus::Draft => Self::Draft,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AgendaEntryTO {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub date: Date,
    #[schema(value_type = String)]
    pub start_time: Time,
    #[schema(value_type = String)]
    pub end_time: Time,
}
#[cfg(feature = "service-impl")]
impl From<&AgendaEntry> for AgendaEntryTO {
    fn from(entry: &AgendaEntry) -> Self {
        Self {
            id: entry.id,
            agenda_id: entry.agenda_id,
            person_id: entry.person_id,
            role_id: entry.role_id,
            date: entry.slot.date,
            start_time: entry.slot.start_time,
            end_time: entry.slot.end_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AgendaCoverageTO {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub role_id: Uuid,
    pub date: Date,
    #[schema(value_type = String)]
    pub start_time: Time,
    #[schema(value_type = String)]
    pub end_time: Time,
    pub is_covered: bool,
    pub required_person_count: u32,
}
#[cfg(feature = "service-impl")]
impl From<&AgendaCoverage> for AgendaCoverageTO {
    fn from(coverage: &AgendaCoverage) -> Self {
        Self {
            id: coverage.id,
            agenda_id: coverage.agenda_id,
            role_id: coverage.role_id,
            date: coverage.slot.date,
            start_time: coverage.slot.start_time,
            end_time: coverage.slot.end_time,
            is_covered: coverage.is_covered,
            required_person_count: coverage.required_person_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgendaTO {
    pub id: Uuid,
    pub role_id: Uuid,
    pub status: AgendaStatusTO,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}
#[cfg(feature = "service-impl")]
impl From<&Agenda> for AgendaTO {
    fn from(agenda: &Agenda) -> Self {
        Self {
            id: agenda.id,
            role_id: agenda.role_id,
            status: agenda.status.into(),
            created_at: agenda.created_at,
            updated_at: agenda.updated_at,
        }
    }
}

/// Flattened `{id, role_id, status, created_at, updated_at, entries, coverage}`
/// body returned by generation and by agenda lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedAgendaTO {
    pub id: Uuid,
    pub role_id: Uuid,
    pub status: AgendaStatusTO,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
    #[schema(value_type = Vec<AgendaEntryTO>)]
    pub entries: Arc<[AgendaEntryTO]>,
    #[schema(value_type = Vec<AgendaCoverageTO>)]
    pub coverage: Arc<[AgendaCoverageTO]>,
}
#[cfg(feature = "service-impl")]
impl From<&GeneratedAgenda> for GeneratedAgendaTO {
    fn from(generated: &GeneratedAgenda) -> Self {
        Self {
            id: generated.agenda.id,
            role_id: generated.agenda.role_id,
            status: generated.agenda.status.into(),
            created_at: generated.agenda.created_at,
            updated_at: generated.agenda.updated_at,
            entries: generated.entries.iter().map(AgendaEntryTO::from).collect(),
            coverage: generated
                .coverage
                .iter()
                .map(AgendaCoverageTO::from)
                .collect(),
        }
    }
}
