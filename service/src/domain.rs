use std::sync::Arc;

use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// A required coverage window or an availability window, already resolved
/// to a concrete calendar date. Produced by expanding an [`HourRule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatedSlot {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

impl DatedSlot {
    pub fn new(date: Date, start_time: Time, end_time: Time) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }

    /// Whether `self` and `other` fall on the same date and their
    /// half-open `[start, end)` intervals intersect.
    pub fn overlaps(&self, other: &DatedSlot) -> bool {
        self.date == other.date
            && !(self.end_time <= other.start_time || other.end_time <= self.start_time)
    }

    /// Whether `self` fully contains `required`: same semantics as
    /// `start_time <= required.start_time && required.end_time <= end_time`,
    /// with the date left for the caller to check (availability is matched
    /// per-date already).
    pub fn contains(&self, required_start: Time, required_end: Time) -> bool {
        self.start_time <= required_start && required_end <= self.end_time
    }

    pub fn duration_hours(&self) -> i64 {
        (self.end_time - self.start_time).whole_hours()
    }
}

/// The three modes an [`HourRule`] can be expanded by, in precedence order:
/// a specific date dominates; then recurring-by-weekday; then a dated range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleMode {
    SpecificDate(Date),
    RecurringWeekday {
        day_of_week: roster_utils::DayOfWeek,
        start_date: Option<Date>,
        end_date: Option<Date>,
    },
    DatedRange {
        start_date: Date,
        end_date: Date,
    },
    /// None of the three modes' required fields are set; the rule yields no
    /// instances.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HourRule {
    pub id: Uuid,
    pub start_time: Time,
    pub end_time: Time,
    pub mode: RuleMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityRule {
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub rule: HourRule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessRule {
    pub role_id: Uuid,
    pub rule: HourRule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
}

/// One (person, required-slot) assignment produced by the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub slot: DatedSlot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgendaStatus {
    Draft,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agenda {
    pub id: Uuid,
    pub role_id: Uuid,
    pub status: AgendaStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgendaEntry {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub slot: DatedSlot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgendaCoverage {
    pub id: Uuid,
    pub agenda_id: Uuid,
    pub role_id: Uuid,
    pub slot: DatedSlot,
    pub is_covered: bool,
    pub required_person_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedAgenda {
    pub agenda: Agenda,
    pub entries: Arc<[AgendaEntry]>,
    pub coverage: Arc<[AgendaCoverage]>,
}

/// One of the three named objective functions, or an unrecognized strategy
/// string, which is solved with an empty objective (any feasible
/// assignment). The REST layer rejects unrecognized strings with 400 before
/// ever constructing this type from user input; this fallback exists so the
/// core stays usable from callers that don't go through that gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizationStrategy {
    MaximizeCoverage,
    MinimizeGaps,
    BalanceWorkload,
    Unrecognized,
}

/// Classifies a rule's flattened storage fields into a tagged [`RuleMode`],
/// in precedence order: a specific date wins over recurring-weekday, which
/// wins over a dated range.
fn classify_mode(
    specific_date: Option<Date>,
    is_recurring: bool,
    day_of_week: Option<u8>,
    start_date: Option<Date>,
    end_date: Option<Date>,
) -> RuleMode {
    if let Some(date) = specific_date {
        return RuleMode::SpecificDate(date);
    }
    if is_recurring {
        if let Some(day_of_week) = day_of_week.and_then(roster_utils::DayOfWeek::from_number) {
            return RuleMode::RecurringWeekday {
                day_of_week,
                start_date,
                end_date,
            };
        }
    }
    if let (Some(start_date), Some(end_date)) = (start_date, end_date) {
        return RuleMode::DatedRange {
            start_date,
            end_date,
        };
    }
    RuleMode::None
}

impl From<&dao::hour_rule::AvailabilityRuleEntity> for AvailabilityRule {
    fn from(entity: &dao::hour_rule::AvailabilityRuleEntity) -> Self {
        Self {
            person_id: entity.person_id,
            role_id: entity.role_id,
            rule: HourRule {
                id: entity.id,
                start_time: entity.start_time,
                end_time: entity.end_time,
                mode: classify_mode(
                    entity.specific_date,
                    entity.is_recurring,
                    entity.day_of_week,
                    entity.start_date,
                    entity.end_date,
                ),
            },
        }
    }
}

impl From<&dao::hour_rule::BusinessRuleEntity> for BusinessRule {
    fn from(entity: &dao::hour_rule::BusinessRuleEntity) -> Self {
        Self {
            role_id: entity.role_id,
            rule: HourRule {
                id: entity.id,
                start_time: entity.start_time,
                end_time: entity.end_time,
                mode: classify_mode(
                    entity.specific_date,
                    entity.is_recurring,
                    entity.day_of_week,
                    entity.start_date,
                    entity.end_date,
                ),
            },
        }
    }
}

impl From<&dao::role::RoleEntity> for Role {
    fn from(entity: &dao::role::RoleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }
}
roster_utils::derive_from_reference!(dao::role::RoleEntity, Role);

impl From<&dao::agenda::AgendaEntity> for Agenda {
    fn from(entity: &dao::agenda::AgendaEntity) -> Self {
        Self {
            id: entity.id,
            role_id: entity.role_id,
            status: match entity.status {
                dao::agenda::AgendaStatus::Draft => AgendaStatus::Draft,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&dao::agenda::AgendaEntryEntity> for AgendaEntry {
    fn from(entity: &dao::agenda::AgendaEntryEntity) -> Self {
        Self {
            id: entity.id,
            agenda_id: entity.agenda_id,
            person_id: entity.person_id,
            role_id: entity.role_id,
            slot: DatedSlot::new(entity.date, entity.start_time, entity.end_time),
        }
    }
}

impl From<&dao::agenda::AgendaCoverageEntity> for AgendaCoverage {
    fn from(entity: &dao::agenda::AgendaCoverageEntity) -> Self {
        Self {
            id: entity.id,
            agenda_id: entity.agenda_id,
            role_id: entity.role_id,
            slot: DatedSlot::new(entity.date, entity.start_time, entity.end_time),
            is_covered: entity.is_covered,
            required_person_count: entity.required_person_count,
        }
    }
}

impl OptimizationStrategy {
    pub const MAXIMIZE_COVERAGE: &'static str = "maximize_coverage";
    pub const MINIMIZE_GAPS: &'static str = "minimize_gaps";
    pub const BALANCE_WORKLOAD: &'static str = "balance_workload";

    pub fn parse(value: &str) -> Self {
        match value {
            Self::MAXIMIZE_COVERAGE => Self::MaximizeCoverage,
            Self::MINIMIZE_GAPS => Self::MinimizeGaps,
            Self::BALANCE_WORKLOAD => Self::BalanceWorkload,
            _ => Self::Unrecognized,
        }
    }

    pub fn is_recognized(value: &str) -> bool {
        !matches!(Self::parse(value), Self::Unrecognized)
    }
}
