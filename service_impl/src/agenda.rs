use std::sync::Arc;

use async_trait::async_trait;
use service::{
    agenda::AgendaGeneratorService, Agenda, AgendaCoverage, AgendaEntry, AvailabilityRule,
    BusinessRule, GeneratedAgenda, OptimizationStrategy, ServiceError,
};
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

use crate::{rule_expansion, solver};

pub struct AgendaGeneratorServiceImpl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TxDao>
where
    RoleDao: dao::role::RoleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AvailabilityRuleDao: dao::hour_rule::AvailabilityRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    BusinessRuleDao: dao::hour_rule::BusinessRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AgendaDao: dao::agenda::AgendaDao<Transaction = TxDao::Transaction> + Send + Sync,
    TxDao: dao::TransactionDao + Send + Sync,
{
    pub role_dao: Arc<RoleDao>,
    pub availability_rule_dao: Arc<AvailabilityRuleDao>,
    pub business_rule_dao: Arc<BusinessRuleDao>,
    pub agenda_dao: Arc<AgendaDao>,
    pub transaction_dao: Arc<TxDao>,
    pub solver_time_budget: std::time::Duration,
}

impl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TxDao>
    AgendaGeneratorServiceImpl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TxDao>
where
    RoleDao: dao::role::RoleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AvailabilityRuleDao: dao::hour_rule::AvailabilityRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    BusinessRuleDao: dao::hour_rule::BusinessRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AgendaDao: dao::agenda::AgendaDao<Transaction = TxDao::Transaction> + Send + Sync,
    TxDao: dao::TransactionDao + Send + Sync,
{
    pub fn new(
        role_dao: Arc<RoleDao>,
        availability_rule_dao: Arc<AvailabilityRuleDao>,
        business_rule_dao: Arc<BusinessRuleDao>,
        agenda_dao: Arc<AgendaDao>,
        transaction_dao: Arc<TxDao>,
        solver_time_budget: std::time::Duration,
    ) -> Self {
        Self {
            role_dao,
            availability_rule_dao,
            business_rule_dao,
            agenda_dao,
            transaction_dao,
            solver_time_budget,
        }
    }
}

fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

#[async_trait]
impl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TxDao> AgendaGeneratorService
    for AgendaGeneratorServiceImpl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TxDao>
where
    RoleDao: dao::role::RoleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AvailabilityRuleDao: dao::hour_rule::AvailabilityRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    BusinessRuleDao: dao::hour_rule::BusinessRuleDao<Transaction = TxDao::Transaction> + Send + Sync,
    AgendaDao: dao::agenda::AgendaDao<Transaction = TxDao::Transaction> + Send + Sync,
    TxDao: dao::TransactionDao + Send + Sync,
{
    #[tracing::instrument(skip(self))]
    async fn generate_draft_agenda(
        &self,
        role_id: Uuid,
        weeks: &[u32],
        year: i32,
        strategy: &str,
    ) -> Result<GeneratedAgenda, ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;

        self.role_dao
            .find_by_id(role_id, tx.clone())
            .await?
            .ok_or(ServiceError::NotFound)?;

        let availability_rules: Vec<AvailabilityRule> = self
            .availability_rule_dao
            .by_role(role_id, tx.clone())
            .await?
            .iter()
            .map(AvailabilityRule::from)
            .collect();
        let business_rules: Vec<BusinessRule> = self
            .business_rule_dao
            .by_role(role_id, tx.clone())
            .await?
            .iter()
            .map(BusinessRule::from)
            .collect();

        let date_window = roster_utils::dates_for_weeks(weeks, year);
        let required_slots = rule_expansion::required_slots(&business_rules, &date_window);
        let availability_instances =
            rule_expansion::availability_instances(&availability_rules, &date_window);

        if required_slots.is_empty() || availability_instances.is_empty() {
            return Err(ServiceError::NoData(format!(
                "role {role_id} has no business hours and availability overlapping the requested weeks"
            )));
        }

        let mut persons: Vec<Uuid> = availability_rules.iter().map(|rule| rule.person_id).collect();
        persons.sort();
        persons.dedup();

        let assignments = solver::solve(&solver::SolveInput {
            persons: &persons,
            required_slots: &required_slots,
            role_id,
            availability: &availability_instances,
            strategy: OptimizationStrategy::parse(strategy),
            time_budget: self.solver_time_budget,
        });

        let created_at = now();
        let agenda_id = Uuid::new_v4();
        let agenda_entity = dao::agenda::AgendaEntity {
            id: agenda_id,
            role_id,
            status: dao::agenda::AgendaStatus::Draft,
            created_at,
            updated_at: created_at,
        };
        self.agenda_dao.create(&agenda_entity, tx.clone()).await?;

        let mut entries = Vec::with_capacity(assignments.len());
        for assignment in &assignments {
            let entry_entity = dao::agenda::AgendaEntryEntity {
                id: Uuid::new_v4(),
                agenda_id,
                person_id: assignment.person_id,
                role_id: assignment.role_id,
                date: assignment.slot.date,
                start_time: assignment.slot.start_time,
                end_time: assignment.slot.end_time,
            };
            self.agenda_dao.create_entry(&entry_entity, tx.clone()).await?;
            entries.push(AgendaEntry::from(&entry_entity));
        }

        let mut coverage = Vec::with_capacity(required_slots.len());
        for slot in &required_slots {
            let is_covered = assignments.iter().any(|assignment| assignment.slot == *slot);
            // `agenda_id` here is always the id created above, regardless of
            // which rule mode produced this slot.
            let coverage_entity = dao::agenda::AgendaCoverageEntity {
                id: Uuid::new_v4(),
                agenda_id,
                role_id,
                date: slot.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                is_covered,
                required_person_count: 1,
            };
            self.agenda_dao
                .create_coverage(&coverage_entity, tx.clone())
                .await?;
            coverage.push(AgendaCoverage::from(&coverage_entity));
        }

        self.transaction_dao.commit(tx).await?;

        Ok(GeneratedAgenda {
            agenda: Agenda::from(&agenda_entity),
            entries: entries.into(),
            coverage: coverage.into(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_agenda(&self, agenda_id: Uuid) -> Result<GeneratedAgenda, ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;
        let agenda_entity = self
            .agenda_dao
            .get_by_id(agenda_id, tx.clone())
            .await?
            .ok_or(ServiceError::NotFound)?;
        let entries = self.agenda_dao.entries_by_agenda(agenda_id, tx.clone()).await?;
        let coverage = self.agenda_dao.coverage_by_agenda(agenda_id, tx).await?;
        Ok(GeneratedAgenda {
            agenda: Agenda::from(&agenda_entity),
            entries: entries.iter().map(AgendaEntry::from).collect(),
            coverage: coverage.iter().map(AgendaCoverage::from).collect(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn list_agendas_by_role<'a>(
        &'a self,
        role_id: Uuid,
        status: Option<&'a str>,
    ) -> Result<Arc<[Agenda]>, ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;
        let status = status
            .map(|status| {
                dao::agenda::AgendaStatus::parse(status)
                    .ok_or_else(|| ServiceError::InvalidRequest(format!("unknown agenda status '{status}'")))
            })
            .transpose()?;
        let entities = self.agenda_dao.by_role(role_id, status, tx).await?;
        Ok(entities.iter().map(Agenda::from).collect())
    }
}
