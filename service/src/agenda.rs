use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{GeneratedAgenda, ServiceError};

#[automock]
#[async_trait]
pub trait AgendaGeneratorService {
    /// Builds a draft agenda for `role_id` covering the given `weeks` of
    /// `year`, using `strategy` (one of `OptimizationStrategy`'s three
    /// names; anything else is solved with an empty objective).
    ///
    /// Fails with [`ServiceError::NotFound`] if the role does not exist, and
    /// with [`ServiceError::NoData`] if the role has no business hour rules
    /// to expand into required coverage.
    async fn generate_draft_agenda(
        &self,
        role_id: Uuid,
        weeks: &[u32],
        year: i32,
        strategy: &str,
    ) -> Result<GeneratedAgenda, ServiceError>;

    async fn get_agenda(&self, agenda_id: Uuid) -> Result<GeneratedAgenda, ServiceError>;

    async fn list_agendas_by_role<'a>(
        &'a self,
        role_id: Uuid,
        status: Option<&'a str>,
    ) -> Result<std::sync::Arc<[crate::Agenda]>, ServiceError>;
}
