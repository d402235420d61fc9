use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{Date, Time};
use uuid::Uuid;

use crate::{DaoError, MockTransaction};

/// Flattened, denormalized storage shape for an hour rule: `specific_date`,
/// `is_recurring` + `day_of_week`, and `start_date`/`end_date` all live on
/// the same row, exactly as the upstream relational schema stores them.
/// `service_impl` classifies this into a tagged `RuleMode` immediately after
/// loading it; nothing downstream re-inspects these raw optional fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityRuleEntity {
    pub id: Uuid,
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub start_time: Time,
    pub end_time: Time,
    pub specific_date: Option<Date>,
    pub is_recurring: bool,
    pub day_of_week: Option<u8>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessRuleEntity {
    pub id: Uuid,
    pub role_id: Uuid,
    pub start_time: Time,
    pub end_time: Time,
    pub specific_date: Option<Date>,
    pub is_recurring: bool,
    pub day_of_week: Option<u8>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait AvailabilityRuleDao {
    type Transaction: crate::Transaction;

    async fn by_role(
        &self,
        role_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[AvailabilityRuleEntity]>, DaoError>;
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait BusinessRuleDao {
    type Transaction: crate::Transaction;

    async fn by_role(
        &self,
        role_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BusinessRuleEntity]>, DaoError>;
}
