use std::{sync::Arc, time::Duration};

use dao::{
    agenda::MockAgendaDao,
    hour_rule::{AvailabilityRuleEntity, BusinessRuleEntity, MockAvailabilityRuleDao, MockBusinessRuleDao},
    role::{MockRoleDao, RoleEntity},
    MockTransaction, MockTransactionDao,
};
use service::{agenda::AgendaGeneratorService, ServiceError};
use time::{Date, Month, Time};
use uuid::Uuid;

use crate::agenda::AgendaGeneratorServiceImpl;

type TestService = AgendaGeneratorServiceImpl<
    MockRoleDao,
    MockAvailabilityRuleDao,
    MockBusinessRuleDao,
    MockAgendaDao,
    MockTransactionDao,
>;

fn date(day: u8) -> Date {
    Date::from_calendar_date(2024, Month::January, day).unwrap()
}

fn time(hour: u8) -> Time {
    Time::from_hms(hour, 0, 0).unwrap()
}

fn availability_rule(
    person_id: Uuid,
    role_id: Uuid,
    day_of_week: Option<u8>,
    specific_date: Option<Date>,
    start_time: Time,
    end_time: Time,
) -> AvailabilityRuleEntity {
    AvailabilityRuleEntity {
        id: Uuid::new_v4(),
        person_id,
        role_id,
        start_time,
        end_time,
        specific_date,
        is_recurring: day_of_week.is_some(),
        day_of_week,
        start_date: None,
        end_date: None,
    }
}

fn business_rule(
    role_id: Uuid,
    day_of_week: Option<u8>,
    specific_date: Option<Date>,
    start_time: Time,
    end_time: Time,
) -> BusinessRuleEntity {
    BusinessRuleEntity {
        id: Uuid::new_v4(),
        role_id,
        start_time,
        end_time,
        specific_date,
        is_recurring: day_of_week.is_some(),
        day_of_week,
        start_date: None,
        end_date: None,
    }
}

fn build_service(
    role_id: Uuid,
    availability: Vec<AvailabilityRuleEntity>,
    business: Vec<BusinessRuleEntity>,
) -> TestService {
    let mut role_dao = MockRoleDao::new();
    role_dao.expect_find_by_id().returning(move |id, _| {
        Ok(Some(RoleEntity {
            id,
            name: "Nurse".into(),
            description: None,
        }))
    });

    let mut availability_dao = MockAvailabilityRuleDao::new();
    availability_dao
        .expect_by_role()
        .returning(move |_, _| Ok(availability.clone().into()));

    let mut business_dao = MockBusinessRuleDao::new();
    business_dao
        .expect_by_role()
        .returning(move |_, _| Ok(business.clone().into()));

    let mut agenda_dao = MockAgendaDao::new();
    agenda_dao.expect_create().returning(|_, _| Ok(()));
    agenda_dao.expect_create_entry().returning(|_, _| Ok(()));
    agenda_dao.expect_create_coverage().returning(|_, _| Ok(()));

    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_new_transaction()
        .returning(|| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    let _ = role_id;
    AgendaGeneratorServiceImpl::new(
        Arc::new(role_dao),
        Arc::new(availability_dao),
        Arc::new(business_dao),
        Arc::new(agenda_dao),
        Arc::new(transaction_dao),
        Duration::from_secs(1),
    )
}

/// S1: one person available Monday 09-17 (recurring), business requires
/// the same window. Expect a single covered entry.
#[tokio::test]
async fn generates_single_entry_when_one_person_matches_required_slot() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(0), None, time(9), time(17))],
        vec![business_rule(role_id, Some(0), None, time(9), time(17))],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert_eq!(agenda.entries.len(), 1);
    assert_eq!(agenda.entries[0].person_id, person_id);
    assert_eq!(agenda.entries[0].slot.date, date(1));
    assert_eq!(agenda.coverage.len(), 1);
    assert!(agenda.coverage[0].is_covered);
}

/// S2: the only person is available on Tuesday, business requires Monday.
/// Expect zero entries and an uncovered coverage row.
#[tokio::test]
async fn leaves_slot_uncovered_when_availability_is_on_a_different_weekday() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(1), None, time(9), time(17))],
        vec![business_rule(role_id, Some(0), None, time(9), time(17))],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert!(agenda.entries.is_empty());
    assert_eq!(agenda.coverage.len(), 1);
    assert!(!agenda.coverage[0].is_covered);
}

/// S3: two persons both match the one required slot; exactly one is
/// assigned.
#[tokio::test]
async fn assigns_exactly_one_person_when_two_are_eligible() {
    let role_id = Uuid::new_v4();
    let person_a = Uuid::new_v4();
    let person_b = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![
            availability_rule(person_a, role_id, Some(0), None, time(9), time(17)),
            availability_rule(person_b, role_id, Some(0), None, time(9), time(17)),
        ],
        vec![business_rule(role_id, Some(0), None, time(9), time(17))],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert_eq!(agenda.entries.len(), 1);
    assert!(agenda.entries[0].person_id == person_a || agenda.entries[0].person_id == person_b);
}

/// S4: one person available for two adjacent Monday slots; minimizing
/// gaps should assign both to that person.
#[tokio::test]
async fn minimize_gaps_fills_both_slots_for_the_only_eligible_person() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![
            availability_rule(person_id, role_id, Some(0), None, time(9), time(12)),
            availability_rule(person_id, role_id, Some(0), None, time(13), time(17)),
        ],
        vec![
            business_rule(role_id, Some(0), None, time(9), time(12)),
            business_rule(role_id, Some(0), None, time(13), time(17)),
        ],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "minimize_gaps")
        .await
        .unwrap();

    assert_eq!(agenda.entries.len(), 2);
    assert!(agenda.entries.iter().all(|entry| entry.person_id == person_id));
}

/// S5: three persons each available Mon/Tue/Wed; balancing workload spreads
/// the three required slots one-per-person.
#[tokio::test]
async fn balance_workload_assigns_each_person_a_distinct_day() {
    let role_id = Uuid::new_v4();
    let persons: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let availability: Vec<AvailabilityRuleEntity> = persons
        .iter()
        .flat_map(|&person_id| {
            (0..3).map(move |day_of_week| {
                availability_rule(person_id, role_id, Some(day_of_week), None, time(9), time(17))
            })
        })
        .collect();
    let business: Vec<BusinessRuleEntity> = (0..3)
        .map(|day_of_week| business_rule(role_id, Some(day_of_week), None, time(9), time(17)))
        .collect();

    let service = build_service(role_id, availability, business);

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "balance_workload")
        .await
        .unwrap();

    assert_eq!(agenda.entries.len(), 3);
    let mut assigned: Vec<Uuid> = agenda.entries.iter().map(|entry| entry.person_id).collect();
    assigned.sort();
    assigned.dedup();
    assert_eq!(assigned.len(), 3);
}

/// S6: a specific-date business rule with no overlapping availability
/// instance (but an availability rule for the role exists on another day)
/// still produces a 201-equivalent result with one uncovered row.
#[tokio::test]
async fn specific_date_business_rule_without_matching_availability_is_uncovered() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(1), None, time(9), time(17))],
        vec![business_rule(role_id, None, Some(date(1)), time(9), time(17))],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert!(agenda.entries.is_empty());
    assert_eq!(agenda.coverage.len(), 1);
    assert!(!agenda.coverage[0].is_covered);
}

/// S7: two overlapping required slots, one eligible person: at most one
/// of the two is assigned to them.
#[tokio::test]
async fn overlapping_required_slots_assign_at_most_one_to_the_same_person() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(0), None, time(9), time(17))],
        vec![
            business_rule(role_id, Some(0), None, time(9), time(12)),
            business_rule(role_id, Some(0), None, time(10), time(13)),
        ],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert_eq!(agenda.entries.len(), 1);
}

/// S8: two required slots, but only one has an eligible person. The
/// coverage constraint is hard for every slot, so the whole solve is
/// infeasible: zero entries and both coverage rows uncovered, not just the
/// unreachable one.
#[tokio::test]
async fn one_uncoverable_required_slot_leaves_every_slot_uncovered() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(0), None, time(9), time(17))],
        vec![
            business_rule(role_id, Some(0), None, time(9), time(17)),
            business_rule(role_id, Some(1), None, time(9), time(17)),
        ],
    );

    let agenda = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await
        .unwrap();

    assert!(agenda.entries.is_empty());
    assert_eq!(agenda.coverage.len(), 2);
    assert!(agenda.coverage.iter().all(|coverage| !coverage.is_covered));
}

#[tokio::test]
async fn unknown_role_is_not_found() {
    let role_id = Uuid::new_v4();
    let mut role_dao = MockRoleDao::new();
    role_dao.expect_find_by_id().returning(|_, _| Ok(None));
    let availability_dao = MockAvailabilityRuleDao::new();
    let business_dao = MockBusinessRuleDao::new();
    let agenda_dao = MockAgendaDao::new();
    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_new_transaction()
        .returning(|| Ok(MockTransaction));

    let service: TestService = AgendaGeneratorServiceImpl::new(
        Arc::new(role_dao),
        Arc::new(availability_dao),
        Arc::new(business_dao),
        Arc::new(agenda_dao),
        Arc::new(transaction_dao),
        Duration::from_secs(1),
    );

    let result = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[tokio::test]
async fn role_with_no_business_rules_is_no_data() {
    let role_id = Uuid::new_v4();
    let person_id = Uuid::new_v4();
    let service = build_service(
        role_id,
        vec![availability_rule(person_id, role_id, Some(0), None, time(9), time(17))],
        vec![],
    );

    let result = service
        .generate_draft_agenda(role_id, &[1], 2024, "maximize_coverage")
        .await;
    assert!(matches!(result, Err(ServiceError::NoData(_))));
}
