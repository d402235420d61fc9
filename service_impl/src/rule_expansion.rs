use service::{AvailabilityRule, BusinessRule, DatedSlot, RuleMode};
use time::Date;
use uuid::Uuid;

/// One concrete occurrence of an [`AvailabilityRule`] on a calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvailabilityInstance {
    pub person_id: Uuid,
    pub slot: DatedSlot,
}

fn expand_mode(mode: &RuleMode, date_window: &[Date]) -> Vec<Date> {
    match mode {
        RuleMode::SpecificDate(date) => {
            if date_window.contains(date) {
                vec![*date]
            } else {
                Vec::new()
            }
        }
        RuleMode::RecurringWeekday {
            day_of_week,
            start_date,
            end_date,
        } => date_window
            .iter()
            .copied()
            .filter(|date| {
                roster_utils::weekday(*date) == *day_of_week
                    && start_date.map_or(true, |start| start <= *date)
                    && end_date.map_or(true, |end| *date <= end)
            })
            .collect(),
        RuleMode::DatedRange { start_date, end_date } => date_window
            .iter()
            .copied()
            .filter(|date| *start_date <= *date && *date <= *end_date)
            .collect(),
        RuleMode::None => Vec::new(),
    }
}

/// Sorted, deduplicated union of every business rule's expansion over
/// `date_window`: the required coverage slots for a generation run.
pub fn required_slots(business_rules: &[BusinessRule], date_window: &[Date]) -> Vec<DatedSlot> {
    let mut slots: Vec<DatedSlot> = business_rules
        .iter()
        .flat_map(|business_rule| {
            expand_mode(&business_rule.rule.mode, date_window)
                .into_iter()
                .map(|date| {
                    DatedSlot::new(
                        date,
                        business_rule.rule.start_time,
                        business_rule.rule.end_time,
                    )
                })
        })
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

/// Multiset of concrete availability windows per person. Unlike
/// `required_slots`, this is not deduplicated across rules: two rules
/// covering the same window both contribute, which is harmless since
/// [`is_available`] only asks whether at least one contains a target slot.
pub fn availability_instances(
    availability_rules: &[AvailabilityRule],
    date_window: &[Date],
) -> Vec<AvailabilityInstance> {
    availability_rules
        .iter()
        .flat_map(|availability_rule| {
            let person_id = availability_rule.person_id;
            expand_mode(&availability_rule.rule.mode, date_window)
                .into_iter()
                .map(move |date| AvailabilityInstance {
                    person_id,
                    slot: DatedSlot::new(
                        date,
                        availability_rule.rule.start_time,
                        availability_rule.rule.end_time,
                    ),
                })
        })
        .collect()
}

/// Whether `person_id` has a declared availability window on `slot.date`
/// whose `[start, end)` range contains `slot`.
pub fn is_available(instances: &[AvailabilityInstance], person_id: Uuid, slot: DatedSlot) -> bool {
    instances.iter().any(|instance| {
        instance.person_id == person_id
            && instance.slot.date == slot.date
            && instance.slot.contains(slot.start_time, slot.end_time)
    })
}
