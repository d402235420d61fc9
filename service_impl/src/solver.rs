use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use service::{Assignment, DatedSlot, OptimizationStrategy};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::rule_expansion::{is_available, AvailabilityInstance};

pub struct SolveInput<'a> {
    pub persons: &'a [Uuid],
    pub required_slots: &'a [DatedSlot],
    pub role_id: Uuid,
    pub availability: &'a [AvailabilityInstance],
    pub strategy: OptimizationStrategy,
    pub time_budget: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
    covered: usize,
    objective: i64,
}

/// Branch-and-bound search over which eligible person fills each required
/// slot, in slot order. The coverage requirement is treated as hard, exactly
/// like the unconditional `sum(person_assignments) >= 1` constraint added for
/// every slot in a single monolithic model: if any required slot has no
/// eligible candidate, that constraint is unsatisfiable and the whole solve
/// is infeasible, so this returns an empty assignment list rather than
/// covering only the coverable slots. When every slot has at least one
/// candidate, the strategy's objective breaks ties among equally-covered
/// assignments. Anytime: on `time_budget` exhaustion the best assignment
/// found so far is returned.
pub fn solve(input: &SolveInput) -> Vec<Assignment> {
    let slot_count = input.required_slots.len();
    if slot_count == 0 || input.persons.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<Vec<Uuid>> = input
        .required_slots
        .iter()
        .map(|&slot| {
            input
                .persons
                .iter()
                .copied()
                .filter(|&person_id| is_available(input.availability, person_id, slot))
                .collect()
        })
        .collect();

    if candidates.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut search = Search {
        input,
        candidates,
        deadline: Instant::now() + input.time_budget,
        best: vec![None; slot_count],
        best_score: Score {
            covered: 0,
            objective: i64::MIN,
        },
    };

    let mut current = vec![None; slot_count];
    search.recurse(0, &mut current, 0);

    search
        .best
        .iter()
        .enumerate()
        .filter_map(|(index, person_id)| {
            person_id.map(|person_id| Assignment {
                person_id,
                role_id: input.role_id,
                slot: input.required_slots[index],
            })
        })
        .collect()
}

struct Search<'a> {
    input: &'a SolveInput<'a>,
    candidates: Vec<Vec<Uuid>>,
    deadline: Instant,
    best: Vec<Option<Uuid>>,
    best_score: Score,
}

impl Search<'_> {
    fn recurse(&mut self, index: usize, current: &mut Vec<Option<Uuid>>, covered_so_far: usize) {
        if Instant::now() >= self.deadline {
            return;
        }
        if index == current.len() {
            let score = Score {
                covered: covered_so_far,
                objective: objective_value(self.input, current),
            };
            if score > self.best_score {
                self.best_score = score;
                self.best = current.clone();
            }
            return;
        }

        let remaining = current.len() - index;
        if covered_so_far + remaining < self.best_score.covered {
            return;
        }

        let slot = self.input.required_slots[index];
        let candidates = self.candidates[index].clone();
        for candidate in candidates {
            if conflicts_with_prior(current, self.input.required_slots, index, candidate, slot) {
                continue;
            }
            current[index] = Some(candidate);
            self.recurse(index + 1, current, covered_so_far + 1);
            current[index] = None;
            if Instant::now() >= self.deadline {
                return;
            }
        }
        self.recurse(index + 1, current, covered_so_far);
    }
}

fn conflicts_with_prior(
    current: &[Option<Uuid>],
    slots: &[DatedSlot],
    index: usize,
    candidate: Uuid,
    slot: DatedSlot,
) -> bool {
    current[..index]
        .iter()
        .enumerate()
        .any(|(i, assigned)| *assigned == Some(candidate) && slots[i].overlaps(&slot))
}

fn objective_value(input: &SolveInput, assignment: &[Option<Uuid>]) -> i64 {
    match input.strategy {
        OptimizationStrategy::MaximizeCoverage => {
            assignment.iter().filter(|person| person.is_some()).count() as i64
        }
        OptimizationStrategy::MinimizeGaps => -gap_penalty(input, assignment),
        OptimizationStrategy::BalanceWorkload => -workload_penalty(input, assignment),
        OptimizationStrategy::Unrecognized => 0,
    }
}

fn assignments_by_person(
    input: &SolveInput,
    assignment: &[Option<Uuid>],
) -> BTreeMap<Uuid, Vec<DatedSlot>> {
    let mut by_person: BTreeMap<Uuid, Vec<DatedSlot>> = BTreeMap::new();
    for (index, person_id) in assignment.iter().enumerate() {
        if let Some(person_id) = person_id {
            by_person
                .entry(*person_id)
                .or_default()
                .push(input.required_slots[index]);
        }
    }
    by_person
}

/// Sum over every person of the wall-clock hours between the end of one
/// assigned slot and the start of the next in that person's chronological
/// schedule.
fn gap_penalty(input: &SolveInput, assignment: &[Option<Uuid>]) -> i64 {
    let mut total = 0i64;
    for mut slots in assignments_by_person(input, assignment).into_values() {
        slots.sort_by_key(|slot| (slot.date, slot.start_time));
        for pair in slots.windows(2) {
            let prev_end = PrimitiveDateTime::new(pair[0].date, pair[0].end_time);
            let next_start = PrimitiveDateTime::new(pair[1].date, pair[1].start_time);
            total += (next_start - prev_end).whole_hours().max(0);
        }
    }
    total
}

/// Sum of absolute deviations of each person's assigned hours from the
/// integer mean across all persons eligible for the role, zero if there is
/// at most one such person.
fn workload_penalty(input: &SolveInput, assignment: &[Option<Uuid>]) -> i64 {
    if input.persons.len() <= 1 {
        return 0;
    }
    let by_person = assignments_by_person(input, assignment);
    let hours: Vec<i64> = input
        .persons
        .iter()
        .map(|person_id| {
            by_person
                .get(person_id)
                .map(|slots| slots.iter().map(DatedSlot::duration_hours).sum())
                .unwrap_or(0)
        })
        .collect();
    let total: i64 = hours.iter().sum();
    let mean = total.div_euclid(input.persons.len() as i64);
    hours.iter().map(|hours| (hours - mean).abs()).sum()
}
