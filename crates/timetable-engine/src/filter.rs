//! Event filtering -- apply [`Criteria`] to an event collection.
//!
//! An event survives when it passes all four tests:
//!
//! 1. **Inclusion** -- no inclusion ids given, or any of its references is one of them.
//! 2. **Exclusion by id** -- none of its references is an excluded id.
//! 3. **Exclusion by combination** -- its fully-populated
//!    `(tutor, group, activity, type)` tuple is not an excluded rule-group.
//! 4. **Date range** -- no range given, or its date lies strictly inside it.
//!
//! Survivors come back in default order: date, start time, then id.

use crate::criteria::Criteria;
use crate::event::Event;

/// Whether a single event satisfies every criterion.
pub fn matches(criteria: &Criteria, event: &Event) -> bool {
    is_included(criteria, event)
        && !is_excluded_by_id(criteria, event)
        && !is_excluded_by_combination(criteria, event)
        && in_date_range(criteria, event)
}

fn is_included(criteria: &Criteria, event: &Event) -> bool {
    criteria.label_ids.is_empty() || event.references_any(|id| criteria.label_ids.contains(&id))
}

fn is_excluded_by_id(criteria: &Criteria, event: &Event) -> bool {
    !criteria.exclude_label_ids.is_empty()
        && event.references_any(|id| criteria.exclude_label_ids.contains(&id))
}

fn is_excluded_by_combination(criteria: &Criteria, event: &Event) -> bool {
    if criteria.exclude_combinations.is_empty() {
        return false;
    }
    // An event with any of the four references missing has no combination
    // and therefore never matches a rule-group.
    event
        .combination()
        .is_some_and(|combo| criteria.exclude_combinations.contains(&combo))
}

fn in_date_range(criteria: &Criteria, event: &Event) -> bool {
    criteria
        .date_range
        .is_none_or(|range| range.contains(event.date))
}

/// Filter `events` by `criteria` and return the survivors in default order.
///
/// Events are borrowed, never modified. With unconstrained criteria the result
/// is the whole input, sorted.
pub fn filter_events<'a, I>(criteria: &Criteria, events: I) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut survivors: Vec<&'a Event> = events
        .into_iter()
        .filter(|event| matches(criteria, event))
        .collect();

    survivors.sort_by_key(|event| event.sort_key());

    tracing::debug!(
        survivors = survivors.len(),
        include = criteria.label_ids.len(),
        exclude = criteria.exclude_label_ids.len(),
        rule_groups = criteria.exclude_combinations.len(),
        dated = criteria.date_range.is_some(),
        "filtered events"
    );

    survivors
}
