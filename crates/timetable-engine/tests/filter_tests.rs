//! Tests for event filtering: inclusion, exclusion, rule-groups, dates, ordering.

use chrono::{NaiveDate, NaiveTime};
use timetable_engine::{filter_events, Combination, Criteria, Dimension, Event, FilterRequest};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Helper: an event at 08:00-09:30 with the four rule-group references set.
fn event(id: u64, day: &str, tutor: u64, group: u64, activity: u64, kind: u64) -> Event {
    Event::new(id, date(day), time(8, 0), time(9, 30))
        .with_reference(Dimension::Tutor, tutor)
        .with_reference(Dimension::Group, group)
        .with_reference(Dimension::Activity, activity)
        .with_reference(Dimension::Type, kind)
}

/// The two events used by the worked scenarios.
fn scenario_events() -> Vec<Event> {
    vec![
        event(1, "2024-01-10", 10, 20, 30, 40),
        event(2, "2024-01-11", 11, 20, 31, 41),
    ]
}

fn parse(label_ids: &str, exclude: &str, combos: &str) -> Criteria {
    Criteria::parse(&FilterRequest {
        label_ids: Some(label_ids.to_string()),
        exclude_label_ids: Some(exclude.to_string()),
        exclude_combinations: Some(combos.to_string()),
        ..FilterRequest::default()
    })
    .unwrap()
}

fn ids(events: &[&Event]) -> Vec<u64> {
    events.iter().map(|e| e.id).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Worked scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rule_group_drops_included_event() {
    let events = scenario_events();
    let criteria = parse("20", "", "10,20,30,40");

    let result = filter_events(&criteria, &events);

    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn excluded_id_drops_included_event() {
    let events = scenario_events();
    let criteria = parse("20", "11", "");

    let result = filter_events(&criteria, &events);

    assert_eq!(ids(&result), vec![1]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Inclusion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_criteria_returns_everything_sorted() {
    let events = vec![
        event(3, "2024-01-12", 1, 2, 3, 4),
        event(1, "2024-01-10", 1, 2, 3, 4),
        event(2, "2024-01-11", 1, 2, 3, 4),
    ];

    let result = filter_events(&Criteria::default(), &events);

    assert_eq!(ids(&result), vec![1, 2, 3]);
}

#[test]
fn inclusion_matches_any_dimension() {
    let mut noted = event(3, "2024-01-12", 12, 22, 32, 42);
    noted.note_id = Some(99);
    let mut placed = event(4, "2024-01-13", 13, 23, 33, 43);
    placed.place_id = Some(77);
    let events = vec![
        event(1, "2024-01-10", 10, 20, 30, 40),
        event(2, "2024-01-11", 11, 21, 31, 41),
        noted,
        placed,
    ];

    // tutor of 1, type of 2, note of 3, place of 4
    let criteria = Criteria::default().including([10, 41, 99, 77]);
    let result = filter_events(&criteria, &events);

    assert_eq!(ids(&result), vec![1, 2, 3, 4]);
}

#[test]
fn inclusion_without_match_is_empty_not_error() {
    let events = scenario_events();
    let criteria = parse("12345", "", "");

    assert!(filter_events(&criteria, &events).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Exclusion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn exclusion_without_inclusion_filters_everything_else_in() {
    let events = scenario_events();
    let criteria = parse("", "30", "");

    assert_eq!(ids(&filter_events(&criteria, &events)), vec![2]);
}

#[test]
fn exclusion_wins_over_inclusion() {
    let events = scenario_events();
    let criteria = parse("10,11", "20", "");

    assert!(filter_events(&criteria, &events).is_empty());
}

#[test]
fn rule_group_requires_every_component() {
    let events = scenario_events();
    // Same tutor, group and activity as event 1 but a different type.
    let criteria = parse("", "", "10,20,30,41");

    assert_eq!(ids(&filter_events(&criteria, &events)), vec![1, 2]);
}

#[test]
fn rule_group_never_matches_event_with_missing_component() {
    let mut partial = event(1, "2024-01-10", 10, 20, 30, 40);
    partial.type_id = None;
    let events = vec![partial];

    let criteria = Criteria::default().excluding_combination(Combination {
        tutor_id: 10,
        group_id: 20,
        activity_id: 30,
        type_id: 40,
    });

    assert_eq!(ids(&filter_events(&criteria, &events)), vec![1]);
}

#[test]
fn rule_group_ignores_place_and_note() {
    let mut e = event(1, "2024-01-10", 10, 20, 30, 40);
    e.place_id = Some(50);
    e.note_id = Some(60);
    let events = vec![e];

    let criteria = parse("", "", "10,20,30,40");

    assert!(filter_events(&criteria, &events).is_empty());
}

#[test]
fn rule_group_order_is_tutor_group_activity_type() {
    let events = scenario_events();
    // Event 1's ids in the wrong order must not match.
    let criteria = parse("", "", "20,10,30,40|40,30,20,10");

    assert_eq!(filter_events(&criteria, &events).len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Dates
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn date_range_is_open_interval() {
    let events = vec![
        event(1, "2024-01-10", 1, 2, 3, 4),
        event(2, "2024-01-11", 1, 2, 3, 4),
        event(3, "2024-01-12", 1, 2, 3, 4),
    ];
    let criteria = Criteria::default().between(date("2024-01-10"), date("2024-01-12"));

    assert_eq!(ids(&filter_events(&criteria, &events)), vec![2]);
}

#[test]
fn one_date_bound_does_not_filter() {
    let events = scenario_events();
    let criteria = Criteria::parse(&FilterRequest {
        date_from: Some("2030-01-01".into()),
        ..FilterRequest::default()
    })
    .unwrap();

    assert_eq!(filter_events(&criteria, &events).len(), 2);
}

#[test]
fn inverted_range_matches_nothing() {
    let events = scenario_events();
    let criteria = Criteria::default().between(date("2024-02-01"), date("2024-01-01"));

    assert!(filter_events(&criteria, &events).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn same_day_sorted_by_start_time() {
    let mut late = event(1, "2024-01-10", 1, 2, 3, 4);
    late.start_time = time(13, 15);
    late.end_time = time(14, 45);
    let early = event(2, "2024-01-10", 1, 2, 3, 4);
    let events = vec![late, early];

    assert_eq!(ids(&filter_events(&Criteria::default(), &events)), vec![2, 1]);
}

#[test]
fn identical_slots_sorted_by_id() {
    let events = vec![
        event(9, "2024-01-10", 1, 2, 3, 4),
        event(5, "2024-01-10", 1, 2, 3, 4),
    ];

    assert_eq!(ids(&filter_events(&Criteria::default(), &events)), vec![5, 9]);
}

#[test]
fn filtering_does_not_modify_input() {
    let events = scenario_events();
    let before = events.clone();

    let _ = filter_events(&parse("20", "11", "10,20,30,40"), &events);

    assert_eq!(events, before);
}
