//! Per-dimension projections of a filtered event set.
//!
//! A projection lists the distinct labels of one dimension referenced by the
//! matching events. Deduplication keeps the first occurrence of each label id
//! in the default event order; the distinct labels are then ordered by
//! `display_key`, ties keeping that first-occurrence order.
//!
//! The activity projection is wider: one representative row per distinct
//! `(type, activity, tutor, group)` tuple.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::event::{Combination, Event};
use crate::label::{Dimension, Label, LabelId};
use crate::source::LabelLookup;

/// Dimensions a query can be projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    Tutor,
    Group,
    #[serde(alias = "place")]
    Room,
    Activity,
}

impl Projection {
    pub fn dimension(self) -> Dimension {
        match self {
            Projection::Tutor => Dimension::Tutor,
            Projection::Group => Dimension::Group,
            Projection::Room => Dimension::Room,
            Projection::Activity => Dimension::Activity,
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dimension().name())
    }
}

impl FromStr for Projection {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tutor" | "tutors" => Ok(Projection::Tutor),
            "group" | "groups" => Ok(Projection::Group),
            "room" | "rooms" | "place" => Ok(Projection::Room),
            "activity" | "activities" => Ok(Projection::Activity),
            other => Err(TimetableError::MalformedCriteria {
                field: "project",
                message: format!(
                    "unknown projection '{}', expected tutor, group, room or activity",
                    other
                ),
            }),
        }
    }
}

/// One distinct `(type, activity, tutor, group)` tuple among the matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow<'a> {
    pub activity: &'a Label,
    #[serde(rename = "type")]
    pub kind: Option<&'a Label>,
    pub tutor: Option<&'a Label>,
    pub group: Option<&'a Label>,
    /// First matching event carrying this tuple.
    pub event: &'a Event,
}

impl ActivityRow<'_> {
    /// The rule-group that would exclude this row, if all four parts are present.
    pub fn combination(&self) -> Option<Combination> {
        Some(Combination {
            tutor_id: self.tutor?.id,
            group_id: self.group?.id,
            activity_id: self.activity.id,
            type_id: self.kind?.id,
        })
    }
}

fn by_display_key(a: &(usize, &Label), b: &(usize, &Label)) -> Ordering {
    a.1.display_key
        .cmp(&b.1.display_key)
        .then(a.0.cmp(&b.0))
}

/// Distinct labels of `dimension` referenced by `events`.
///
/// `events` is expected in default order (see [`crate::filter::filter_events`]).
/// Events without a reference in `dimension` are skipped, as are references
/// that `labels` cannot resolve.
pub fn project_labels<'a, L>(events: &[&Event], dimension: Dimension, labels: &'a L) -> Vec<&'a Label>
where
    L: LabelLookup + ?Sized,
{
    let mut first_seen: BTreeMap<LabelId, (usize, &'a Label)> = BTreeMap::new();

    for (position, event) in events.iter().enumerate() {
        let Some(id) = event.reference(dimension) else {
            continue;
        };
        if let Entry::Vacant(slot) = first_seen.entry(id) {
            match labels.label(id) {
                Some(label) => {
                    slot.insert((position, label));
                }
                None => tracing::warn!(
                    event_id = event.id,
                    label_id = id,
                    %dimension,
                    "unresolvable label reference skipped"
                ),
            }
        }
    }

    let mut distinct: Vec<(usize, &'a Label)> = first_seen.into_values().collect();
    distinct.sort_by(by_display_key);

    tracing::debug!(%dimension, distinct = distinct.len(), "projected labels");

    distinct.into_iter().map(|(_, label)| label).collect()
}

type ActivityKey = (Option<LabelId>, LabelId, Option<LabelId>, Option<LabelId>);

/// One row per distinct `(type, activity, tutor, group)` tuple among `events`.
///
/// Events without an activity are skipped. Rows are ordered by the activity's
/// `display_key`, ties by first occurrence.
pub fn project_activities<'a, L>(events: &[&'a Event], labels: &'a L) -> Vec<ActivityRow<'a>>
where
    L: LabelLookup + ?Sized,
{
    let mut first_seen: BTreeMap<ActivityKey, (usize, ActivityRow<'a>)> = BTreeMap::new();

    for (position, event) in events.iter().copied().enumerate() {
        let Some(activity_id) = event.activity_id else {
            continue;
        };
        let key = (event.type_id, activity_id, event.tutor_id, event.group_id);
        let Entry::Vacant(slot) = first_seen.entry(key) else {
            continue;
        };
        let Some(activity) = labels.label(activity_id) else {
            tracing::warn!(
                event_id = event.id,
                label_id = activity_id,
                "unresolvable activity reference skipped"
            );
            continue;
        };
        let resolve = move |id: Option<LabelId>| id.and_then(|id| labels.label(id));
        slot.insert((
            position,
            ActivityRow {
                activity,
                kind: resolve(event.type_id),
                tutor: resolve(event.tutor_id),
                group: resolve(event.group_id),
                event,
            },
        ));
    }

    let mut rows: Vec<(usize, ActivityRow<'a>)> = first_seen.into_values().collect();
    rows.sort_by(|a, b| {
        a.1.activity
            .display_key
            .cmp(&b.1.activity.display_key)
            .then(a.0.cmp(&b.0))
    });

    tracing::debug!(distinct = rows.len(), "projected activities");

    rows.into_iter().map(|(_, row)| row).collect()
}
