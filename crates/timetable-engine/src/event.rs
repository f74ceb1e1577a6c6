//! Scheduled timetable events and their six label references.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::label::{Dimension, LabelId};

/// Identifier of an [`Event`].
pub type EventId = u64;

/// The dimensions an event references, paired with the field that holds each.
pub const EVENT_REFERENCES: [(Dimension, &str); 6] = [
    (Dimension::Tutor, "tutorId"),
    (Dimension::Group, "groupId"),
    (Dimension::Room, "placeId"),
    (Dimension::Activity, "activityId"),
    (Dimension::Type, "typeId"),
    (Dimension::Note, "noteId"),
];

/// One scheduled timetable occurrence.
///
/// Label references are plain ids; they are resolved through an
/// [`EventSource`](crate::source::EventSource), never copied into the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    /// ISO weekday, Monday = 1.
    #[serde(default)]
    pub day_number: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Number of teaching blocks the event spans.
    #[serde(default = "single_block")]
    pub block_count: u32,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub tutor_id: Option<LabelId>,
    #[serde(default)]
    pub group_id: Option<LabelId>,
    #[serde(default)]
    pub place_id: Option<LabelId>,
    #[serde(default)]
    pub activity_id: Option<LabelId>,
    #[serde(default)]
    pub type_id: Option<LabelId>,
    #[serde(default)]
    pub note_id: Option<LabelId>,
}

fn single_block() -> u32 {
    1
}

/// The exact `(tutor, group, activity, type)` tuple used by rule-group exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub tutor_id: LabelId,
    pub group_id: LabelId,
    pub activity_id: LabelId,
    pub type_id: LabelId,
}

impl Event {
    /// Create a single-block event with no label references.
    pub fn new(id: EventId, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id,
            date,
            day_number: date.weekday().number_from_monday() as u8,
            start_time,
            end_time,
            block_count: 1,
            is_deleted: false,
            tutor_id: None,
            group_id: None,
            place_id: None,
            activity_id: None,
            type_id: None,
            note_id: None,
        }
    }

    /// Set the reference for `dimension`. Building and field are ignored.
    pub fn with_reference(mut self, dimension: Dimension, id: LabelId) -> Self {
        if let Some(slot) = self.reference_mut(dimension) {
            *slot = Some(id);
        }
        self
    }

    /// The reference held for `dimension`, if events carry that dimension at all.
    pub fn reference(&self, dimension: Dimension) -> Option<LabelId> {
        match dimension {
            Dimension::Tutor => self.tutor_id,
            Dimension::Group => self.group_id,
            Dimension::Room => self.place_id,
            Dimension::Activity => self.activity_id,
            Dimension::Type => self.type_id,
            Dimension::Note => self.note_id,
            Dimension::Building | Dimension::Field => None,
        }
    }

    fn reference_mut(&mut self, dimension: Dimension) -> Option<&mut Option<LabelId>> {
        match dimension {
            Dimension::Tutor => Some(&mut self.tutor_id),
            Dimension::Group => Some(&mut self.group_id),
            Dimension::Room => Some(&mut self.place_id),
            Dimension::Activity => Some(&mut self.activity_id),
            Dimension::Type => Some(&mut self.type_id),
            Dimension::Note => Some(&mut self.note_id),
            Dimension::Building | Dimension::Field => None,
        }
    }

    /// All non-null label references of this event, in field order.
    pub fn references(&self) -> impl Iterator<Item = LabelId> {
        [
            self.tutor_id,
            self.group_id,
            self.place_id,
            self.activity_id,
            self.type_id,
            self.note_id,
        ]
        .into_iter()
        .flatten()
    }

    /// True if any of the six references satisfies `pred`.
    pub fn references_any(&self, pred: impl FnMut(LabelId) -> bool) -> bool {
        self.references().any(pred)
    }

    /// The `(tutor, group, activity, type)` tuple, present only when all four are set.
    pub fn combination(&self) -> Option<Combination> {
        Some(Combination {
            tutor_id: self.tutor_id?,
            group_id: self.group_id?,
            activity_id: self.activity_id?,
            type_id: self.type_id?,
        })
    }

    /// Default ordering key: date, then start time, then id.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime, EventId) {
        (self.date, self.start_time, self.id)
    }
}
