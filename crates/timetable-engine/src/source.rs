//! Read-only event sources and the in-memory [`Snapshot`].
//!
//! The engine only ever borrows from a source: events come back as shared
//! references and label references are resolved by lookup.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::criteria::Criteria;
use crate::error::{Result, TimetableError};
use crate::event::{Event, EVENT_REFERENCES};
use crate::label::{Dimension, Label, LabelId};

/// Resolve label ids to labels.
pub trait LabelLookup {
    fn label(&self, id: LabelId) -> Option<&Label>;
}

impl LabelLookup for BTreeMap<LabelId, Label> {
    fn label(&self, id: LabelId) -> Option<&Label> {
        self.get(&id)
    }
}

/// A read-only supplier of events whose references resolve through [`LabelLookup`].
pub trait EventSource: LabelLookup {
    /// Candidate events for `criteria`.
    ///
    /// A source may pre-filter using the criteria (for example a storage-level
    /// date predicate), but returning a superset is always allowed: the engine
    /// re-applies every test. Failures should be wrapped with
    /// [`TimetableError::source`] so they reach the caller unchanged.
    fn events(&self, criteria: &Criteria) -> Result<Vec<&Event>>;
}

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    events: Vec<Event>,
}

/// An immutable, validated set of labels and events held in memory.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    labels: BTreeMap<LabelId, Label>,
    events: Vec<Event>,
    exclude_deleted: bool,
}

impl Snapshot {
    /// Build a snapshot, checking that ids are unique and that every event
    /// reference points at a label of the matching dimension.
    ///
    /// # Errors
    /// [`TimetableError::DuplicateId`], [`TimetableError::InvalidLabel`],
    /// [`TimetableError::UnknownLabel`] or [`TimetableError::InconsistentReference`].
    pub fn new(labels: Vec<Label>, events: Vec<Event>) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for mut label in labels {
            label.fold_account_id()?;
            if label.tutor.is_some() && label.dimension() != Dimension::Tutor {
                return Err(TimetableError::InvalidLabel {
                    id: label.id,
                    message: format!("tutor details on a {} label", label.dimension()),
                });
            }
            let id = label.id;
            if by_id.insert(id, label).is_some() {
                return Err(TimetableError::DuplicateId { kind: "label", id });
            }
        }

        let mut event_ids = BTreeSet::new();
        for event in &events {
            if !event_ids.insert(event.id) {
                return Err(TimetableError::DuplicateId {
                    kind: "event",
                    id: event.id,
                });
            }
            check_references(event, &by_id)?;
        }

        tracing::debug!(
            labels = by_id.len(),
            events = events.len(),
            "snapshot loaded"
        );

        Ok(Self {
            labels: by_id,
            events,
            exclude_deleted: false,
        })
    }

    /// Parse and validate a `{ "labels": [...], "events": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Self::new(file.labels, file.events)
    }

    /// Withhold soft-deleted events from the engine.
    ///
    /// Off by default: every event, deleted or not, is a candidate.
    pub fn exclude_deleted(mut self, exclude: bool) -> Self {
        self.exclude_deleted = exclude;
        self
    }

    /// Every label, ordered by id.
    pub fn labels(&self) -> Vec<&Label> {
        self.labels.values().collect()
    }

    /// Labels of one dimension, ordered by id.
    pub fn labels_of(&self, dimension: Dimension) -> Vec<&Label> {
        self.labels
            .values()
            .filter(|label| label.dimension() == dimension)
            .collect()
    }

    /// The label `label` belongs to (e.g. a room's building), if known.
    pub fn parent_of(&self, label: &Label) -> Option<&Label> {
        label.parent_id.and_then(|id| self.labels.get(&id))
    }

    /// Labels whose parent is `id`, ordered by id.
    pub fn children_of(&self, id: LabelId) -> Vec<&Label> {
        self.labels
            .values()
            .filter(|label| label.parent_id == Some(id))
            .collect()
    }
}

fn check_references(event: &Event, labels: &BTreeMap<LabelId, Label>) -> Result<()> {
    for (expected, field) in EVENT_REFERENCES {
        let Some(label_id) = event.reference(expected) else {
            continue;
        };
        let label = labels.get(&label_id).ok_or(TimetableError::UnknownLabel {
            event_id: event.id,
            field,
            label_id,
        })?;
        if label.dimension() != expected {
            return Err(TimetableError::InconsistentReference {
                event_id: event.id,
                field,
                label_id,
                expected,
                found: label.dimension(),
            });
        }
    }
    Ok(())
}

impl LabelLookup for Snapshot {
    fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id)
    }
}

impl EventSource for Snapshot {
    fn events(&self, criteria: &Criteria) -> Result<Vec<&Event>> {
        let candidates: Vec<&Event> = self
            .events
            .iter()
            .filter(|event| !(self.exclude_deleted && event.is_deleted))
            .filter(|event| {
                criteria
                    .date_range
                    .is_none_or(|range| range.contains(event.date))
            })
            .collect();

        tracing::trace!(
            candidates = candidates.len(),
            total = self.events.len(),
            "snapshot pre-filter"
        );

        Ok(candidates)
    }
}
