//! Query entry points: request strings in, serializable results out.

use serde::Serialize;

use crate::criteria::{Criteria, FilterRequest};
use crate::error::Result;
use crate::event::Event;
use crate::filter::filter_events;
use crate::label::{Dimension, Label};
use crate::projection::{project_activities, project_labels, ActivityRow, Projection};
use crate::source::{EventSource, LabelLookup};

/// An event together with the labels its references resolve to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEvent<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub tutor: Option<&'a Label>,
    pub group: Option<&'a Label>,
    pub place: Option<&'a Label>,
    pub activity: Option<&'a Label>,
    #[serde(rename = "type")]
    pub kind: Option<&'a Label>,
    pub note: Option<&'a Label>,
}

impl<'a> ResolvedEvent<'a> {
    pub fn resolve<L>(event: &'a Event, labels: &'a L) -> Self
    where
        L: LabelLookup + ?Sized,
    {
        let resolve = move |dimension: Dimension| event.reference(dimension).and_then(|id| labels.label(id));
        Self {
            event,
            tutor: resolve(Dimension::Tutor),
            group: resolve(Dimension::Group),
            place: resolve(Dimension::Room),
            activity: resolve(Dimension::Activity),
            kind: resolve(Dimension::Type),
            note: resolve(Dimension::Note),
        }
    }
}

/// Outcome of a query.
///
/// Serializes as `{"events": [...], "count": n}` or, for projections, as a
/// single key named after the projected dimension (`{"tutors": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult<'a> {
    Events {
        events: Vec<ResolvedEvent<'a>>,
        count: usize,
    },
    Tutors {
        tutors: Vec<&'a Label>,
    },
    Groups {
        groups: Vec<&'a Label>,
    },
    Rooms {
        rooms: Vec<&'a Label>,
    },
    Activities {
        activities: Vec<ActivityRow<'a>>,
    },
}

impl QueryResult<'_> {
    /// Number of rows in the result, whatever its shape.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Events { count, .. } => *count,
            QueryResult::Tutors { tutors } => tutors.len(),
            QueryResult::Groups { groups } => groups.len(),
            QueryResult::Rooms { rooms } => rooms.len(),
            QueryResult::Activities { activities } => activities.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse `request` and evaluate it against `source`.
///
/// # Errors
/// [`TimetableError::MalformedCriteria`](crate::TimetableError::MalformedCriteria)
/// for unparseable criteria; source failures are passed through unchanged.
pub fn run_query<'a, S>(source: &'a S, request: &FilterRequest) -> Result<QueryResult<'a>>
where
    S: EventSource + ?Sized,
{
    let criteria = Criteria::parse(request)?;
    evaluate(source, &criteria, request.project)
}

/// Evaluate already-parsed criteria against `source`, optionally projecting.
pub fn evaluate<'a, S>(
    source: &'a S,
    criteria: &Criteria,
    project: Option<Projection>,
) -> Result<QueryResult<'a>>
where
    S: EventSource + ?Sized,
{
    let _span = tracing::debug_span!("query", project = ?project).entered();

    if criteria.is_unconstrained() {
        tracing::debug!("no criteria given, browsing all events");
    }

    let candidates = source.events(criteria)?;
    let matched = filter_events(criteria, candidates);

    let result = match project {
        None => {
            let events: Vec<ResolvedEvent<'a>> = matched
                .iter()
                .map(|&event| ResolvedEvent::resolve(event, source))
                .collect();
            QueryResult::Events {
                count: events.len(),
                events,
            }
        }
        Some(Projection::Tutor) => QueryResult::Tutors {
            tutors: project_labels(&matched, Dimension::Tutor, source),
        },
        Some(Projection::Group) => QueryResult::Groups {
            groups: project_labels(&matched, Dimension::Group, source),
        },
        Some(Projection::Room) => QueryResult::Rooms {
            rooms: project_labels(&matched, Dimension::Room, source),
        },
        Some(Projection::Activity) => QueryResult::Activities {
            activities: project_activities(&matched, source),
        },
    };

    Ok(result)
}
