//! Error types for timetable-engine operations.

use thiserror::Error;

use crate::label::{Dimension, LabelId};

#[derive(Error, Debug)]
pub enum TimetableError {
    /// A criteria string could not be parsed (bad id token, wrong rule-group arity, bad date).
    #[error("Malformed criteria in `{field}`: {message}")]
    MalformedCriteria { field: &'static str, message: String },

    /// The external event source failed. The underlying error is kept as the source.
    #[error("Event source failure: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid snapshot JSON: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },

    #[error("Event {event_id} references unknown label {label_id} in `{field}`")]
    UnknownLabel {
        event_id: u64,
        field: &'static str,
        label_id: LabelId,
    },

    #[error("Event {event_id} references label {label_id} of dimension {found} in `{field}`, expected {expected}")]
    InconsistentReference {
        event_id: u64,
        field: &'static str,
        label_id: LabelId,
        expected: Dimension,
        found: Dimension,
    },

    #[error("Invalid label {id}: {message}")]
    InvalidLabel { id: LabelId, message: String },
}

impl TimetableError {
    pub(crate) fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        TimetableError::MalformedCriteria {
            field,
            message: message.into(),
        }
    }

    /// Wrap a failure from an external [`EventSource`](crate::source::EventSource).
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TimetableError::Source(Box::new(err))
    }

    /// True for errors the caller caused (reported as a client error by transports).
    pub fn is_client_error(&self) -> bool {
        matches!(self, TimetableError::MalformedCriteria { .. })
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
