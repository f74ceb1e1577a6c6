//! # timetable-engine
//!
//! Label-driven filtering and projection for university timetable events.
//!
//! A timetable is a set of categorical [`Label`]s (tutors, rooms, groups,
//! buildings, fields, activities, types, notes) and [`Event`]s referencing up
//! to six of them. A query selects events by label ids, drops events by label
//! ids or by exact `(tutor, group, activity, type)` rule-groups, optionally
//! bounds them by date, and can project the matches onto one dimension.
//!
//! ## Quick start
//!
//! ```rust
//! use timetable_engine::{run_query, FilterRequest, QueryResult, Snapshot};
//!
//! let json = r#"{
//!   "labels": [
//!     {"id": 10, "displayKey": "Kowalski", "dimension": "tutor"},
//!     {"id": 20, "displayKey": "KrZZIs3011Io", "dimension": "group"}
//!   ],
//!   "events": [
//!     {"id": 1, "date": "2024-01-10", "startTime": "08:00:00", "endTime": "09:30:00",
//!      "tutorId": 10, "groupId": 20}
//!   ]
//! }"#;
//! let snapshot = Snapshot::from_json(json).unwrap();
//!
//! let request = FilterRequest {
//!     label_ids: Some("20".to_string()),
//!     ..FilterRequest::default()
//! };
//! let result = run_query(&snapshot, &request).unwrap();
//! assert!(matches!(result, QueryResult::Events { count: 1, .. }));
//! ```
//!
//! ## Modules
//!
//! - [`criteria`] — request strings → [`Criteria`]
//! - [`filter`] — inclusion, exclusion and date tests, default ordering
//! - [`projection`] — distinct labels (or activity tuples) among the matches
//! - [`query`] — parse + fetch + filter + project in one call
//! - [`source`] — the [`EventSource`] seam and the in-memory [`Snapshot`]
//! - [`label`], [`event`] — the dimension model
//! - [`error`] — Error types

pub mod criteria;
pub mod error;
pub mod event;
pub mod filter;
pub mod label;
pub mod projection;
pub mod query;
pub mod source;

pub use criteria::{Criteria, DateRange, FilterRequest};
pub use error::TimetableError;
pub use event::{Combination, Event, EventId};
pub use filter::filter_events;
pub use label::{Dimension, Label, LabelId, TutorDetail};
pub use projection::{project_activities, project_labels, ActivityRow, Projection};
pub use query::{evaluate, run_query, QueryResult, ResolvedEvent};
pub use source::{EventSource, LabelLookup, Snapshot};
