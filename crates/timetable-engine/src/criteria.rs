//! Criteria parsing -- request strings into a structured filter.
//!
//! # Input syntax
//!
//! - `labelIds`, `excludeLabelIds` -- comma-separated label ids: `"10,20,31"`
//! - `excludeCombinations` -- pipe-separated rule-groups of exactly four ids
//!   in `(tutor, group, activity, type)` order: `"10,20,30,40|11,20,31,41"`
//! - `dateFrom`, `dateTo` -- `YYYY-MM-DD`, an open interval that only applies
//!   when both bounds are given
//!
//! Absent and empty strings mean "no constraint". Anything else that does not
//! parse is a [`TimetableError::MalformedCriteria`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::event::Combination;
use crate::label::LabelId;
use crate::projection::Projection;

const LABEL_IDS: &str = "labelIds";
const EXCLUDE_LABEL_IDS: &str = "excludeLabelIds";
const EXCLUDE_COMBINATIONS: &str = "excludeCombinations";
const DATE_FROM: &str = "dateFrom";
const DATE_TO: &str = "dateTo";

/// Raw filter request as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub label_ids: Option<String>,
    #[serde(default)]
    pub exclude_label_ids: Option<String>,
    #[serde(default)]
    pub exclude_combinations: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    /// Dimension to project the matches onto, if any.
    #[serde(default)]
    pub project: Option<Projection>,
}

/// Open date interval: `from < date < to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from < date && date < self.to
    }
}

/// Parsed filter criteria evaluated by [`crate::filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Events must reference at least one of these (when non-empty).
    pub label_ids: BTreeSet<LabelId>,
    /// Events referencing any of these are dropped.
    pub exclude_label_ids: BTreeSet<LabelId>,
    /// Events whose full tuple equals one of these are dropped.
    pub exclude_combinations: BTreeSet<Combination>,
    pub date_range: Option<DateRange>,
}

impl Criteria {
    /// Parse every criterion of a [`FilterRequest`].
    ///
    /// # Errors
    /// Returns [`TimetableError::MalformedCriteria`] naming the first field that
    /// failed to parse.
    pub fn parse(request: &FilterRequest) -> Result<Self> {
        let label_ids = parse_id_list(LABEL_IDS, opt(&request.label_ids))?;
        let exclude_label_ids = parse_id_list(EXCLUDE_LABEL_IDS, opt(&request.exclude_label_ids))?;
        let exclude_combinations = parse_combinations(opt(&request.exclude_combinations))?;
        let date_from = parse_date(DATE_FROM, opt(&request.date_from))?;
        let date_to = parse_date(DATE_TO, opt(&request.date_to))?;

        let date_range = match (date_from, date_to) {
            (Some(from), Some(to)) => Some(DateRange { from, to }),
            (None, None) => None,
            _ => {
                tracing::debug!("only one date bound given, date filtering disabled");
                None
            }
        };

        Ok(Self {
            label_ids: label_ids.into_iter().collect(),
            exclude_label_ids: exclude_label_ids.into_iter().collect(),
            exclude_combinations: exclude_combinations.into_iter().collect(),
            date_range,
        })
    }

    /// Restrict matches to events referencing any of `ids`.
    pub fn including(mut self, ids: impl IntoIterator<Item = LabelId>) -> Self {
        self.label_ids.extend(ids);
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = LabelId>) -> Self {
        self.exclude_label_ids.extend(ids);
        self
    }

    pub fn excluding_combination(mut self, combination: Combination) -> Self {
        self.exclude_combinations.insert(combination);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some(DateRange { from, to });
        self
    }

    /// True when no criterion constrains the result ("browse everything").
    pub fn is_unconstrained(&self) -> bool {
        self.label_ids.is_empty()
            && self.exclude_label_ids.is_empty()
            && self.exclude_combinations.is_empty()
            && self.date_range.is_none()
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn parse_id(field: &'static str, token: &str) -> Result<LabelId> {
    let token = token.trim();
    let invalid = || TimetableError::malformed(field, format!("invalid id token '{}'", token));
    // `u64::from_str` also takes a leading '+'.
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse::<LabelId>().map_err(|_| invalid())
}

/// Parse a comma-separated id list. Blank input yields an empty list.
///
/// # Errors
/// Returns [`TimetableError::MalformedCriteria`] on any token that is not a
/// non-negative integer, including empty tokens such as in `"1,,2"`.
pub fn parse_id_list(field: &'static str, input: &str) -> Result<Vec<LabelId>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input.split(',').map(|token| parse_id(field, token)).collect()
}

/// Parse pipe-separated rule-groups of exactly four ids each.
///
/// # Errors
/// Returns [`TimetableError::MalformedCriteria`] on a bad id token or a
/// rule-group with a token count other than four.
pub fn parse_combinations(input: &str) -> Result<Vec<Combination>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split('|')
        .map(|group| {
            let ids = group
                .split(',')
                .map(|token| parse_id(EXCLUDE_COMBINATIONS, token))
                .collect::<Result<Vec<_>>>()?;
            match ids[..] {
                [tutor_id, group_id, activity_id, type_id] => Ok(Combination {
                    tutor_id,
                    group_id,
                    activity_id,
                    type_id,
                }),
                _ => Err(TimetableError::malformed(
                    EXCLUDE_COMBINATIONS,
                    format!("rule-group '{}' has {} ids, expected 4", group, ids.len()),
                )),
            }
        })
        .collect()
}

/// Parse an optional `YYYY-MM-DD` bound. Blank input yields `None`.
///
/// # Errors
/// Returns [`TimetableError::MalformedCriteria`] if the date does not parse.
pub fn parse_date(field: &'static str, input: &str) -> Result<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| TimetableError::malformed(field, format!("invalid date '{}': {}", input, e)))
}
