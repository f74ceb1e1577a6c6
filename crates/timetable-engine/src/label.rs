//! Labels -- the categorical entities events are filtered by.
//!
//! Every label belongs to exactly one [`Dimension`], fixed when the label is
//! created. Tutor labels may additionally own a [`TutorDetail`] record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;

/// Identifier of a [`Label`].
pub type LabelId = u64;

/// The fixed category a label belongs to.
///
/// Serialized as the lowercase name. On input the single-letter codes of the
/// upstream label table are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "tutor", alias = "N")]
    Tutor,
    #[serde(rename = "room", alias = "S", alias = "place")]
    Room,
    #[serde(rename = "group", alias = "G")]
    Group,
    #[serde(rename = "building", alias = "B")]
    Building,
    #[serde(rename = "field", alias = "F")]
    Field,
    #[serde(rename = "activity", alias = "P")]
    Activity,
    #[serde(rename = "type", alias = "T")]
    Type,
    #[serde(rename = "note", alias = "U")]
    Note,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Tutor,
        Dimension::Room,
        Dimension::Group,
        Dimension::Building,
        Dimension::Field,
        Dimension::Activity,
        Dimension::Type,
        Dimension::Note,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Tutor => "tutor",
            Dimension::Room => "room",
            Dimension::Group => "group",
            Dimension::Building => "building",
            Dimension::Field => "field",
            Dimension::Activity => "activity",
            Dimension::Type => "type",
            Dimension::Note => "note",
        }
    }

    /// Single-letter code used by the upstream label table.
    pub fn code(self) -> char {
        match self {
            Dimension::Tutor => 'N',
            Dimension::Room => 'S',
            Dimension::Group => 'G',
            Dimension::Building => 'B',
            Dimension::Field => 'F',
            Dimension::Activity => 'P',
            Dimension::Type => 'T',
            Dimension::Note => 'U',
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let [code] = trimmed.as_bytes() {
            if let Some(dim) = Dimension::ALL
                .into_iter()
                .find(|d| d.code() == (*code as char).to_ascii_uppercase())
            {
                return Ok(dim);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "place" => Ok(Dimension::Room),
            name => Dimension::ALL
                .into_iter()
                .find(|d| d.name() == name)
                .ok_or_else(|| TimetableError::malformed("dimension", format!("unknown dimension '{}'", s))),
        }
    }
}

/// Personal details owned by a tutor label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorDetail {
    pub forename: String,
    pub surname: String,
    /// Academic title, e.g. "dr hab.".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Identifier of the tutor's external (e-learning) account.
    #[serde(default, alias = "moodleId", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// A named categorical entity in one of the eight dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    /// Identifier in the upstream timetable; `None` for user-created labels.
    #[serde(default, alias = "timetableId")]
    pub external_id: Option<u64>,
    /// Original name, kept for audit.
    #[serde(alias = "key")]
    pub display_key: String,
    /// Name presented to consumers.
    #[serde(default, alias = "value")]
    pub display_value: String,
    #[serde(alias = "type")]
    dimension: Dimension,
    #[serde(default)]
    pub parent_id: Option<LabelId>,
    #[serde(default = "original_by_default")]
    pub is_original: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor: Option<TutorDetail>,
    /// Account id given on the label row itself; folded into `tutor` on load.
    #[serde(default, rename = "moodleId", skip_serializing)]
    row_account_id: Option<String>,
}

fn original_by_default() -> bool {
    true
}

impl Label {
    /// Create an upstream label whose display value equals its key.
    pub fn new(id: LabelId, dimension: Dimension, display_key: impl Into<String>) -> Self {
        let display_key = display_key.into();
        Self {
            id,
            external_id: None,
            display_value: display_key.clone(),
            display_key,
            dimension,
            parent_id: None,
            is_original: true,
            tutor: None,
            row_account_id: None,
        }
    }

    pub fn with_display_value(mut self, value: impl Into<String>) -> Self {
        self.display_value = value.into();
        self
    }

    pub fn with_parent(mut self, parent_id: LabelId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_tutor(mut self, detail: TutorDetail) -> Self {
        self.tutor = Some(detail);
        self
    }

    /// Mark the label as created locally rather than sourced upstream.
    pub fn user_created(mut self) -> Self {
        self.is_original = false;
        self.external_id = None;
        self
    }

    /// Move a label-level `moodleId` into the tutor detail.
    ///
    /// # Errors
    /// [`TimetableError::InvalidLabel`] if the label is not a tutor or the
    /// tutor detail already carries a different account id.
    pub(crate) fn fold_account_id(&mut self) -> Result<(), TimetableError> {
        let Some(account_id) = self.row_account_id.take() else {
            return Ok(());
        };
        if self.dimension != Dimension::Tutor {
            return Err(TimetableError::InvalidLabel {
                id: self.id,
                message: format!("account id on a {} label", self.dimension),
            });
        }
        let detail = self.tutor.get_or_insert_with(TutorDetail::default);
        match &detail.account_id {
            Some(existing) if *existing != account_id => Err(TimetableError::InvalidLabel {
                id: self.id,
                message: format!(
                    "account id '{}' conflicts with tutor detail '{}'",
                    account_id, existing
                ),
            }),
            _ => {
                detail.account_id = Some(account_id);
                Ok(())
            }
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// The consumer-facing name: the edited value, or the key when no value is set.
    pub fn display_name(&self) -> &str {
        if self.display_value.trim().is_empty() {
            &self.display_key
        } else {
            &self.display_value
        }
    }
}
