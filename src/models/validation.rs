use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::goal::{GoalDraft, GoalType, MAX_NAME_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoalField {
    Name,
    Progress,
    StartDate,
    EndDate,
}

impl GoalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Progress => "progress",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
        }
    }
}

impl Serialize for GoalField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooLong,
    Ordering,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

/// Field-keyed validation messages. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<GoalField, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: GoalField) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: GoalField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GoalField, &FieldError)> {
        self.0.iter()
    }

    fn insert(&mut self, field: GoalField, kind: FieldErrorKind, message: &'static str) {
        self.0.insert(field, FieldError { kind, message });
    }

    /// One line per field, in field order.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(field, err)| format!("{}: {}", field.as_str(), err.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn validate(draft: &GoalDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.insert(GoalField::Name, FieldErrorKind::Required, "Goal description is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.insert(
            GoalField::Name,
            FieldErrorKind::TooLong,
            "Goal description must be 50 characters or less",
        );
    }

    match draft.goal_type {
        GoalType::Percentage => {
            if let Some(progress) = draft.progress {
                if !(0..=100).contains(&progress) {
                    errors.insert(
                        GoalField::Progress,
                        FieldErrorKind::OutOfRange,
                        "Progress must be between 0 and 100",
                    );
                }
            }
        }
        GoalType::Timeframe => match (draft.start_date, draft.end_date) {
            (Some(start), Some(end)) => {
                if start >= end {
                    errors.insert(
                        GoalField::StartDate,
                        FieldErrorKind::Ordering,
                        "Start date must be before end date",
                    );
                    errors.insert(
                        GoalField::EndDate,
                        FieldErrorKind::Ordering,
                        "End date must be after start date",
                    );
                }
            }
            (start, end) => {
                if start.is_none() {
                    errors.insert(GoalField::StartDate, FieldErrorKind::Required, "Start date is required");
                }
                if end.is_none() {
                    errors.insert(
                        GoalField::EndDate,
                        FieldErrorKind::Required,
                        "End date is required for timeframe goals",
                    );
                }
            }
        },
    }

    errors
}
