use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate, FieldErrors};

/// Row key assigned by the store on first save.
pub type GoalId = i64;

pub const DEFAULT_GOAL_NAME: &str = "New Goal";
pub const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Percentage,
    Timeframe,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Timeframe => "timeframe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(Self::Percentage),
            "timeframe" => Some(Self::Timeframe),
            _ => None,
        }
    }
}

/// The fields that drive progress for each goal type. Only the active
/// variant's fields exist in memory; the flat row shape lives in `db::goal_repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalKind {
    Percentage {
        progress: i64,
    },
    Timeframe {
        #[serde(rename = "startDate")]
        start_date: Option<DateTime<Utc>>,
        #[serde(rename = "endDate")]
        end_date: Option<DateTime<Utc>>,
    },
}

impl GoalKind {
    pub fn goal_type(&self) -> GoalType {
        match self {
            Self::Percentage { .. } => GoalType::Percentage,
            Self::Timeframe { .. } => GoalType::Timeframe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Option<GoalId>,
    pub name: String,
    #[serde(flatten)]
    pub kind: GoalKind,
}

impl Goal {
    /// The placeholder goal used whenever the collection would otherwise be empty.
    pub fn default_goal() -> Self {
        Self {
            id: None,
            name: DEFAULT_GOAL_NAME.to_string(),
            kind: GoalKind::Percentage { progress: 0 },
        }
    }

    pub fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }

    pub fn with_id(self, id: GoalId) -> Self {
        Self { id: Some(id), ..self }
    }

    /// Prefill a composer form from this goal, e.g. when entering edit mode.
    pub fn to_draft(&self) -> GoalDraft {
        match &self.kind {
            GoalKind::Percentage { progress } => GoalDraft {
                name: self.name.clone(),
                goal_type: GoalType::Percentage,
                progress: Some(*progress),
                start_date: None,
                end_date: None,
            },
            GoalKind::Timeframe { start_date, end_date } => GoalDraft {
                name: self.name.clone(),
                goal_type: GoalType::Timeframe,
                progress: None,
                start_date: *start_date,
                end_date: *end_date,
            },
        }
    }
}

/// Unvalidated goal as composed by the user. Carries the fields of both goal
/// types so switching type in the composer does not lose input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub progress: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            goal_type: GoalType::Percentage,
            progress: Some(0),
            start_date: None,
            end_date: None,
        }
    }
}

impl GoalDraft {
    pub fn percentage(name: impl Into<String>, progress: i64) -> Self {
        Self {
            name: name.into(),
            goal_type: GoalType::Percentage,
            progress: Some(progress),
            start_date: None,
            end_date: None,
        }
    }

    pub fn timeframe(
        name: impl Into<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            goal_type: GoalType::Timeframe,
            progress: None,
            start_date,
            end_date,
        }
    }

    /// Validate and build the domain goal. The name is trimmed, dates are cut
    /// to the millisecond precision they are stored with, and the inactive
    /// type's fields are dropped.
    pub fn into_goal(self, id: Option<GoalId>) -> Result<Goal, FieldErrors> {
        let errors = validate(&self);
        if !errors.is_empty() {
            return Err(errors);
        }

        let kind = match self.goal_type {
            GoalType::Percentage => GoalKind::Percentage {
                progress: self.progress.unwrap_or(0),
            },
            GoalType::Timeframe => GoalKind::Timeframe {
                start_date: self.start_date.map(|d| d.trunc_subsecs(3)),
                end_date: self.end_date.map(|d| d.trunc_subsecs(3)),
            },
        };

        Ok(Goal {
            id,
            name: self.name.trim().to_string(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_into_goal_drops_inactive_fields() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let draft = GoalDraft {
            name: "  Read more  ".into(),
            goal_type: GoalType::Percentage,
            progress: Some(40),
            start_date: Some(start),
            end_date: Some(end),
        };

        let goal = draft.into_goal(Some(3)).unwrap();
        assert_eq!(goal.id, Some(3));
        assert_eq!(goal.name, "Read more");
        assert_eq!(goal.kind, GoalKind::Percentage { progress: 40 });
    }

    #[test]
    fn test_into_goal_timeframe() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut draft = GoalDraft::timeframe("Ship it", Some(start), Some(end));
        draft.progress = Some(90);

        let goal = draft.into_goal(None).unwrap();
        assert_eq!(goal.goal_type(), GoalType::Timeframe);
        assert_eq!(
            goal.kind,
            GoalKind::Timeframe { start_date: Some(start), end_date: Some(end) }
        );
    }

    #[test]
    fn test_into_goal_truncates_to_millis() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::nanoseconds(1_234_567);
        let end = start + chrono::Duration::days(1);
        let goal = GoalDraft::timeframe("t", Some(start), Some(end)).into_goal(None).unwrap();
        let GoalKind::Timeframe { start_date: Some(stored), .. } = goal.kind else {
            panic!("expected timeframe");
        };
        assert_eq!(stored.timestamp_subsec_nanos(), 1_000_000);
    }

    #[test]
    fn test_into_goal_rejects_invalid() {
        assert!(GoalDraft::percentage("   ", 5).into_goal(None).is_err());
    }

    #[test]
    fn test_draft_roundtrip_from_goal() {
        let goal = Goal { id: Some(1), name: "Run".into(), kind: GoalKind::Percentage { progress: 12 } };
        let draft = goal.to_draft();
        assert_eq!(draft.progress, Some(12));
        assert_eq!(draft.into_goal(goal.id).unwrap(), goal);
    }

    #[test]
    fn test_goal_type_tags() {
        assert_eq!(GoalType::from_str("timeframe"), Some(GoalType::Timeframe));
        assert_eq!(GoalType::from_str(GoalType::Percentage.as_str()), Some(GoalType::Percentage));
        assert_eq!(GoalType::from_str("weekly"), None);
    }

    #[test]
    fn test_default_goal() {
        let goal = Goal::default_goal();
        assert_eq!(goal.id, None);
        assert_eq!(goal.name, "New Goal");
        assert_eq!(goal.kind, GoalKind::Percentage { progress: 0 });
    }
}
