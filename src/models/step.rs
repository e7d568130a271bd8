use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{date_opt, require, Validate};
use crate::error::Result;

/// A dated, completable action item attached to an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NextStep {
    pub id: Uuid,
    pub opportunity_id: Uuid,
    pub title: String,
    /// YYYY-MM-DD
    pub due_date: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Body for adding a next step to an opportunity. Steps start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub title: String,
    /// YYYY-MM-DD
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Validate for StepInput {
    fn validate(&self) -> Result<()> {
        require("title", &self.title, 250)?;
        date_opt("dueDate", &self.due_date)
    }
}

/// Partial update restricted to the completion flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStepInput {
    pub is_done: bool,
}

impl Validate for ToggleStepInput {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn title_is_required() {
        let input = StepInput {
            title: String::new(),
            due_date: None,
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "title", .. }));
    }

    #[test]
    fn title_is_capped_at_250() {
        let input = StepInput {
            title: "x".repeat(251),
            due_date: None,
        };
        assert!(input.validate().is_err());
        let input = StepInput {
            title: "x".repeat(250),
            due_date: None,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn due_date_is_optional_but_checked() {
        let input = StepInput {
            title: "Follow up".to_string(),
            due_date: Some("next week".to_string()),
        };
        assert!(input.validate().is_err());
        let input = StepInput {
            title: "Follow up".to_string(),
            due_date: Some("2025-01-31".to_string()),
        };
        assert!(input.validate().is_ok());
    }
}
