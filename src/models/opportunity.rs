use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{bounded_opt, date_opt, require, NextStep, Note, Validate};
use crate::error::{Error, Result};

/// A tracked business/technical engagement record.
///
/// Created with server-assigned id and timestamps, mutated in place via
/// full-replace update, deleted outright (cascading to notes and steps).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Opportunity {
    pub id: Uuid,
    pub name: String,
    pub technology_stack: Option<String>,
    pub tech_owner: Option<String>,
    pub business_owner: Option<String>,
    pub first_contact_date: Option<String>,
    pub stage: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i32>,
    pub tags: Option<String>,
    pub next_step_summary: Option<String>,
    pub next_step_due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or fully replacing an opportunity.
///
/// The same shape serves both operations; optional fields absent from the
/// body are stored as NULL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityInput {
    pub name: String,
    #[serde(default)]
    pub technology_stack: Option<String>,
    #[serde(default)]
    pub tech_owner: Option<String>,
    #[serde(default)]
    pub business_owner: Option<String>,
    /// YYYY-MM-DD
    #[serde(default)]
    pub first_contact_date: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub next_step_summary: Option<String>,
    /// YYYY-MM-DD
    #[serde(default)]
    pub next_step_due_date: Option<String>,
}

impl Validate for OpportunityInput {
    fn validate(&self) -> Result<()> {
        require("name", &self.name, 200)?;
        bounded_opt("technologyStack", &self.technology_stack, 400)?;
        bounded_opt("techOwner", &self.tech_owner, 200)?;
        bounded_opt("businessOwner", &self.business_owner, 200)?;
        date_opt("firstContactDate", &self.first_contact_date)?;
        bounded_opt("stage", &self.stage, 60)?;
        bounded_opt("status", &self.status, 30)?;
        if let Some(priority) = self.priority {
            if !(1..=5).contains(&priority) {
                return Err(Error::invalid("priority", "must be between 1 and 5"));
            }
        }
        bounded_opt("tags", &self.tags, 400)?;
        bounded_opt("nextStepSummary", &self.next_step_summary, 500)?;
        date_opt("nextStepDueDate", &self.next_step_due_date)?;
        Ok(())
    }
}

/// An opportunity with its notes and next steps, used for detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDetail {
    pub opportunity: Opportunity,
    pub notes: Vec<Note>,
    pub next_steps: Vec<NextStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> OpportunityInput {
        OpportunityInput {
            name: "Acme".to_string(),
            technology_stack: None,
            tech_owner: None,
            business_owner: None,
            first_contact_date: None,
            stage: None,
            status: None,
            priority: None,
            tags: None,
            next_step_summary: None,
            next_step_due_date: None,
        }
    }

    #[test]
    fn minimal_input_is_valid() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let input = OpportunityInput {
            name: String::new(),
            ..minimal()
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let input = OpportunityInput {
            name: "x".repeat(201),
            ..minimal()
        };
        assert!(input.validate().is_err());
        let input = OpportunityInput {
            name: "x".repeat(200),
            ..minimal()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn priority_must_be_between_1_and_5() {
        for bad in [0, 6, -1] {
            let input = OpportunityInput {
                priority: Some(bad),
                ..minimal()
            };
            let err = input.validate().unwrap_err();
            assert!(matches!(err, Error::Validation { field: "priority", .. }));
        }
        for good in 1..=5 {
            let input = OpportunityInput {
                priority: Some(good),
                ..minimal()
            };
            assert!(input.validate().is_ok());
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["2024-13-01", "2024-1-1", "not-a-date", "2024/01/01"] {
            let input = OpportunityInput {
                first_contact_date: Some(bad.to_string()),
                ..minimal()
            };
            assert!(input.validate().is_err(), "{bad} should be rejected");
        }
        let input = OpportunityInput {
            first_contact_date: Some("2024-06-30".to_string()),
            ..minimal()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rows_serialize_with_pascal_case_keys() {
        let row = Opportunity {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            technology_stack: None,
            tech_owner: Some("Ada".to_string()),
            business_owner: None,
            first_contact_date: None,
            stage: None,
            status: None,
            priority: None,
            tags: None,
            next_step_summary: None,
            next_step_due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Name"], "Acme");
        assert_eq!(json["TechOwner"], "Ada");
        assert!(json.get("name").is_none());
    }
}
