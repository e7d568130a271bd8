use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{date, Validate};
use crate::error::{Error, Result};

/// A dated free-form note attached to an opportunity.
///
/// Notes are append-only plus delete; they carry no update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Note {
    pub id: Uuid,
    pub opportunity_id: Uuid,
    /// YYYY-MM-DD
    pub note_date: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Body for adding a note to an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    /// YYYY-MM-DD
    pub note_date: String,
    /// Free-form, unbounded length.
    pub content: String,
}

impl Validate for NoteInput {
    fn validate(&self) -> Result<()> {
        date("noteDate", &self.note_date)?;
        if self.content.is_empty() {
            return Err(Error::invalid("content", "is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_note_passes() {
        let input = NoteInput {
            note_date: "2024-03-15".to_string(),
            content: "Kickoff call went well".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn short_date_token_is_rejected() {
        let input = NoteInput {
            note_date: "2024-3-15".to_string(),
            content: "x".to_string(),
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "noteDate", .. }));
    }

    #[test]
    fn empty_content_is_rejected() {
        let input = NoteInput {
            note_date: "2024-03-15".to_string(),
            content: String::new(),
        };
        let err = input.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "content", .. }));
    }
}
