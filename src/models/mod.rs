//! Domain models for opptrack.
//!
//! [`Opportunity`] is the aggregate root; [`Note`] and [`NextStep`] are its
//! children, removed with it on delete. Persisted rows serialize with the
//! PascalCase column names the SPA consumes; request bodies use camelCase.
//! Each input struct carries the field rules of the HTTP boundary via
//! [`Validate`].

mod note;
mod opportunity;
mod step;

pub use note::*;
pub use opportunity::*;
pub use step::*;

use crate::error::{Error, Result};

/// Field-rule check applied to a request body after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Required string: non-empty and at most `max` characters.
pub(crate) fn require(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid(field, "is required"));
    }
    bounded(field, value, max)
}

pub(crate) fn bounded(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::invalid(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

pub(crate) fn bounded_opt(field: &'static str, value: &Option<String>, max: usize) -> Result<()> {
    match value {
        Some(v) => bounded(field, v, max),
        None => Ok(()),
    }
}

/// Date token: exactly 10 characters in YYYY-MM-DD form.
pub(crate) fn date(field: &'static str, value: &str) -> Result<()> {
    if value.len() != 10 || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(Error::invalid(field, "must be a date in YYYY-MM-DD form"));
    }
    Ok(())
}

pub(crate) fn date_opt(field: &'static str, value: &Option<String>) -> Result<()> {
    match value {
        Some(v) => date(field, v),
        None => Ok(()),
    }
}
