use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields::{self, MAX_LONG_TEXT};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Tentative,
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Availability {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AvailabilityStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    /// True when the entry overlaps the inclusive `[from, to]` window.
    pub fn overlaps(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        from.map_or(true, |from| self.end_date >= from) && to.map_or(true, |to| self.start_date <= to)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAvailability {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<AvailabilityStatus>,
    pub note: Option<String>,
}

impl NewAvailability {
    pub fn validate(self) -> Result<Self, ApiError> {
        check_range(self.start_date, self.end_date)?;
        Ok(Self {
            start_date: self.start_date,
            end_date: self.end_date,
            status: Some(self.status.unwrap_or(AvailabilityStatus::Available)),
            note: fields::optional_text("note", self.note.as_deref(), MAX_LONG_TEXT)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AvailabilityStatus>,
    pub note: Option<String>,
}

impl AvailabilityPatch {
    pub fn validate(self) -> Result<Self, ApiError> {
        if self.start_date.is_none() && self.end_date.is_none() && self.status.is_none() && self.note.is_none() {
            return Err(ApiError::bad_request("No fields to update"));
        }
        Ok(Self {
            note: fields::patch_text("note", self.note.as_deref(), MAX_LONG_TEXT)?,
            ..self
        })
    }

    /// The date range after applying this patch must still be ordered.
    pub fn check_against(&self, current: &Availability) -> Result<(), ApiError> {
        check_range(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

/// `from`/`to` window on `GET /api/availability`.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AvailabilityWindow {
    pub fn validate(self) -> Result<Self, ApiError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                return Err(ApiError::invalid_field("to", "must not be before 'from'"));
            }
        }
        Ok(self)
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if end < start {
        return Err(ApiError::invalid_field("end_date", "must not be before start_date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reversed_range_rejected() {
        let input = NewAvailability {
            start_date: date("2026-03-10"),
            end_date: date("2026-03-01"),
            status: None,
            note: None,
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.message(), "Invalid field 'end_date': must not be before start_date");
    }

    #[test]
    fn single_day_allowed_and_defaults_available() {
        let input = NewAvailability {
            start_date: date("2026-03-10"),
            end_date: date("2026-03-10"),
            status: None,
            note: Some("  ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.status, Some(AvailabilityStatus::Available));
        assert_eq!(input.note, None);
    }

    #[test]
    fn overlap_window() {
        let entry = Availability {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_date: date("2026-03-05"),
            end_date: date("2026-03-08"),
            status: AvailabilityStatus::Busy,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(entry.overlaps(None, None));
        assert!(entry.overlaps(Some(date("2026-03-08")), None));
        assert!(!entry.overlaps(Some(date("2026-03-09")), None));
        assert!(!entry.overlaps(None, Some(date("2026-03-04"))));
    }
}
