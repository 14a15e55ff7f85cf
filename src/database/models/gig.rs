use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields::{self, MAX_LONG_TEXT, MAX_SHORT_TEXT, MAX_TAG, MAX_TITLE};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gig_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Open,
    Filled,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gig {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub pay_rate: Option<String>,
    pub gig_date: Option<NaiveDate>,
    pub status: GigStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/gigs`.
#[derive(Debug, Default, Deserialize)]
pub struct NewGig {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub pay_rate: Option<String>,
    pub gig_date: Option<NaiveDate>,
    pub status: Option<GigStatus>,
}

impl NewGig {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            title: fields::required_text("title", &self.title, MAX_TITLE)?,
            description: fields::optional_text("description", self.description.as_deref(), MAX_LONG_TEXT)?,
            location: fields::optional_text("location", self.location.as_deref(), MAX_SHORT_TEXT)?,
            role: fields::optional_text("role", self.role.as_deref(), MAX_TAG)?,
            pay_rate: fields::optional_text("pay_rate", self.pay_rate.as_deref(), MAX_SHORT_TEXT)?,
            gig_date: self.gig_date,
            status: Some(self.status.unwrap_or(GigStatus::Open)),
        })
    }
}

/// Body of `PATCH /api/gigs/:id`. Blank strings clear optional columns.
#[derive(Debug, Default, Deserialize)]
pub struct GigPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub pay_rate: Option<String>,
    pub gig_date: Option<NaiveDate>,
    pub status: Option<GigStatus>,
}

impl GigPatch {
    pub fn validate(self) -> Result<Self, ApiError> {
        let patch = Self {
            title: fields::patch_required("title", self.title.as_deref(), MAX_TITLE)?,
            description: fields::patch_text("description", self.description.as_deref(), MAX_LONG_TEXT)?,
            location: fields::patch_text("location", self.location.as_deref(), MAX_SHORT_TEXT)?,
            role: fields::patch_text("role", self.role.as_deref(), MAX_TAG)?,
            pay_rate: fields::patch_text("pay_rate", self.pay_rate.as_deref(), MAX_SHORT_TEXT)?,
            gig_date: self.gig_date,
            status: self.status,
        };
        if patch.is_empty() {
            return Err(ApiError::bad_request("No fields to update"));
        }
        Ok(patch)
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.role.is_none()
            && self.pay_rate.is_none()
            && self.gig_date.is_none()
            && self.status.is_none()
    }
}

/// Filters accepted by `GET /api/gigs`.
#[derive(Debug, Default, Clone)]
pub struct GigFilter {
    pub search: Option<String>,
    pub status: Option<GigStatus>,
    pub role: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl GigFilter {
    pub fn matches(&self, gig: &Gig) -> bool {
        if let Some(status) = self.status {
            if gig.status != status {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if gig.owner_id != owner_id {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if !gig.role.as_deref().is_some_and(|r| fields::same_tag(r, role)) {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                contains_ci(&gig.title, term)
                    || gig.description.as_deref().is_some_and(|d| contains_ci(d, term))
                    || gig.location.as_deref().is_some_and(|l| contains_ci(l, term))
            }
            None => true,
        }
    }
}

/// Case-insensitive substring match, the in-memory counterpart of `ILIKE '%term%'`.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_gig_defaults_to_open() {
        let gig = NewGig {
            title: "Boom op".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(gig.status, Some(GigStatus::Open));
    }

    #[test]
    fn empty_patch_rejected() {
        let err = GigPatch::default().validate().unwrap_err();
        assert_eq!(err.message(), "No fields to update");
    }

    #[test]
    fn blank_title_patch_rejected() {
        let patch = GigPatch {
            title: Some(" ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(GigStatus::Filled).unwrap(), "filled");
    }
}
