use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields::{self, MAX_LONG_TEXT, MAX_NAME, MAX_TAG};
use super::gig::contains_ci;
use crate::error::ApiError;

/// Entry in a user's private crew contact book.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrewContact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub contact_user_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CrewContact {
    pub fn matches(&self, search: Option<&str>) -> bool {
        match search {
            Some(term) => {
                contains_ci(&self.name, term)
                    || self.role.as_deref().is_some_and(|r| contains_ci(r, term))
                    || self.email.as_deref().is_some_and(|e| contains_ci(e, term))
            }
            None => true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewContact {
    pub contact_user_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

impl NewContact {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            contact_user_id: self.contact_user_id,
            name: fields::required_text("name", &self.name, MAX_NAME)?,
            email: fields::optional_email("email", self.email.as_deref())?,
            phone: fields::optional_text("phone", self.phone.as_deref(), 50)?,
            role: fields::optional_text("role", self.role.as_deref(), MAX_TAG)?,
            notes: fields::optional_text("notes", self.notes.as_deref(), MAX_LONG_TEXT)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

impl ContactPatch {
    pub fn validate(self) -> Result<Self, ApiError> {
        let patch = Self {
            name: fields::patch_required("name", self.name.as_deref(), MAX_NAME)?,
            email: fields::patch_email("email", self.email.as_deref())?,
            phone: fields::patch_text("phone", self.phone.as_deref(), 50)?,
            role: fields::patch_text("role", self.role.as_deref(), MAX_TAG)?,
            notes: fields::patch_text("notes", self.notes.as_deref(), MAX_LONG_TEXT)?,
        };
        if patch.name.is_none()
            && patch.email.is_none()
            && patch.phone.is_none()
            && patch.role.is_none()
            && patch.notes.is_none()
        {
            return Err(ApiError::bad_request("No fields to update"));
        }
        Ok(patch)
    }
}
