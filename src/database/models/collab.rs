use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields::{self, MAX_LONG_TEXT, MAX_SHORT_TEXT, MAX_TAG, MAX_TITLE};
use super::gig::contains_ci;
use crate::error::ApiError;

pub const MAX_ROLES_NEEDED: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "collab_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CollabStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollabPost {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub project_type: Option<String>,
    pub roles_needed: Vec<String>,
    pub status: CollabStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Collaborator {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub role: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// `GET /api/collab/:id` payload.
#[derive(Debug, Serialize)]
pub struct CollabPostDetail {
    #[serde(flatten)]
    pub post: CollabPost,
    pub collaborators: Vec<Collaborator>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewCollabPost {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub project_type: Option<String>,
    #[serde(default)]
    pub roles_needed: Vec<String>,
}

impl NewCollabPost {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            title: fields::required_text("title", &self.title, MAX_TITLE)?,
            description: fields::optional_text("description", self.description.as_deref(), MAX_LONG_TEXT)?,
            project_type: fields::optional_text("project_type", self.project_type.as_deref(), MAX_SHORT_TEXT)?,
            roles_needed: fields::tag_list("roles_needed", &self.roles_needed, MAX_ROLES_NEEDED)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CollabPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
    pub roles_needed: Option<Vec<String>>,
    pub status: Option<CollabStatus>,
}

impl CollabPatch {
    pub fn validate(self) -> Result<Self, ApiError> {
        let patch = Self {
            title: fields::patch_required("title", self.title.as_deref(), MAX_TITLE)?,
            description: fields::patch_text("description", self.description.as_deref(), MAX_LONG_TEXT)?,
            project_type: fields::patch_text("project_type", self.project_type.as_deref(), MAX_SHORT_TEXT)?,
            roles_needed: self
                .roles_needed
                .as_deref()
                .map(|roles| fields::tag_list("roles_needed", roles, MAX_ROLES_NEEDED))
                .transpose()?,
            status: self.status,
        };
        if patch.title.is_none()
            && patch.description.is_none()
            && patch.project_type.is_none()
            && patch.roles_needed.is_none()
            && patch.status.is_none()
        {
            return Err(ApiError::bad_request("No fields to update"));
        }
        Ok(patch)
    }
}

/// Body of `POST /api/collab/:id/collaborators`; the body itself is optional.
#[derive(Debug, Default, Deserialize)]
pub struct JoinCollab {
    pub role: Option<String>,
}

impl JoinCollab {
    pub fn validate(self) -> Result<Option<String>, ApiError> {
        fields::optional_text("role", self.role.as_deref(), MAX_TAG)
    }
}

#[derive(Debug, Default, Clone)]
pub struct CollabFilter {
    pub search: Option<String>,
    pub status: Option<CollabStatus>,
    pub owner_id: Option<Uuid>,
}

impl CollabFilter {
    pub fn matches(&self, post: &CollabPost) -> bool {
        if self.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if self.owner_id.is_some_and(|o| o != post.owner_id) {
            return false;
        }
        match &self.search {
            Some(term) => {
                contains_ci(&post.title, term)
                    || post.description.as_deref().is_some_and(|d| contains_ci(d, term))
                    || post.roles_needed.iter().any(|r| contains_ci(r, term))
            }
            None => true,
        }
    }
}
