use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields::{self, MAX_LONG_TEXT, MAX_NAME, MAX_SHORT_TEXT};
use crate::error::ApiError;

pub const MAX_ROLES: usize = 20;
pub const MAX_SKILLS: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /api/profile`. The whole profile is replaced.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl ProfileInput {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            display_name: fields::required_text("display_name", &self.display_name, MAX_NAME)?,
            bio: fields::optional_text("bio", self.bio.as_deref(), MAX_LONG_TEXT)?,
            location: fields::optional_text("location", self.location.as_deref(), MAX_SHORT_TEXT)?,
            avatar_url: fields::optional_url("avatar_url", self.avatar_url.as_deref())?,
            website: fields::optional_url("website", self.website.as_deref())?,
            skills: fields::tag_list("skills", &self.skills, MAX_SKILLS)?,
        })
    }
}

/// Body of `PUT /api/profile/roles`.
#[derive(Debug, Deserialize)]
pub struct RolesInput {
    pub roles: Vec<String>,
}

impl RolesInput {
    pub fn validate(self) -> Result<Vec<String>, ApiError> {
        fields::tag_list("roles", &self.roles, MAX_ROLES)
    }
}

/// Body of `POST /api/profile/roles`.
#[derive(Debug, Deserialize)]
pub struct RoleInput {
    #[serde(default)]
    pub role: String,
}

impl RoleInput {
    pub fn validate(self) -> Result<String, ApiError> {
        fields::required_text("role", &self.role, fields::MAX_TAG)
    }
}

/// Profile as shown to other users.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub roles: Vec<String>,
}
