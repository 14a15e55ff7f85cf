use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::fields;
use crate::error::ApiError;

pub const MAX_SLATE_CONTENT: usize = 2000;

/// Slate post with like totals computed for the viewer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlatePost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by_me: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlateLike {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewSlatePost {
    #[serde(default)]
    pub content: String,
    pub media_url: Option<String>,
}

impl NewSlatePost {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            content: fields::required_text("content", &self.content, MAX_SLATE_CONTENT)?,
            media_url: fields::optional_url("media_url", self.media_url.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SlateQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub author_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_capped() {
        let post = NewSlatePost {
            content: "x".repeat(MAX_SLATE_CONTENT + 1),
            media_url: None,
        };
        assert!(post.validate().is_err());
    }

    #[test]
    fn media_url_must_be_http() {
        let post = NewSlatePost {
            content: "Wrapped day 3".into(),
            media_url: Some("file:///tmp/still.jpg".into()),
        };
        assert!(post.validate().is_err());
    }
}
