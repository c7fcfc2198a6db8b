//! Blog post and comment domain models.
//!
//! # Responsibility
//! - Define the post record with its draft/published lifecycle.
//! - Define moderated comments attached to a post.
//!
//! # Invariants
//! - A post is public only once `published_at` is set.
//! - Comments start unapproved and become visible through `approve`.

use crate::model::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a blog post.
pub type PostId = Uuid;
/// Stable identifier for a comment.
pub type CommentId = Uuid;

/// A blog post with an explicit publish step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Stable global ID.
    pub uuid: PostId,
    /// Post author.
    pub author: String,
    /// Post headline.
    pub title: String,
    /// Full body text.
    pub body: String,
    /// Derived plain-text summary for list display (nullable).
    pub summary: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the post is published; `None` means draft.
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Creates a draft post with a generated stable ID.
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            author: author.into(),
            title: title.into(),
            body: body.into(),
            summary: None,
            created_at: Utc::now(),
            published_at: None,
        }
    }

    /// Publishes this post for public display, stamped now.
    pub fn publish(&mut self) {
        self.publish_at(Utc::now());
    }

    /// Publishes this post with an explicit timestamp.
    pub fn publish_at(&mut self, at: DateTime<Utc>) {
        self.published_at = Some(at);
    }

    /// Whether the post is publicly visible.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Checks post field invariants.
    ///
    /// # Errors
    /// Rejects nil uuid and blank author/title.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.uuid.is_nil() {
            return Err(ValidationError::NilUuid);
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::BlankField {
                model: "post",
                field: "author",
            });
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankField {
                model: "post",
                field: "title",
            });
        }
        Ok(())
    }
}

/// A reader comment on a post, hidden until approved by moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Stable global ID.
    pub uuid: CommentId,
    /// Post this comment belongs to.
    pub post_uuid: PostId,
    /// Commenter name; free text, registration is not required.
    pub author: String,
    /// Comment text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Moderation state; only approved comments are publicly listed.
    pub approved: bool,
}

impl Comment {
    /// Creates an unapproved comment on `post_uuid`.
    pub fn new(
        post_uuid: PostId,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            post_uuid,
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
            approved: false,
        }
    }

    /// Marks the comment as approved for public display.
    pub fn approve(&mut self) {
        self.approved = true;
    }

    /// Checks comment field invariants.
    ///
    /// # Errors
    /// Rejects nil uuids and blank author/body.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.uuid.is_nil() || self.post_uuid.is_nil() {
            return Err(ValidationError::NilUuid);
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::BlankField {
                model: "comment",
                field: "author",
            });
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::BlankField {
                model: "comment",
                field: "body",
            });
        }
        Ok(())
    }
}
