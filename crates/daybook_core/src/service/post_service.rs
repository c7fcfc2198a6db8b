//! Blog use-case service.
//!
//! # Responsibility
//! - Provide post create/update/publish/list APIs.
//! - Derive the plain-text `summary` projection from post bodies.
//! - Run the comment moderation flow (add, approve, approved listing).
//!
//! # Invariants
//! - `update_post` uses full content replacement semantics and re-derives
//!   the summary.
//! - Comments enter unapproved; only `approve_comment` makes them public.

use crate::model::post::{Comment, CommentId, Post, PostId};
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::repo::RepoError;
use crate::service::summary::derive_text_summary;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for blog use-cases.
#[derive(Debug)]
pub enum BlogServiceError {
    /// Target post or comment does not exist.
    NotFound(PostId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BlogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "post or comment not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent blog state: {details}"),
        }
    }
}

impl Error for BlogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BlogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Blog service facade over repository implementations.
pub struct BlogService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> BlogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a draft post, deriving its summary from the body.
    pub fn create_post(
        &self,
        author: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Post, BlogServiceError> {
        let mut post = Post::new(author, title, body);
        post.summary = derive_text_summary(&post.body);

        let id = self.repo.create_post(&post)?;
        self.repo
            .get_post(id)?
            .ok_or(BlogServiceError::InconsistentState(
                "created post not found in read-back",
            ))
    }

    /// Replaces post content fully and re-derives the summary.
    pub fn update_post(&self, mut post: Post) -> Result<Post, BlogServiceError> {
        post.summary = derive_text_summary(&post.body);
        self.repo.update_post(&post)?;
        self.repo
            .get_post(post.uuid)?
            .ok_or(BlogServiceError::InconsistentState(
                "updated post not found in read-back",
            ))
    }

    /// Publishes a post for public display, stamped `at`.
    pub fn publish_post(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, BlogServiceError> {
        let mut post = self
            .repo
            .get_post(id)?
            .ok_or(BlogServiceError::NotFound(id))?;
        post.publish_at(at);
        self.repo.update_post(&post)?;
        Ok(post)
    }

    /// Gets one post by stable ID.
    pub fn post(&self, id: PostId) -> Result<Post, BlogServiceError> {
        self.repo
            .get_post(id)?
            .ok_or(BlogServiceError::NotFound(id))
    }

    /// Lists posts using filter and pagination options.
    pub fn list_posts(&self, query: &PostListQuery) -> Result<Vec<Post>, BlogServiceError> {
        let posts = self.repo.list_posts(query)?;
        Ok(posts)
    }

    /// Removes one post and, through the schema cascade, its comments.
    pub fn delete_post(&self, id: PostId) -> Result<(), BlogServiceError> {
        self.repo.delete_post(id)?;
        Ok(())
    }

    /// Adds an unapproved comment to a post.
    pub fn add_comment(
        &self,
        post: PostId,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Comment, BlogServiceError> {
        let comment = Comment::new(post, author, body);
        self.repo.add_comment(&comment)?;
        Ok(comment)
    }

    /// Approves one comment for public display.
    pub fn approve_comment(&self, id: CommentId) -> Result<(), BlogServiceError> {
        self.repo.approve_comment(id)?;
        Ok(())
    }

    /// Lists the comments on a post that have been approved.
    pub fn approved_comments(&self, post: PostId) -> Result<Vec<Comment>, BlogServiceError> {
        let comments = self.repo.list_comments(post, true)?;
        Ok(comments)
    }

    /// Lists all comments on a post, including unapproved ones (moderation).
    pub fn all_comments(&self, post: PostId) -> Result<Vec<Comment>, BlogServiceError> {
        let comments = self.repo.list_comments(post, false)?;
        Ok(comments)
    }

    /// Removes one comment outright.
    pub fn delete_comment(&self, id: CommentId) -> Result<(), BlogServiceError> {
        self.repo.delete_comment(id)?;
        Ok(())
    }
}
