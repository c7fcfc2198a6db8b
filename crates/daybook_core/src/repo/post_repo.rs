//! Blog post/comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `posts` and their moderated `comments`.
//! - Keep moderation filtering (`approved`) inside the query layer.
//!
//! # Invariants
//! - Post lists are ordered newest-first (`created_at DESC, uuid ASC`).
//! - Comment lists are ordered oldest-first, the reading order under a post.
//! - Deleting a post removes its comments via `ON DELETE CASCADE`.

use crate::model::post::{Comment, CommentId, Post, PostId};
use crate::repo::entry_repo::parse_timestamp_column;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    uuid,
    author,
    title,
    body,
    summary,
    created_at,
    published_at
FROM posts";

const COMMENT_SELECT_SQL: &str = "SELECT
    uuid,
    post_uuid,
    author,
    body,
    created_at,
    approved
FROM comments";

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Restrict to published posts.
    pub published_only: bool,
    /// Maximum rows to return.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for blog persistence.
pub trait PostRepository {
    fn create_post(&self, post: &Post) -> RepoResult<PostId>;
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
    fn add_comment(&self, comment: &Comment) -> RepoResult<CommentId>;
    fn approve_comment(&self, id: CommentId) -> RepoResult<()>;
    fn list_comments(&self, post: PostId, approved_only: bool) -> RepoResult<Vec<Comment>>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
}

/// SQLite-backed blog repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// Rejects connections without applied migrations or the blog tables.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["posts", "comments"])?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &Post) -> RepoResult<PostId> {
        post.validate()?;

        self.conn.execute(
            "INSERT INTO posts (
                uuid,
                author,
                title,
                body,
                summary,
                created_at,
                published_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                post.uuid.to_string(),
                post.author.as_str(),
                post.title.as_str(),
                post.body.as_str(),
                post.summary.as_deref(),
                post.created_at.timestamp_millis(),
                post.published_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        Ok(post.uuid)
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        post.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                author = ?2,
                title = ?3,
                body = ?4,
                summary = ?5,
                published_at = ?6
             WHERE uuid = ?1;",
            params![
                post.uuid.to_string(),
                post.author.as_str(),
                post.title.as_str(),
                post.body.as_str(),
                post.summary.as_deref(),
                post.published_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(post.uuid));
        }

        Ok(())
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if query.published_only {
            sql.push_str(" AND published_at IS NOT NULL");
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();

        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn add_comment(&self, comment: &Comment) -> RepoResult<CommentId> {
        comment.validate()?;

        let post_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE uuid = ?1);",
            [comment.post_uuid.to_string()],
            |row| row.get(0),
        )?;
        if post_exists == 0 {
            return Err(RepoError::NotFound(comment.post_uuid));
        }

        self.conn.execute(
            "INSERT INTO comments (
                uuid,
                post_uuid,
                author,
                body,
                created_at,
                approved
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                comment.uuid.to_string(),
                comment.post_uuid.to_string(),
                comment.author.as_str(),
                comment.body.as_str(),
                comment.created_at.timestamp_millis(),
                i64::from(comment.approved),
            ],
        )?;

        Ok(comment.uuid)
    }

    fn approve_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE comments SET approved = 1 WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_comments(&self, post: PostId, approved_only: bool) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE post_uuid = ?1
               AND (?2 = 0 OR approved = 1)
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query(params![post.to_string(), i64::from(approved_only)])?;
        let mut comments = Vec::new();

        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }

        Ok(comments)
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in posts.uuid"))
    })?;

    let created_ms: i64 = row.get("created_at")?;
    let created_at = parse_timestamp_column(created_ms, "posts.created_at")?;

    let published_at = match row.get::<_, Option<i64>>("published_at")? {
        Some(ms) => Some(parse_timestamp_column(ms, "posts.published_at")?),
        None => None,
    };

    let post = Post {
        uuid,
        author: row.get("author")?,
        title: row.get("title")?,
        body: row.get("body")?,
        summary: row.get("summary")?,
        created_at,
        published_at,
    };
    post.validate()?;
    Ok(post)
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in comments.uuid"))
    })?;

    let post_text: String = row.get("post_uuid")?;
    let post_uuid = Uuid::parse_str(&post_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{post_text}` in comments.post_uuid"
        ))
    })?;

    let approved = match row.get::<_, i64>("approved")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid approved value `{other}` in comments.approved"
            )));
        }
    };

    let created_ms: i64 = row.get("created_at")?;
    let created_at = parse_timestamp_column(created_ms, "comments.created_at")?;

    let comment = Comment {
        uuid,
        post_uuid,
        author: row.get("author")?,
        body: row.get("body")?,
        created_at,
        approved,
    };
    comment.validate()?;
    Ok(comment)
}
