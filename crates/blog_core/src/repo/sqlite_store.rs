//! Durable SQLite post store.
//!
//! # Responsibility
//! - Serve the `PostStore` contract from the `posts` table.
//! - Keep all SQL behind four parameterized statements.
//!
//! # Invariants
//! - The store owns its connection; statements are prepared once at
//!   construction and reused from the connection's statement cache.
//! - Writes are a single `INSERT OR REPLACE` keyed on `identifier`.
//! - Read paths reject malformed rows instead of skipping or masking them.

use crate::db::migrations::latest_version;
use crate::db::schema::{schema_version, verify_posts_table, POST_COLUMNS};
use crate::db::{open_db, open_db_in_memory};
use crate::model::post::{is_blank, BlogPost};
use crate::repo::ordering::sort_posts;
use crate::repo::post_store::{PostStore, StoreError, StoreResult};
use crate::repo::writer::PostWriter;
use log::{debug, error, info};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::Duration;

const BACKEND: &str = "sqlite";

const INSERT_OR_REPLACE_SQL: &str = "INSERT OR REPLACE INTO posts (
    identifier,
    title,
    publish_timestamp,
    author,
    author_email,
    pull_quote_markdown,
    body_markdown,
    pull_quote_html,
    body_html
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);";

const DELETE_SQL: &str = "DELETE FROM posts WHERE identifier = ?1;";

const SELECT_ONE_SQL: &str = "SELECT
    identifier,
    title,
    publish_timestamp,
    author,
    author_email,
    pull_quote_markdown,
    body_markdown,
    pull_quote_html,
    body_html
FROM posts
WHERE identifier = ?1;";

const SELECT_ALL_SQL: &str = "SELECT
    identifier,
    title,
    publish_timestamp,
    author,
    author_email,
    pull_quote_markdown,
    body_markdown,
    pull_quote_html,
    body_html
FROM posts;";

/// SQLite-backed post store.
pub struct SqlitePostStore {
    conn: Connection,
    writer: PostWriter,
}

impl SqlitePostStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory database, discarded on drop.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what the statements expect.
    /// - `Sqlite` when a statement cannot be prepared.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        ensure_connection_ready(&conn)?;
        prepare_statements(&conn)?;
        info!("event=post_store_open module=repo backend={BACKEND} status=ok");

        Ok(Self {
            conn,
            writer: PostWriter::default(),
        })
    }

    /// Replaces the write-path collaborators.
    pub fn with_writer(mut self, writer: PostWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Bounds how long one statement may wait on a locked database.
    pub fn set_statement_timeout(&self, timeout: Duration) -> StoreResult<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Borrow of the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases cached statements and closes the connection.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| {
            error!(
                "event=post_store_close module=repo backend={BACKEND} status=error error={err}"
            );
            StoreError::from(err)
        })?;
        info!("event=post_store_close module=repo backend={BACKEND} status=ok");
        Ok(())
    }

    fn upsert(&self, post: &BlogPost) -> StoreResult<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_OR_REPLACE_SQL)?;
        stmt.execute(params![
            post.identifier.as_str(),
            post.title.as_str(),
            post.publish_timestamp,
            post.author.as_str(),
            post.author_email.as_str(),
            post.pull_quote_markdown.as_str(),
            post.body_markdown.as_str(),
            post.pull_quote_html.as_str(),
            post.body_html.as_str(),
        ])?;
        Ok(())
    }

    fn execute_delete(&self, identifier: &str) -> StoreResult<usize> {
        let mut stmt = self.conn.prepare_cached(DELETE_SQL)?;
        Ok(stmt.execute([identifier])?)
    }

    fn select_one(&self, identifier: &str) -> StoreResult<Option<BlogPost>> {
        let mut stmt = self.conn.prepare_cached(SELECT_ONE_SQL)?;
        let mut rows = stmt.query([identifier])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(row)?)),
            None => Ok(None),
        }
    }

    fn select_all(&self) -> StoreResult<Vec<BlogPost>> {
        let mut stmt = self.conn.prepare_cached(SELECT_ALL_SQL)?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }
}

impl PostStore for SqlitePostStore {
    fn store(&self, post: &BlogPost) -> StoreResult<String> {
        let prepared = self.writer.prepare(post);
        logged("post_store", self.upsert(&prepared))?;

        debug!(
            "event=post_store module=repo backend={BACKEND} status=ok identifier={}",
            prepared.identifier
        );
        Ok(prepared.identifier)
    }

    fn delete(&self, identifier: &str) -> StoreResult<()> {
        if is_blank(identifier) {
            return Ok(());
        }

        let removed = logged("post_delete", self.execute_delete(identifier))?;
        debug!(
            "event=post_delete module=repo backend={BACKEND} status=ok identifier={identifier} removed={}",
            removed > 0
        );
        Ok(())
    }

    fn get(&self, identifier: &str) -> StoreResult<Option<BlogPost>> {
        if is_blank(identifier) {
            return Ok(None);
        }
        logged("post_get", self.select_one(identifier))
    }

    fn get_all(&self) -> StoreResult<Vec<BlogPost>> {
        let mut posts = logged("post_list", self.select_all())?;
        sort_posts(&mut posts);
        Ok(posts)
    }
}

fn logged<T>(event: &'static str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        error!("event={event} module=repo backend={BACKEND} status=error error={err}");
    }
    result
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    verify_posts_table(conn)
}

fn prepare_statements(conn: &Connection) -> StoreResult<()> {
    for sql in [
        INSERT_OR_REPLACE_SQL,
        DELETE_SQL,
        SELECT_ONE_SQL,
        SELECT_ALL_SQL,
    ] {
        conn.prepare_cached(sql)?;
    }
    Ok(())
}

fn parse_post_row(row: &Row<'_>) -> StoreResult<BlogPost> {
    let post = BlogPost {
        identifier: column(row, 0)?,
        title: column(row, 1)?,
        publish_timestamp: column(row, 2)?,
        author: column(row, 3)?,
        author_email: column(row, 4)?,
        pull_quote_markdown: column(row, 5)?,
        body_markdown: column(row, 6)?,
        pull_quote_html: column(row, 7)?,
        body_html: column(row, 8)?,
    };

    if is_blank(&post.identifier) {
        return Err(StoreError::InvalidData(
            "blank identifier in posts.identifier".to_string(),
        ));
    }
    Ok(post)
}

fn column<T: FromSql>(row: &Row<'_>, index: usize) -> StoreResult<T> {
    row.get(index).map_err(|err| {
        StoreError::InvalidData(format!("posts.{}: {err}", POST_COLUMNS[index]))
    })
}
