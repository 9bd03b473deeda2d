//! Shape of the `posts` table and the version stamp that vouches for it.

use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;

pub const POSTS_TABLE: &str = "posts";

/// Columns in declaration order; statements bind and rows parse in this order.
pub const POST_COLUMNS: [&str; 9] = [
    "identifier",
    "title",
    "publish_timestamp",
    "author",
    "author_email",
    "pull_quote_markdown",
    "body_markdown",
    "pull_quote_html",
    "body_html",
];

/// Reads the schema version stamped in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

pub(crate) fn stamp_schema_version(conn: &Connection, version: u32) -> StoreResult<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    Ok(())
}

/// Fails unless `posts` exists and carries every column in `POST_COLUMNS`.
///
/// Extra columns are tolerated; the store never selects `*`.
pub fn verify_posts_table(conn: &Connection) -> StoreResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [POSTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(StoreError::MissingRequiredTable(POSTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([POSTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    match POST_COLUMNS
        .into_iter()
        .find(|column| !present.iter().any(|name| name == column))
    {
        Some(column) => Err(StoreError::MissingRequiredColumn {
            table: POSTS_TABLE,
            column,
        }),
        None => Ok(()),
    }
}
