//! Versioned installation of the post schema.
//!
//! Each step runs its script, then checks the resulting table shape, and
//! only then stamps its version. All pending steps share one transaction, so
//! a `posts` table left behind by some other program (which `IF NOT EXISTS`
//! would silently keep) fails the check and leaves the file untouched.

use crate::db::schema::{schema_version, stamp_schema_version, verify_posts_table};
use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    script: &'static str,
    verify: fn(&Connection) -> StoreResult<()>,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    script: include_str!("0001_posts.sql"),
    verify: verify_posts_table,
}];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings the schema on `conn` up to `latest_version`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file comes from a newer build.
/// - `MissingRequiredTable` / `MissingRequiredColumn` when a step leaves a
///   table that does not match the post columns; nothing is committed.
/// - `Sqlite` when a script fails; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    // Dropping `tx` on any early return rolls every step back.
    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.script)?;
        (step.verify)(&tx)?;
        stamp_schema_version(&tx, step.version)?;
    }
    tx.commit()?;
    Ok(())
}
