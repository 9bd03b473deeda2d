use blog_core::db::migrations::latest_version;
use blog_core::db::{open_db, open_db_in_memory};
use blog_core::{SqlitePostStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_posts_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "posts");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO posts VALUES ('keep', 't', 1, 'a', 'e', '', '', '', '');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM posts;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn existing_unversioned_posts_table_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_posts.sql"))
        .unwrap();
    conn.execute(
        "INSERT INTO posts VALUES ('old', 't', 1, 'a', 'e', '', '', '', '');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let title: String = conn
        .query_row("SELECT title FROM posts WHERE identifier = 'old';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(title, "t");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_posts_table_is_rejected_without_stamping_a_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy-java.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE posts (UUID string unique primary key,
            TITLE string, DATE integer, AUTHOR string, EMAIL string,
            QUOTE string, BODY string, QUOTE_H string, BODY_H string);",
    )
    .unwrap();
    drop(conn);

    let err = match SqlitePostStore::open(&path) {
        Err(err) => err,
        Ok(_) => panic!("expected schema mismatch error"),
    };
    assert!(
        matches!(
            err,
            StoreError::MissingRequiredColumn {
                table: "posts",
                column: "identifier"
            }
        ),
        "unexpected error: {err}"
    );

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 0);
    let legacy_columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('posts') WHERE name = 'UUID';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(legacy_columns, 1);
}

#[test]
fn failed_open_can_be_retried_after_the_table_is_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retry.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE posts (identifier TEXT PRIMARY KEY);")
        .unwrap();
    drop(conn);
    assert!(open_db(&path).is_err());

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("DROP TABLE posts;").unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
