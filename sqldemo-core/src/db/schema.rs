//! Email table schema
//!
//! The seed database is authored out-of-band and never migrated. Instead of
//! trusting it, the store checks the live table against [`EMAIL_COLUMNS`]
//! when it opens.

use crate::error::{Error, Result};
use crate::types::Email;
use rusqlite::{params, Connection};
use std::path::Path;

/// Table holding the seeded records
pub const EMAIL_TABLE: &str = "email";

/// DDL used when authoring a seed file
pub const SEED_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS email (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        subject          TEXT,
        sender           TEXT,
        folder           TEXT,
        starred          BOOLEAN,
        read             BOOLEAN,
        received         INTEGER
    );
"#;

/// Field-to-column correspondence for [`Email`].
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Struct field name
    pub field: &'static str,
    /// Column name in `email`
    pub column: &'static str,
    /// Declared SQL types accepted for the column (case-insensitive)
    pub declared: &'static [&'static str],
    pub primary_key: bool,
}

const fn column(
    field: &'static str,
    declared: &'static [&'static str],
    primary_key: bool,
) -> ColumnSpec {
    ColumnSpec {
        field,
        column: field,
        declared,
        primary_key,
    }
}

/// Expected shape of the `email` table.
///
/// Booleans accept `INTEGER` too since some tools write them that way.
pub const EMAIL_COLUMNS: &[ColumnSpec] = &[
    column("id", &["INTEGER"], true),
    column("subject", &["TEXT"], false),
    column("sender", &["TEXT"], false),
    column("folder", &["TEXT"], false),
    column("starred", &["BOOLEAN", "INTEGER"], false),
    column("read", &["BOOLEAN", "INTEGER"], false),
    column("received", &["INTEGER"], false),
];

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug)]
struct LiveColumn {
    name: String,
    declared: String,
    pk: bool,
}

fn live_columns(conn: &Connection, table: &str) -> Result<Vec<LiveColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(LiveColumn {
                name: row.get(1)?,
                declared: row.get(2)?,
                pk: row.get::<_, i64>(5)? > 0,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// Check the `email` table against [`EMAIL_COLUMNS`].
///
/// Extra columns are tolerated; missing ones, unexpected declared types and a
/// non-key `id` are reported as [`Error::SchemaMismatch`]. Errors from SQLite
/// itself (e.g. the file is not a database) come back as [`Error::Database`].
pub fn verify_schema(conn: &Connection) -> Result<()> {
    let live = live_columns(conn, EMAIL_TABLE)?;
    if live.is_empty() {
        return Err(Error::SchemaMismatch(format!(
            "table `{}` not found",
            EMAIL_TABLE
        )));
    }

    for expected in EMAIL_COLUMNS {
        let Some(found) = live.iter().find(|c| c.name == expected.column) else {
            return Err(Error::SchemaMismatch(format!(
                "missing column `{}` for field `{}`",
                expected.column, expected.field
            )));
        };

        if !expected
            .declared
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&found.declared))
        {
            return Err(Error::SchemaMismatch(format!(
                "column `{}` declared as `{}`, expected one of {:?}",
                expected.column, found.declared, expected.declared
            )));
        }

        if expected.primary_key && !found.pk {
            return Err(Error::SchemaMismatch(format!(
                "column `{}` must be the primary key",
                expected.column
            )));
        }
    }

    tracing::debug!(columns = live.len(), "Email schema verified");
    Ok(())
}

/// Author a seed database at `path` containing `emails`.
///
/// Ids are written as given. Intended for building the bundled asset and
/// test fixtures; the store itself never writes.
pub fn create_seed(path: &Path, emails: &[Email]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch(SEED_SCHEMA)?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO email (id, subject, sender, folder, starred, read, received)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;
        for email in emails {
            stmt.execute(params![
                email.id,
                email.subject,
                email.sender,
                email.folder,
                email.starred,
                email.read,
                email.received,
            ])?;
        }
    }
    tx.commit()?;

    tracing::info!(path = %path.display(), count = emails.len(), "Seed database written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_schema_verifies() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SEED_SCHEMA).unwrap();
        verify_schema(&conn).unwrap();
    }

    #[test]
    fn test_integer_booleans_accepted() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE email (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                subject TEXT NOT NULL,
                sender TEXT NOT NULL,
                folder TEXT NOT NULL,
                starred INTEGER NOT NULL,
                read INTEGER NOT NULL,
                received INTEGER NOT NULL
            )",
        )
        .unwrap();
        verify_schema(&conn).unwrap();
    }

    #[test]
    fn test_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(ref m) if m.contains("not found")));
    }

    #[test]
    fn test_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE email (
                id INTEGER PRIMARY KEY,
                subject TEXT,
                sender TEXT,
                folder TEXT,
                starred BOOLEAN,
                received INTEGER
            )",
        )
        .unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(ref m) if m.contains("`read`")));
    }

    #[test]
    fn test_wrong_type_and_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE email (
                id INTEGER PRIMARY KEY,
                subject TEXT,
                sender TEXT,
                folder TEXT,
                starred BOOLEAN,
                read BOOLEAN,
                received TEXT
            )",
        )
        .unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(ref m) if m.contains("received")));

        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE email (
                id INTEGER,
                subject TEXT,
                sender TEXT,
                folder TEXT,
                starred BOOLEAN,
                read BOOLEAN,
                received INTEGER
            )",
        )
        .unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(ref m) if m.contains("primary key")));
    }

    #[test]
    fn test_create_seed_writes_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("assets/database/Email.db");
        let emails = vec![Email {
            id: 7,
            subject: "Lunch?".to_string(),
            sender: "c@x.com".to_string(),
            folder: "Inbox".to_string(),
            starred: true,
            read: false,
            received: 42,
        }];

        create_seed(&path, &emails).unwrap();

        let conn = Connection::open(&path).unwrap();
        verify_schema(&conn).unwrap();
        let (id, starred): (i64, bool) = conn
            .query_row("SELECT id, starred FROM email", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(id, 7);
        assert!(starred);
    }
}
