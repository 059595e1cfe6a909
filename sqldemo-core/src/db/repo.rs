//! Read-only query surface over the [`Store`]

use super::store::Store;
use crate::error::Result;
use crate::types::Email;
use rusqlite::Row;

/// Every column of every row, in storage order.
const SELECT_ALL: &str = "SELECT * FROM email";

/// Email queries bound to one store.
///
/// Only full reads exist. Calls block on file I/O, so run them away from
/// latency-sensitive threads (see [`crate::task::LoadTask`]).
#[derive(Debug, Clone, Copy)]
pub struct EmailRepository<'a> {
    store: &'a Store,
}

impl<'a> EmailRepository<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Fetch all emails.
    ///
    /// An empty table yields an empty vector.
    pub fn get_all(&self) -> Result<Vec<Email>> {
        let conn = self.store.connection();
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let emails = stmt
            .query_map([], Self::row_to_email)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = emails.len(), "Fetched all emails");
        Ok(emails)
    }

    fn row_to_email(row: &Row) -> rusqlite::Result<Email> {
        Ok(Email {
            id: row.get("id")?,
            subject: row.get("subject")?,
            sender: row.get("sender")?,
            folder: row.get("folder")?,
            starred: row.get("starred")?,
            read: row.get("read")?,
            received: row.get("received")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{schema, StoreContext};
    use crate::error::{Error, ErrorKind};
    use tempfile::TempDir;

    fn open_seeded(dir: &TempDir, emails: &[Email]) -> Store {
        let ctx = StoreContext::new(
            dir.path().join("Email.db"),
            dir.path().join("databases/app_database"),
        );
        schema::create_seed(ctx.seed_path(), emails).unwrap();
        Store::open(&ctx).unwrap()
    }

    #[test]
    fn test_get_all_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_seeded(&dir, &[]);

        let emails = store.email_dao().get_all().unwrap();
        assert!(emails.is_empty());
    }

    #[test]
    fn test_get_all_maps_columns() {
        let dir = TempDir::new().unwrap();
        let email = Email {
            id: 3,
            subject: "Quarterly report".to_string(),
            sender: "finance@x.com".to_string(),
            folder: "Archive".to_string(),
            starred: true,
            read: false,
            received: 1_700_000_000,
        };
        let store = open_seeded(&dir, std::slice::from_ref(&email));

        let emails = store.email_dao().get_all().unwrap();
        assert_eq!(emails, vec![email]);
    }

    #[test]
    fn test_null_value_is_query_error() {
        let dir = TempDir::new().unwrap();
        let seed = dir.path().join("Email.db");
        let conn = rusqlite::Connection::open(&seed).unwrap();
        conn.execute_batch(schema::SEED_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO email (subject, sender, folder, starred, read, received)
             VALUES (NULL, 'a@x.com', 'Inbox', 0, 0, 1)",
            [],
        )
        .unwrap();
        drop(conn);

        let ctx = StoreContext::new(&seed, dir.path().join("app_database"));
        let store = Store::open(&ctx).unwrap();

        let err = store.email_dao().get_all().unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(err.kind(), ErrorKind::Query);
    }
}
