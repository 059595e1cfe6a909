//! Process-wide store handle
//!
//! The working database is a copy of the bundled seed, made the first time
//! the store is opened and reused afterwards. One [`Store`] exists per
//! [`StoreCell`]; the crate keeps a single static cell behind
//! [`Store::instance`].

use super::repo::EmailRepository;
use super::schema;
use crate::error::{Error, Result};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Where the seed comes from and where its working copy goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    seed_path: PathBuf,
    database_path: PathBuf,
    reinstall: bool,
}

impl StoreContext {
    pub fn new(seed_path: impl Into<PathBuf>, database_path: impl Into<PathBuf>) -> Self {
        Self {
            seed_path: seed_path.into(),
            database_path: database_path.into(),
            reinstall: false,
        }
    }

    /// Discard any existing working copy and install the seed again on open.
    ///
    /// This is the recovery path after an initialization error caused by a
    /// damaged or stale working copy. It has no effect on a store that is
    /// already open.
    pub fn reinstalling(mut self) -> Self {
        self.reinstall = true;
        self
    }

    pub fn reinstall(&self) -> bool {
        self.reinstall
    }

    pub fn seed_path(&self) -> &Path {
        &self.seed_path
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

/// Read-only handle to the working email database.
pub struct Store {
    conn: Mutex<Connection>,
    path: PathBuf,
    seeded: bool,
}

static STORE: StoreCell = StoreCell::new();

impl Store {
    /// Return the process-wide store, opening it on first use.
    ///
    /// The context is only consulted by the call that actually opens the
    /// store; once a handle exists it is returned as-is.
    pub fn instance(ctx: &StoreContext) -> Result<&'static Store> {
        STORE.get_or_open(ctx)
    }

    pub(crate) fn global() -> &'static StoreCell {
        &STORE
    }

    /// Install the seed if needed, then open and verify the working copy.
    pub(crate) fn open(ctx: &StoreContext) -> Result<Self> {
        let path = ctx.database_path();

        if ctx.reinstall() && path.exists() {
            // Keep the old copy unless there is a seed to replace it with
            if !ctx.seed_path().is_file() {
                return Err(Error::SeedMissing {
                    path: ctx.seed_path().to_path_buf(),
                });
            }
            fs::remove_file(path).map_err(|source| Error::Install {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), "Discarded working copy for reinstall");
        }

        let seeded = !path.exists();
        if seeded {
            install_seed(ctx.seed_path(), path)?;
        }

        let conn = match open_verified(path) {
            Ok(conn) => conn,
            Err(e) => {
                // Drop a copy we just made so the next attempt starts from the seed again
                if seeded {
                    if let Err(rm) = fs::remove_file(path) {
                        tracing::warn!(path = %path.display(), error = %rm, "Failed to remove rejected working copy");
                    }
                }
                return Err(e);
            }
        };

        tracing::info!(path = %path.display(), seeded, "Store opened");

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            seeded,
        })
    }

    /// Accessor for the read-only email queries.
    pub fn email_dao(&self) -> EmailRepository<'_> {
        EmailRepository::new(self)
    }

    /// Path of the working database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether opening this store copied the seed into place
    pub fn seeded(&self) -> bool {
        self.seeded
    }

    /// The connection is never written through, so a poisoned lock still
    /// guards a consistent handle.
    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

/// Lazily opened [`Store`] slot with at-most-once construction.
///
/// Readers check the slot without locking; the first caller to find it
/// empty takes `init`, checks again, and only then opens the store. A failed
/// open leaves the slot empty so a later call can retry.
pub struct StoreCell {
    instance: OnceLock<Store>,
    init: Mutex<()>,
    opened: AtomicUsize,
}

impl StoreCell {
    pub const fn new() -> Self {
        Self {
            instance: OnceLock::new(),
            init: Mutex::new(()),
            opened: AtomicUsize::new(0),
        }
    }

    pub fn get_or_open(&self, ctx: &StoreContext) -> Result<&Store> {
        if let Some(store) = self.instance.get() {
            return Ok(store);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = self.instance.get() {
            return Ok(store);
        }

        let store = Store::open(ctx)?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.instance.get_or_init(|| store))
    }

    /// The store, if it has been opened
    pub fn get(&self) -> Option<&Store> {
        self.instance.get()
    }

    /// Number of stores this cell has constructed (0 or 1)
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Default for StoreCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy the seed next to `target` and rename it into place.
fn install_seed(seed: &Path, target: &Path) -> Result<()> {
    if !seed.is_file() {
        return Err(Error::SeedMissing {
            path: seed.to_path_buf(),
        });
    }

    let install_err = |source: std::io::Error| Error::Install {
        path: target.to_path_buf(),
        source,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(install_err)?;
    }

    let temp_path = temp_path_for(target);
    if let Err(e) = fs::copy(seed, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(install_err(e));
    }
    fs::rename(&temp_path, target).map_err(install_err)?;

    tracing::info!(
        seed = %seed.display(),
        target = %target.display(),
        "Seed database installed"
    );
    Ok(())
}

/// `<target>.tmp`, keeping any extension the target already has.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

fn open_verified(path: &Path) -> Result<Connection> {
    let open_err = |source: rusqlite::Error| Error::Open {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(open_err)?;

    schema::verify_schema(&conn).map_err(|e| match e {
        Error::Database(source) => open_err(source),
        other => other,
    })?;

    Ok(conn)
}
