//! # sqldemo-core
//!
//! Read-only access to a pre-packaged SQLite database of emails.
//!
//! This library provides:
//! - The [`Email`] record type
//! - A lazily opened, process-wide [`Store`] seeded from a bundled file
//! - [`EmailRepository`] for reading every record
//! - [`LoadTask`], an owned background load for hosts
//! - Configuration and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqldemo_core::{Config, Store};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = Store::instance(&config.store_context()).expect("failed to open store");
//! let emails = store.email_dao().get_all().expect("failed to read emails");
//! println!("{} email(s)", emails.len());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{EmailRepository, Store, StoreCell, StoreContext};
pub use error::{Error, ErrorKind, Result};
pub use task::{LoadOutcome, LoadTask};
pub use types::*;

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod task;
pub mod types;
