//! Database layer for sqldemo
//!
//! - Seed installation and the process-wide store handle
//! - Schema mapping checked when the store opens
//! - Read-only repository for emails

pub mod repo;
pub mod schema;
pub mod store;

pub use repo::EmailRepository;
pub use store::{Store, StoreCell, StoreContext};
