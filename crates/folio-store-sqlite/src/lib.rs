//! SQLite backend for the Folio store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every operation is one unit of work
//! (see [`tx`]); the component modules below only ever see the open
//! transaction handed to them.

mod articles;
mod comments;
mod encode;
mod projection;
mod schema;
mod social;
mod store;
mod tags;
mod tx;
mod users;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
