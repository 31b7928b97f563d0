//! Core types and trait definitions for Folio, a publishing backend where
//! users write tagged articles, favorite them, and follow each other.
//!
//! Nothing here touches HTTP or a database.
//! Storage backends implement [`store::ConduitStore`]; the API layer depends
//! on that abstraction only.

pub mod article;
pub mod comment;
pub mod error;
pub mod patch;
pub mod projection;
pub mod slug;
pub mod store;
pub mod user;
pub mod viewer;

pub use error::{Error, Result};
pub use patch::Patch;
pub use viewer::Viewer;
