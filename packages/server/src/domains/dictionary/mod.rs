//! Dictionary content store.
//!
//! Typed accessors over the dictionary tables. Everything that writes takes a
//! `&mut PgConnection` so callers can run it inside their own transaction.

pub mod models;

pub use models::*;
