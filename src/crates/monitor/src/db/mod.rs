//! Database layer: attempt store and IP block list
//!
//! The store owns all persistent state. Schema initialization failure at
//! startup is fatal; everything after that degrades per call site.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{DatabaseError, DbResult};
