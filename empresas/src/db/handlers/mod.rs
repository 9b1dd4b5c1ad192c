//! Repository implementations for database access.
//!
//! This module provides repository structs for each entity in the system.
//! Repositories follow a consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns row models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Companies`]: Companies and removal of partners from their collection
//! - [`Partners`]: Partners, optionally scoped to one company
//!
//! # Common Pattern
//!
//! ```ignore
//! use empresas::db::handlers::{Companies, Repository};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Companies::new(&mut tx);
//!
//!     let company = repo.create(&CompanyCreateDBRequest::new("Acme")).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod companies;
pub mod partners;
pub mod repository;

pub use companies::Companies;
pub use partners::Partners;
pub use repository::Repository;
