//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each response struct matches a table row and derives `sqlx::FromRow`
//! - **Separation**: Database models are distinct from API models, so the Portuguese wire
//!   names (`nome`, `socios`, `empresa`) never leak into storage
//! - **No back-pointers**: a partner refers to its company through `company_id` only; the
//!   company's partner collection is loaded on demand
//!
//! # Models
//!
//! - [`companies`]: Companies (empresas)
//! - [`partners`]: Partners (socios), each owned by exactly one company
//!
//! # Conversion to API Models
//!
//! ```ignore
//! use empresas::db::models::companies::CompanyDBResponse;
//! use empresas::api::models::companies::CompanySummary;
//!
//! let row: CompanyDBResponse = /* ... */;
//! let summary: CompanySummary = row.into();
//! ```

pub mod companies;
pub mod partners;
