//! Common type definitions.
//!
//! Entity IDs are SQLite `INTEGER PRIMARY KEY` values, aliased for readability:
//!
//! - [`CompanyId`]: Company (empresa) identifier
//! - [`PartnerId`]: Partner (socio) identifier

pub type CompanyId = i64;
pub type PartnerId = i64;
