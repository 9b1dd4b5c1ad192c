//! HTTP request handlers for the API endpoints.
//!
//! Each handler runs its reads and writes inside a single transaction. Entities named in the path
//! are resolved first, so a missing company or partner yields 404 before the request body is
//! looked at.

pub mod companies;
pub mod partners;
