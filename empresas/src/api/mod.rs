//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Companies** (`/api/empresas`, `/api/empresas/{id}`)
//! - **Partners** (`/api/empresas/{empresaId}/socios`, `/api/empresas/{empresaId}/socios/{id}`)
//!
//! Partner routes are always resolved within the company named in the path: a partner of
//! another company is reported as not found.

pub mod handlers;
pub mod models;
