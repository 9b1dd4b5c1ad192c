//! Database models for companies.

use crate::api::models::companies::{CompanyCreate, CompanyUpdate};
use crate::types::CompanyId;

/// Database request for creating a new company
#[derive(Debug, Clone)]
pub struct CompanyCreateDBRequest {
    pub name: String,
}

impl CompanyCreateDBRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<CompanyCreate> for CompanyCreateDBRequest {
    fn from(api: CompanyCreate) -> Self {
        Self {
            name: api.name.unwrap_or_default(),
        }
    }
}

/// Database request for updating a company. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdateDBRequest {
    pub name: Option<String>,
}

impl From<CompanyUpdate> for CompanyUpdateDBRequest {
    fn from(api: CompanyUpdate) -> Self {
        Self { name: api.name }
    }
}

/// Database response for a company row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CompanyDBResponse {
    pub id: CompanyId,
    pub name: String,
}
