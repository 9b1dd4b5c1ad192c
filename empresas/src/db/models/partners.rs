//! Database models for partners.

use crate::api::models::partners::{PartnerCreate, PartnerUpdate};
use crate::types::{CompanyId, PartnerId};

/// Database request for creating a new partner under a company
#[derive(Debug, Clone)]
pub struct PartnerCreateDBRequest {
    pub company_id: CompanyId,
    pub name: String,
}

impl PartnerCreateDBRequest {
    pub fn new(company_id: CompanyId, create: PartnerCreate) -> Self {
        Self {
            company_id,
            name: create.name.unwrap_or_default(),
        }
    }
}

/// Database request for updating a partner. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PartnerUpdateDBRequest {
    pub name: Option<String>,
}

impl From<PartnerUpdate> for PartnerUpdateDBRequest {
    fn from(api: PartnerUpdate) -> Self {
        Self { name: api.name }
    }
}

/// Database response for a partner row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PartnerDBResponse {
    pub id: PartnerId,
    pub name: String,
    pub company_id: CompanyId,
}
