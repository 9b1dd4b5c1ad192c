//! API request/response models for companies.

use super::partners::PartnerSummary;
use crate::db::models::companies::CompanyDBResponse;
use crate::db::models::partners::PartnerDBResponse;
use crate::types::CompanyId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a new company.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CompanyCreate {
    /// Company name (required, non-empty)
    #[serde(rename = "nome")]
    #[schema(example = "Empresa Exemplo", max_length = 255)]
    pub name: Option<String>,
}

/// Request body for updating a company. A missing or null `nome` leaves the name unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CompanyUpdate {
    /// New company name (null to keep unchanged)
    #[serde(rename = "nome")]
    #[schema(example = "Empresa Exemplo Atualizada", max_length = 255)]
    pub name: Option<String>,
}

/// Company as shown in listings and after writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanySummary {
    /// Unique identifier for the company
    #[schema(example = 1)]
    pub id: CompanyId,
    /// Company name
    #[serde(rename = "nome")]
    #[schema(example = "Empresa Exemplo")]
    pub name: String,
}

/// Company with its partners, ordered by partner id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyDetail {
    /// Unique identifier for the company
    #[schema(example = 1)]
    pub id: CompanyId,
    /// Company name
    #[serde(rename = "nome")]
    #[schema(example = "Empresa Exemplo")]
    pub name: String,
    /// Partners of this company
    #[serde(rename = "socios")]
    pub partners: Vec<PartnerSummary>,
}

impl From<CompanyDBResponse> for CompanySummary {
    fn from(db: CompanyDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}

impl CompanyDetail {
    pub fn new(company: CompanyDBResponse, partners: Vec<PartnerDBResponse>) -> Self {
        Self {
            id: company.id,
            name: company.name,
            partners: partners.into_iter().map(Into::into).collect(),
        }
    }
}
