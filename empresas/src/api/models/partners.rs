//! API request/response models for partners.

use super::companies::CompanySummary;
use crate::db::models::companies::CompanyDBResponse;
use crate::db::models::partners::PartnerDBResponse;
use crate::types::PartnerId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a partner under a company.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PartnerCreate {
    /// Partner name (required, non-empty)
    #[serde(rename = "nome")]
    #[schema(example = "Sócio Exemplo", max_length = 255)]
    pub name: Option<String>,
}

/// Request body for updating a partner. A missing or null `nome` leaves the name unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PartnerUpdate {
    /// New partner name (null to keep unchanged)
    #[serde(rename = "nome")]
    #[schema(example = "Sócio Exemplo Atualizado", max_length = 255)]
    pub name: Option<String>,
}

/// Partner as shown in listings, inside a company detail and after writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartnerSummary {
    /// Unique identifier for the partner
    #[schema(example = 1)]
    pub id: PartnerId,
    /// Partner name
    #[serde(rename = "nome")]
    #[schema(example = "Sócio Exemplo")]
    pub name: String,
}

/// Partner together with the company it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartnerDetail {
    /// Unique identifier for the partner
    #[schema(example = 1)]
    pub id: PartnerId,
    /// Partner name
    #[serde(rename = "nome")]
    #[schema(example = "Sócio Exemplo")]
    pub name: String,
    /// Owning company
    #[serde(rename = "empresa")]
    pub company: CompanySummary,
}

impl From<PartnerDBResponse> for PartnerSummary {
    fn from(db: PartnerDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}

impl PartnerDetail {
    pub fn new(partner: PartnerDBResponse, company: CompanyDBResponse) -> Self {
        Self {
            id: partner.id,
            name: partner.name,
            company: company.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_embeds_company() {
        let detail = PartnerDetail::new(
            PartnerDBResponse {
                id: 2,
                name: "Bob".to_string(),
                company_id: 1,
            },
            CompanyDBResponse {
                id: 1,
                name: "Acme".to_string(),
            },
        );

        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({"id": 2, "nome": "Bob", "empresa": {"id": 1, "nome": "Acme"}})
        );
    }
}
