//! Database repository for partners.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::partners::{PartnerCreateDBRequest, PartnerDBResponse, PartnerUpdateDBRequest},
};
use crate::types::{CompanyId, PartnerId};
use sqlx::SqliteConnection;
use tracing::instrument;

/// Filter for listing partners
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    /// Restrict the listing to partners of this company
    pub company_id: Option<CompanyId>,
}

impl PartnerFilter {
    pub fn for_company(company_id: CompanyId) -> Self {
        Self {
            company_id: Some(company_id),
        }
    }
}

pub struct Partners<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Partners<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Get a partner by ID, only if it belongs to the given company
    #[instrument(skip(self), err)]
    pub async fn get_in_company(&mut self, company_id: CompanyId, id: PartnerId) -> Result<Option<PartnerDBResponse>> {
        let partner =
            sqlx::query_as::<_, PartnerDBResponse>("SELECT id, name, company_id FROM partners WHERE id = ? AND company_id = ?")
                .bind(id)
                .bind(company_id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(partner)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Partners<'c> {
    type CreateRequest = PartnerCreateDBRequest;
    type UpdateRequest = PartnerUpdateDBRequest;
    type Response = PartnerDBResponse;
    type Id = PartnerId;
    type Filter = PartnerFilter;

    #[instrument(skip(self, request), fields(company_id = request.company_id, name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let partner = sqlx::query_as::<_, PartnerDBResponse>(
            "INSERT INTO partners (name, company_id) VALUES (?, ?) RETURNING id, name, company_id",
        )
        .bind(&request.name)
        .bind(request.company_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(partner)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let partner = sqlx::query_as::<_, PartnerDBResponse>("SELECT id, name, company_id FROM partners WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(partner)
    }

    #[instrument(skip(self, filter), fields(company_id = ?filter.company_id), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let partners = match filter.company_id {
            Some(company_id) => {
                sqlx::query_as::<_, PartnerDBResponse>(
                    "SELECT id, name, company_id FROM partners WHERE company_id = ? ORDER BY id ASC",
                )
                .bind(company_id)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, PartnerDBResponse>("SELECT id, name, company_id FROM partners ORDER BY id ASC")
                    .fetch_all(&mut *self.db)
                    .await?
            }
        };

        Ok(partners)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM partners WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let partner = sqlx::query_as::<_, PartnerDBResponse>(
            r#"
            UPDATE partners SET name = COALESCE(?, name)
            WHERE id = ?
            RETURNING id, name, company_id
            "#,
        )
        .bind(request.name.as_deref())
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(partner)
    }
}
