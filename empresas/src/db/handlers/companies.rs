//! Database repository for companies.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::companies::{CompanyCreateDBRequest, CompanyDBResponse, CompanyUpdateDBRequest},
};
use crate::types::{CompanyId, PartnerId};
use sqlx::SqliteConnection;
use tracing::instrument;

/// Filter for listing companies. Companies are always listed in full, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter;

pub struct Companies<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Companies<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Whether a company with this id exists
    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, id: CompanyId) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(found.is_some())
    }

    /// Remove a partner from this company's collection.
    ///
    /// Only a partner that still references `company_id` is affected. The company reference is
    /// mandatory, so removal from the collection deletes the partner row.
    #[instrument(skip(self), err)]
    pub async fn remove_partner(&mut self, company_id: CompanyId, partner_id: PartnerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM partners WHERE id = ? AND company_id = ?")
            .bind(partner_id)
            .bind(company_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Companies<'c> {
    type CreateRequest = CompanyCreateDBRequest;
    type UpdateRequest = CompanyUpdateDBRequest;
    type Response = CompanyDBResponse;
    type Id = CompanyId;
    type Filter = CompanyFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as::<_, CompanyDBResponse>("INSERT INTO companies (name) VALUES (?) RETURNING id, name")
            .bind(&request.name)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(company)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let company = sqlx::query_as::<_, CompanyDBResponse>("SELECT id, name FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(company)
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let companies = sqlx::query_as::<_, CompanyDBResponse>("SELECT id, name FROM companies ORDER BY id ASC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(companies)
    }

    /// Deletes the company; its partners go with it through the `ON DELETE CASCADE` foreign key.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let company = sqlx::query_as::<_, CompanyDBResponse>(
            r#"
            UPDATE companies SET name = COALESCE(?, name)
            WHERE id = ?
            RETURNING id, name
            "#,
        )
        .bind(request.name.as_deref())
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Partners, partners::PartnerFilter};
    use crate::db::models::partners::PartnerCreateDBRequest;
    use crate::test_utils::create_test_pool;

    #[test_log::test(tokio::test)]
    async fn test_create_and_get_company() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Companies::new(&mut conn);

        let created = repo.create(&CompanyCreateDBRequest::new("Acme")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Acme");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_list_companies_in_id_order() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Companies::new(&mut conn);

        for name in ["Gamma", "Alpha", "Beta"] {
            repo.create(&CompanyCreateDBRequest::new(name)).await.unwrap();
        }

        let names: Vec<String> = repo.list(&CompanyFilter).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_keeps_name_when_none() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Companies::new(&mut conn);

        let company = repo.create(&CompanyCreateDBRequest::new("Acme")).await.unwrap();

        let unchanged = repo.update(company.id, &CompanyUpdateDBRequest::default()).await.unwrap();
        assert_eq!(unchanged.name, "Acme");

        let renamed = repo
            .update(
                company.id,
                &CompanyUpdateDBRequest {
                    name: Some("Acme Ltda".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Acme Ltda");
        assert_eq!(renamed.id, company.id);
    }

    #[test_log::test(tokio::test)]
    async fn test_update_missing_company_is_not_found() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Companies::new(&mut conn);

        let result = repo.update(42, &CompanyUpdateDBRequest::default()).await;
        assert!(matches!(result, Err(DbError::NotFound)));
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_name_violates_check_constraint() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Companies::new(&mut conn);

        let result = repo.create(&CompanyCreateDBRequest::new("")).await;
        assert!(matches!(result, Err(DbError::CheckViolation { .. })));
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_cascades_to_partners() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let company = Companies::new(&mut conn).create(&CompanyCreateDBRequest::new("Acme")).await.unwrap();
        let other = Companies::new(&mut conn).create(&CompanyCreateDBRequest::new("Other")).await.unwrap();
        for (company_id, name) in [(company.id, "Bob"), (company.id, "Alice"), (other.id, "Carol")] {
            Partners::new(&mut conn)
                .create(&PartnerCreateDBRequest {
                    company_id,
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }

        assert!(Companies::new(&mut conn).delete(company.id).await.unwrap());
        assert!(!Companies::new(&mut conn).delete(company.id).await.unwrap());

        let remaining = Partners::new(&mut conn).list(&PartnerFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Carol");
        assert_eq!(remaining[0].company_id, other.id);
    }

    #[test_log::test(tokio::test)]
    async fn test_remove_partner_only_from_owning_company() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let acme = Companies::new(&mut conn).create(&CompanyCreateDBRequest::new("Acme")).await.unwrap();
        let other = Companies::new(&mut conn).create(&CompanyCreateDBRequest::new("Other")).await.unwrap();
        let bob = Partners::new(&mut conn)
            .create(&PartnerCreateDBRequest {
                company_id: acme.id,
                name: "Bob".to_string(),
            })
            .await
            .unwrap();

        let mut repo = Companies::new(&mut conn);
        assert!(!repo.remove_partner(other.id, bob.id).await.unwrap());
        assert!(repo.remove_partner(acme.id, bob.id).await.unwrap());
        assert!(!repo.remove_partner(acme.id, bob.id).await.unwrap());
        assert!(repo.exists(acme.id).await.unwrap());
    }
}
