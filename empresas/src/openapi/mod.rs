//! OpenAPI documentation for the companies and partners API.
//!
//! [`ApiDoc`] is served as JSON at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;
use crate::errors::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Empresas API",
        description = "Cadastro de empresas e dos seus sócios."
    ),
    paths(
        api::handlers::companies::list_companies,
        api::handlers::companies::create_company,
        api::handlers::companies::get_company,
        api::handlers::companies::update_company,
        api::handlers::companies::delete_company,
        api::handlers::partners::list_partners,
        api::handlers::partners::create_partner,
        api::handlers::partners::get_partner,
        api::handlers::partners::update_partner,
        api::handlers::partners::delete_partner,
    ),
    components(
        schemas(
            api::models::companies::CompanyCreate,
            api::models::companies::CompanyUpdate,
            api::models::companies::CompanySummary,
            api::models::companies::CompanyDetail,
            api::models::partners::PartnerCreate,
            api::models::partners::PartnerUpdate,
            api::models::partners::PartnerSummary,
            api::models::partners::PartnerDetail,
            ErrorResponse,
        )
    ),
    tags(
        (name = "empresas", description = "Gerenciamento de empresas"),
        (name = "socios", description = "Gerenciamento dos sócios de uma empresa"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert_eq!(
            paths,
            vec![
                "/api/empresas",
                "/api/empresas/{empresaId}/socios",
                "/api/empresas/{empresaId}/socios/{id}",
                "/api/empresas/{id}",
            ]
        );
        assert!(doc.components.unwrap().schemas.contains_key("ErrorResponse"));
    }
}
