use crate::api::models::{
    partners::{PartnerCreate, PartnerDetail, PartnerSummary, PartnerUpdate},
    parse_update, require_name,
};
use crate::db::handlers::{Companies, Partners, Repository, partners::PartnerFilter};
use crate::db::models::partners::{PartnerCreateDBRequest, PartnerUpdateDBRequest};
use crate::errors::{Error, ErrorResponse, Result};
use crate::{
    AppState,
    types::{CompanyId, PartnerId},
};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use sqlx::SqliteConnection;

/// Fail with 404 unless the company exists
async fn ensure_company(conn: &mut SqliteConnection, company_id: CompanyId) -> Result<()> {
    if Companies::new(conn).exists(company_id).await? {
        Ok(())
    } else {
        Err(Error::not_found("Empresa", company_id))
    }
}

#[utoipa::path(
    get,
    path = "/api/empresas/{empresaId}/socios",
    tag = "socios",
    summary = "Listar os sócios de uma empresa",
    description = "Retorna uma lista dos sócios associados a uma empresa específica, ordenados por id.",
    params(
        ("empresaId" = i64, Path, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Lista de sócios retornada com sucesso", body = Vec<PartnerSummary>),
        (status = 400, description = "ID inválido", body = ErrorResponse),
        (status = 404, description = "Empresa não encontrada", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_partners(
    State(state): State<AppState>,
    company_id: std::result::Result<Path<CompanyId>, PathRejection>,
) -> Result<Json<Vec<PartnerSummary>>> {
    let Path(company_id) = company_id?;

    let mut tx = state.db.begin().await?;
    ensure_company(&mut tx, company_id).await?;
    let partners = Partners::new(&mut tx).list(&PartnerFilter::for_company(company_id)).await?;
    tx.commit().await?;

    Ok(Json(partners.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{empresaId}/socios",
    tag = "socios",
    summary = "Criar um novo sócio",
    description = "Cria um novo sócio e o vincula à empresa especificada.",
    request_body = PartnerCreate,
    params(
        ("empresaId" = i64, Path, description = "ID da empresa")
    ),
    responses(
        (status = 201, description = "Sócio criado com sucesso", body = PartnerSummary),
        (status = 400, description = "Dados inválidos", body = ErrorResponse),
        (status = 404, description = "Empresa não encontrada", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_partner(
    State(state): State<AppState>,
    company_id: std::result::Result<Path<CompanyId>, PathRejection>,
    body: std::result::Result<Json<PartnerCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<PartnerSummary>)> {
    let Path(company_id) = company_id?;

    let mut tx = state.db.begin().await?;
    ensure_company(&mut tx, company_id).await?;

    let Json(create) = body?;
    require_name(create.name.as_deref())?;

    let partner = Partners::new(&mut tx)
        .create(&PartnerCreateDBRequest::new(company_id, create))
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(partner.into())))
}

#[utoipa::path(
    get,
    path = "/api/empresas/{empresaId}/socios/{id}",
    tag = "socios",
    summary = "Exibir detalhes de um sócio",
    description = "Retorna os detalhes de um sócio específico associado a uma empresa.",
    params(
        ("empresaId" = i64, Path, description = "ID da empresa"),
        ("id" = i64, Path, description = "ID do sócio")
    ),
    responses(
        (status = 200, description = "Detalhes do sócio", body = PartnerDetail),
        (status = 400, description = "ID inválido", body = ErrorResponse),
        (status = 404, description = "Empresa ou sócio não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_partner(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(CompanyId, PartnerId)>, PathRejection>,
) -> Result<Json<PartnerDetail>> {
    let Path((company_id, id)) = ids?;

    let mut tx = state.db.begin().await?;
    let company = Companies::new(&mut tx)
        .get_by_id(company_id)
        .await?
        .ok_or_else(|| Error::not_found("Empresa", company_id))?;
    let partner = Partners::new(&mut tx)
        .get_in_company(company_id, id)
        .await?
        .ok_or_else(|| Error::not_found("Sócio", id))?;
    tx.commit().await?;

    Ok(Json(PartnerDetail::new(partner, company)))
}

#[utoipa::path(
    put,
    path = "/api/empresas/{empresaId}/socios/{id}",
    tag = "socios",
    summary = "Atualizar um sócio",
    description = "Atualiza os dados de um sócio associado a uma empresa. Um `nome` ausente ou nulo mantém o valor atual.",
    request_body = PartnerUpdate,
    params(
        ("empresaId" = i64, Path, description = "ID da empresa"),
        ("id" = i64, Path, description = "ID do sócio")
    ),
    responses(
        (status = 200, description = "Sócio atualizado com sucesso", body = PartnerSummary),
        (status = 400, description = "Dados inválidos", body = ErrorResponse),
        (status = 404, description = "Empresa ou sócio não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_partner(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(CompanyId, PartnerId)>, PathRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PartnerSummary>> {
    let Path((company_id, id)) = ids?;

    let mut tx = state.db.begin().await?;
    ensure_company(&mut tx, company_id).await?;
    if Partners::new(&mut tx).get_in_company(company_id, id).await?.is_none() {
        return Err(Error::not_found("Sócio", id));
    }

    let update: PartnerUpdate = parse_update(&body?)?;
    if update.name.is_some() {
        require_name(update.name.as_deref())?;
    }

    let partner = Partners::new(&mut tx)
        .update(id, &PartnerUpdateDBRequest::from(update))
        .await?;
    tx.commit().await?;

    Ok(Json(partner.into()))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{empresaId}/socios/{id}",
    tag = "socios",
    summary = "Excluir um sócio",
    description = "Remove um sócio da empresa. A empresa não é afetada.",
    params(
        ("empresaId" = i64, Path, description = "ID da empresa"),
        ("id" = i64, Path, description = "ID do sócio")
    ),
    responses(
        (status = 204, description = "Sócio excluído com sucesso"),
        (status = 400, description = "ID inválido", body = ErrorResponse),
        (status = 404, description = "Empresa ou sócio não encontrado", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_partner(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(CompanyId, PartnerId)>, PathRejection>,
) -> Result<StatusCode> {
    let Path((company_id, id)) = ids?;

    let mut tx = state.db.begin().await?;
    ensure_company(&mut tx, company_id).await?;
    if !Companies::new(&mut tx).remove_partner(company_id, id).await? {
        return Err(Error::not_found("Sócio", id));
    }
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
