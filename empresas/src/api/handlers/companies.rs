use crate::api::models::{
    companies::{CompanyCreate, CompanyDetail, CompanySummary, CompanyUpdate},
    parse_update, require_name,
};
use crate::db::handlers::{Companies, Partners, Repository, companies::CompanyFilter, partners::PartnerFilter};
use crate::db::models::companies::{CompanyCreateDBRequest, CompanyUpdateDBRequest};
use crate::errors::{Error, ErrorResponse, Result};
use crate::{AppState, types::CompanyId};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, JsonRejection, PathRejection},
    },
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/api/empresas",
    tag = "empresas",
    summary = "Listar todas as empresas",
    description = "Retorna uma lista de todas as empresas cadastradas, ordenadas por id.",
    responses(
        (status = 200, description = "Lista de empresas retornada com sucesso", body = Vec<CompanySummary>),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<Vec<CompanySummary>>> {
    let mut tx = state.db.begin().await?;
    let companies = Companies::new(&mut tx).list(&CompanyFilter).await?;
    tx.commit().await?;

    Ok(Json(companies.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/empresas",
    tag = "empresas",
    summary = "Criar uma nova empresa",
    description = "Cria uma nova empresa sem sócios.",
    request_body = CompanyCreate,
    responses(
        (status = 201, description = "Empresa criada com sucesso", body = CompanySummary),
        (status = 400, description = "Dados inválidos", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_company(
    State(state): State<AppState>,
    body: std::result::Result<Json<CompanyCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CompanySummary>)> {
    let Json(create) = body?;
    require_name(create.name.as_deref())?;

    let mut tx = state.db.begin().await?;
    let company = Companies::new(&mut tx).create(&CompanyCreateDBRequest::from(create)).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(company.into())))
}

#[utoipa::path(
    get,
    path = "/api/empresas/{id}",
    tag = "empresas",
    summary = "Exibir detalhes de uma empresa",
    description = "Retorna os dados de uma empresa e a lista dos seus sócios.",
    params(
        ("id" = i64, Path, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Detalhes da empresa", body = CompanyDetail),
        (status = 400, description = "ID inválido", body = ErrorResponse),
        (status = 404, description = "Empresa não encontrada", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_company(
    State(state): State<AppState>,
    id: std::result::Result<Path<CompanyId>, PathRejection>,
) -> Result<Json<CompanyDetail>> {
    let Path(id) = id?;

    let mut tx = state.db.begin().await?;
    let company = Companies::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Empresa", id))?;
    let partners = Partners::new(&mut tx).list(&PartnerFilter::for_company(id)).await?;
    tx.commit().await?;

    Ok(Json(CompanyDetail::new(company, partners)))
}

#[utoipa::path(
    put,
    path = "/api/empresas/{id}",
    tag = "empresas",
    summary = "Atualizar uma empresa",
    description = "Atualiza o nome de uma empresa. Um `nome` ausente ou nulo mantém o valor atual.",
    request_body = CompanyUpdate,
    params(
        ("id" = i64, Path, description = "ID da empresa")
    ),
    responses(
        (status = 200, description = "Empresa atualizada com sucesso", body = CompanySummary),
        (status = 400, description = "Dados inválidos", body = ErrorResponse),
        (status = 404, description = "Empresa não encontrada", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_company(
    State(state): State<AppState>,
    id: std::result::Result<Path<CompanyId>, PathRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CompanySummary>> {
    let Path(id) = id?;

    let mut tx = state.db.begin().await?;
    if !Companies::new(&mut tx).exists(id).await? {
        return Err(Error::not_found("Empresa", id));
    }

    let update: CompanyUpdate = parse_update(&body?)?;
    if update.name.is_some() {
        require_name(update.name.as_deref())?;
    }

    let company = Companies::new(&mut tx)
        .update(id, &CompanyUpdateDBRequest::from(update))
        .await?;
    tx.commit().await?;

    Ok(Json(company.into()))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{id}",
    tag = "empresas",
    summary = "Excluir uma empresa",
    description = "Exclui uma empresa e todos os seus sócios.",
    params(
        ("id" = i64, Path, description = "ID da empresa")
    ),
    responses(
        (status = 204, description = "Empresa excluída com sucesso"),
        (status = 400, description = "ID inválido", body = ErrorResponse),
        (status = 404, description = "Empresa não encontrada", body = ErrorResponse),
        (status = 500, description = "Erro interno", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_company(
    State(state): State<AppState>,
    id: std::result::Result<Path<CompanyId>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;

    let mut tx = state.db.begin().await?;
    if !Companies::new(&mut tx).delete(id).await? {
        return Err(Error::not_found("Empresa", id));
    }
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
