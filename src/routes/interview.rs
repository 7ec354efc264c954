use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{InterviewListQuery, InterviewListResponse},
    error::Result,
    models::{
        identity::Identity,
        interview::{Interview, InterviewDraft, InterviewPatch, Stage},
    },
    AppState,
};

use super::extract::{ApiJson, ApiPath};

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(InterviewListQuery),
    responses(
        (status = 200, description = "Interviews of the caller", body = InterviewListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 503, description = "Store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let mut items = state.interview_service.list(&identity).await?;
    if let Some(order) = query.order {
        order.sort(&mut items);
    }
    Ok(Json(InterviewListResponse::from(items)))
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = InterviewDraft,
    responses(
        (status = 201, description = "Interview created", body = Interview),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(payload): ApiJson<InterviewDraft>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state.interview_service.create(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = Interview),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(&identity, id).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    patch,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = InterviewPatch,
    responses(
        (status = 200, description = "Interview updated", body = Interview),
        (status = 400, description = "Invalid payload or salary range"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<InterviewPatch>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .update(&identity, id, payload)
        .await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.interview_service.remove(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/interviews/{id}/stages",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = Stage,
    responses(
        (status = 201, description = "Stage appended", body = Interview),
        (status = 400, description = "Invalid stage"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn append_stage(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Stage>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .append_stage(&identity, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    put,
    path = "/api/interviews/{id}/stages/{index}",
    params(
        ("id" = Uuid, Path, description = "Interview ID"),
        ("index" = usize, Path, description = "Zero-based stage position")
    ),
    request_body = Stage,
    responses(
        (status = 200, description = "Stage replaced", body = Interview),
        (status = 400, description = "Invalid stage"),
        (status = 404, description = "Interview or stage not found")
    )
)]
#[axum::debug_handler]
pub async fn update_stage(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath((id, index)): ApiPath<(Uuid, usize)>,
    ApiJson(payload): ApiJson<Stage>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .update_stage(&identity, id, index, payload)
        .await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{id}/stages/{index}",
    params(
        ("id" = Uuid, Path, description = "Interview ID"),
        ("index" = usize, Path, description = "Zero-based stage position")
    ),
    responses(
        (status = 200, description = "Stage removed", body = Interview),
        (status = 404, description = "Interview or stage not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_stage(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiPath((id, index)): ApiPath<(Uuid, usize)>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .remove_stage(&identity, id, index)
        .await?;
    Ok(Json(interview))
}
