use axum::Json;
use utoipa::OpenApi;

use crate::dto::interview_dto::InterviewListResponse;
use crate::models::interview::{Interview, InterviewDraft, InterviewOrder, InterviewPatch, Stage};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::interview::list_interviews,
        super::interview::create_interview,
        super::interview::get_interview,
        super::interview::update_interview,
        super::interview::delete_interview,
        super::interview::append_stage,
        super::interview::update_stage,
        super::interview::remove_stage,
    ),
    components(schemas(
        Interview,
        InterviewDraft,
        InterviewPatch,
        InterviewOrder,
        InterviewListResponse,
        Stage
    )),
    tags((name = "interviews", description = "Interview tracking"))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
