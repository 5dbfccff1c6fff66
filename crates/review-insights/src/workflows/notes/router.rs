use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::filter::{NoteReviewQuery, NoteReviewSummary};
use super::quality::{QualityClassification, ScoredNote};
use super::repository::ManualReviewRepository;
use super::service::{NoteReviewError, NoteReviewService};
use crate::workflows::records::{MemberId, Note, NoteId};

#[derive(Debug, Deserialize)]
pub struct NoteReviewRequest {
    pub notes: Vec<Note>,
    #[serde(flatten)]
    pub query: NoteReviewQuery,
}

#[derive(Debug, Serialize)]
pub struct ScoredNoteView {
    #[serde(flatten)]
    pub scored: ScoredNote,
    pub classification: QualityClassification,
}

#[derive(Debug, Serialize)]
pub struct NoteReviewResponse {
    pub member_id: MemberId,
    pub summary: NoteReviewSummary,
    pub notes: Vec<ScoredNoteView>,
}

#[derive(Debug, Deserialize)]
pub struct ManualRatingRequest {
    pub rating: u8,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Router builder exposing note scoring and reviewer ratings.
pub fn notes_router<R>(service: Arc<NoteReviewService<R>>) -> Router
where
    R: ManualReviewRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/members/:member_id/notes/review",
            post(review_handler::<R>),
        )
        .route(
            "/api/v1/members/:member_id/notes/:note_id/rating",
            put(rating_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<NoteReviewService<R>>>,
    Path(member_id): Path<u64>,
    axum::Json(request): axum::Json<NoteReviewRequest>,
) -> Response
where
    R: ManualReviewRepository + 'static,
{
    let member_id = MemberId(member_id);
    match service.review(member_id, request.notes) {
        Ok(scored) => {
            let summary = NoteReviewSummary::from_notes(&scored);
            let notes = request
                .query
                .apply(&scored)
                .into_iter()
                .map(|entry| ScoredNoteView {
                    classification: entry.quality.classification(),
                    scored: entry.clone(),
                })
                .collect();

            let payload = NoteReviewResponse {
                member_id,
                summary,
                notes,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn rating_handler<R>(
    State(service): State<Arc<NoteReviewService<R>>>,
    Path((member_id, note_id)): Path<(u64, u64)>,
    axum::Json(request): axum::Json<ManualRatingRequest>,
) -> Response
where
    R: ManualReviewRepository + 'static,
{
    match service.rate(
        MemberId(member_id),
        NoteId(note_id),
        request.rating,
        request.comments,
    ) {
        Ok(review) => {
            let payload = json!({
                "member_id": member_id,
                "note_id": note_id,
                "rating": review.rating(),
                "comments": review.comments(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

fn error_response(error: NoteReviewError) -> Response {
    let status = match error {
        NoteReviewError::InvalidReview(_) => StatusCode::UNPROCESSABLE_ENTITY,
        NoteReviewError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
