use crate::infra::{deserialize_optional_date, metrics_for_period, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use review_insights::error::AppError;
use review_insights::workflows::connectwise::{MemberSnapshot, SnapshotImporter};
use review_insights::workflows::notes::{
    classify, notes_router, ManualReviewRepository, NoteReviewService, QualityClassification,
    ScoredNote,
};
use review_insights::workflows::performance::{
    activity_trend, build_review, compare_employees, monthly_activity, ActivityTrend,
    ComparisonReport, DateRange, EmployeeMetrics, MonthlyActivity, ProjectContribution,
    ReportingPeriod, ReviewPacket,
};
use review_insights::workflows::records::MemberId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeMetricsRequest {
    pub(crate) snapshot: MemberSnapshot,
    #[serde(default)]
    pub(crate) period: ReportingPeriod,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    /// Time-entry CSV export that replaces the snapshot's own entries.
    #[serde(default)]
    pub(crate) time_entries_csv: Option<String>,
    #[serde(default)]
    pub(crate) include_notes: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeMetricsResponse {
    pub(crate) member_id: MemberId,
    pub(crate) member_name: String,
    pub(crate) period: ReportingPeriod,
    pub(crate) range: DateRange,
    pub(crate) total_hours: f64,
    pub(crate) total_projects: usize,
    pub(crate) total_tickets: usize,
    pub(crate) total_entries: usize,
    pub(crate) average_hours_per_entry: f64,
    pub(crate) average_note_quality: f64,
    pub(crate) quality: QualityClassification,
    pub(crate) projects: Vec<ProjectContribution>,
    pub(crate) monthly_activity: Vec<MonthlyActivity>,
    pub(crate) trend: ActivityTrend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<Vec<ScoredNote>>,
}

impl EmployeeMetricsResponse {
    fn build(
        metrics: EmployeeMetrics,
        period: ReportingPeriod,
        range: DateRange,
        include_notes: bool,
    ) -> Self {
        let months = monthly_activity(&metrics.time_entries);
        let trend = activity_trend(&months);
        let projects = metrics.projects_by_hours().into_iter().cloned().collect();

        Self {
            member_id: metrics.member_id,
            member_name: metrics.member_name.clone(),
            period,
            range,
            total_hours: metrics.total_hours,
            total_projects: metrics.total_projects,
            total_tickets: metrics.total_tickets,
            total_entries: metrics.entry_count(),
            average_hours_per_entry: metrics.average_hours_per_entry(),
            average_note_quality: metrics.average_note_quality,
            quality: classify(metrics.average_note_quality),
            projects,
            monthly_activity: months,
            trend,
            notes: include_notes.then_some(metrics.notes),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeReviewRequest {
    pub(crate) snapshot: MemberSnapshot,
    #[serde(default)]
    pub(crate) period: ReportingPeriod,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonRequest {
    pub(crate) snapshots: Vec<MemberSnapshot>,
    #[serde(default)]
    pub(crate) period: ReportingPeriod,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_review_routes<R>(service: Arc<NoteReviewService<R>>) -> axum::Router
where
    R: ManualReviewRepository + 'static,
{
    notes_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/employees/metrics",
            axum::routing::post(employee_metrics_endpoint),
        )
        .route(
            "/api/v1/employees/review",
            axum::routing::post(employee_review_endpoint),
        )
        .route(
            "/api/v1/employees/comparison",
            axum::routing::post(comparison_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "review_provider": state.provider.name() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn employee_metrics_endpoint(
    Json(payload): Json<EmployeeMetricsRequest>,
) -> Result<Json<EmployeeMetricsResponse>, AppError> {
    let EmployeeMetricsRequest {
        mut snapshot,
        period,
        today,
        time_entries_csv,
        include_notes,
    } = payload;

    if let Some(csv) = time_entries_csv {
        let reader = Cursor::new(csv.into_bytes());
        snapshot.time_entries = SnapshotImporter::time_entries_from_csv(reader)?;
    }

    let (metrics, range) = metrics_for_period(snapshot, period, today);
    Ok(Json(EmployeeMetricsResponse::build(
        metrics,
        period,
        range,
        include_notes,
    )))
}

pub(crate) async fn employee_review_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EmployeeReviewRequest>,
) -> Json<ReviewPacket> {
    let (metrics, _) = metrics_for_period(payload.snapshot, payload.period, payload.today);
    Json(build_review(&state.provider, &metrics).await)
}

pub(crate) async fn comparison_endpoint(
    Json(payload): Json<ComparisonRequest>,
) -> Json<ComparisonReport> {
    let ComparisonRequest {
        snapshots,
        period,
        today,
    } = payload;

    let employees: Vec<EmployeeMetrics> = snapshots
        .into_iter()
        .map(|snapshot| metrics_for_period(snapshot, period, today).0)
        .collect();

    Json(compare_employees(&employees))
}
