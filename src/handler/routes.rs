//! Route definitions.
//!
//! - `POST /api/logs` - record a usage-log entry
//! - `GET  /api/logs` - the caller's usage history, filterable
//! - `POST /api/declarations` - submit a declaration (runs reconciliation)
//! - `GET  /api/declarations` - the caller's declarations
//! - `GET  /api/classifications` - all risk classifications
//! - `GET  /api/alerts` - all alerts
//! - `GET  /api/assignments` - the assignment catalog
//! - `GET  /health` - liveness probe (no auth)
//! - `GET  /metrics` - Prometheus exposition (no auth)

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use super::{middleware, AppState, ValidJson};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::model::{Alert, Assignment, Classification, Declaration, LogEntry, RiskTier, TaskType, Tool};
use crate::store::LogFilter;

/// Create the router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/logs", post(create_log).get(list_logs))
        .route("/declarations", post(create_declaration).get(list_declarations))
        .route("/classifications", get(list_classifications))
        .route("/alerts", get(list_alerts))
        .route("/assignments", get(list_assignments));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_check))
        .route("/metrics", get(export_metrics))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Request shapes

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub assignment_id: u64,
    pub tool: Tool,
    pub task_types: Vec<TaskType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeclarationRequest {
    pub assignment_id: u64,
    pub declared_tools: Vec<Tool>,
}

/// Query parameters for usage-history listing.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub assignment_id: Option<u64>,
    /// Inclusive RFC 3339 lower bound on creation time.
    pub from: Option<String>,
    /// Inclusive RFC 3339 upper bound on creation time.
    pub to: Option<String>,
}

impl LogsQuery {
    fn into_filter(self) -> Result<LogFilter, ApiError> {
        Ok(LogFilter {
            assignment_id: self.assignment_id,
            from: parse_timestamp(self.from.as_deref(), "from")?,
            to: parse_timestamp(self.to.as_deref(), "to")?,
        })
    }
}

fn parse_timestamp(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|_| {
                ApiError::validation(format!("'{}' must be an RFC 3339 timestamp", field))
            }),
    }
}

// Response shapes

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    pub id: u64,
    pub tool: Tool,
    pub task_types: Vec<TaskType>,
    pub assignment_id: u64,
    pub created_at: String,
}

impl From<LogEntry> for LogResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            id: entry.id,
            tool: entry.tool,
            task_types: entry.task_types,
            assignment_id: entry.assignment_id,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationResponse {
    pub id: u64,
    pub assignment_id: u64,
    pub declared_tools: Vec<Tool>,
    pub created_at: String,
}

impl From<Declaration> for DeclarationResponse {
    fn from(declaration: Declaration) -> Self {
        Self {
            id: declaration.id,
            assignment_id: declaration.assignment_id,
            declared_tools: declaration.declared_tools,
            created_at: declaration.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResponse {
    pub id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    pub risk_level: RiskTier,
    pub undeclared_tools: Vec<Tool>,
    pub declared_not_logged: Vec<Tool>,
    pub created_at: String,
}

impl From<Classification> for ClassificationResponse {
    fn from(row: Classification) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            assignment_id: row.assignment_id,
            risk_level: row.risk_level,
            undeclared_tools: row.undeclared_tools,
            declared_not_logged: row.declared_not_logged,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub id: u64,
    pub classification_id: u64,
    pub student_id: u64,
    pub assignment_id: u64,
    pub risk_level: RiskTier,
    pub created_at: String,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            classification_id: alert.classification_id,
            student_id: alert.student_id,
            assignment_id: alert.assignment_id,
            risk_level: alert.risk_level,
            created_at: alert.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: u64,
    pub title: String,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Handlers

/// POST /api/logs - record one usage-log entry for the caller.
pub async fn create_log(
    State(state): State<AppState>,
    student: AuthStudent,
    ValidJson(request): ValidJson<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogResponse>), ApiError> {
    let entry = state.service.record_log(
        student.student_id,
        request.assignment_id,
        request.tool,
        request.task_types,
    )?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/logs - the caller's usage history, newest first.
pub async fn list_logs(
    State(state): State<AppState>,
    student: AuthStudent,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogResponse>>, ApiError> {
    let filter = query.into_filter()?;
    let entries = state.service.student_logs(student.student_id, &filter)?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/declarations - submit a declaration; reconciliation runs as a
/// side effect and the new declaration is returned.
pub async fn create_declaration(
    State(state): State<AppState>,
    student: AuthStudent,
    ValidJson(request): ValidJson<CreateDeclarationRequest>,
) -> Result<(StatusCode, Json<DeclarationResponse>), ApiError> {
    let declaration = state.service.submit_declaration(
        student.student_id,
        request.assignment_id,
        request.declared_tools,
    )?;
    Ok((StatusCode::CREATED, Json(declaration.into())))
}

/// GET /api/declarations - the caller's declarations.
pub async fn list_declarations(
    State(state): State<AppState>,
    student: AuthStudent,
) -> Result<Json<Vec<DeclarationResponse>>, ApiError> {
    let declarations = state.service.student_declarations(student.student_id)?;
    Ok(Json(declarations.into_iter().map(Into::into).collect()))
}

/// GET /api/classifications - every classification row.
pub async fn list_classifications(
    State(state): State<AppState>,
    _student: AuthStudent,
) -> Result<Json<Vec<ClassificationResponse>>, ApiError> {
    let rows = state.service.all_classifications()?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/alerts - every alert row.
pub async fn list_alerts(
    State(state): State<AppState>,
    _student: AuthStudent,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let rows = state.service.all_alerts()?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /api/assignments - the assignment catalog.
pub async fn list_assignments(
    State(state): State<AppState>,
    _student: AuthStudent,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let rows = state.service.assignment_catalog()?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// GET /health - liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /metrics - Prometheus text exposition.
pub async fn export_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode_text() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
