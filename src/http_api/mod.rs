use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    CellEdit, DayStatus, ExportError, RosterError, Session, SessionError, ShiftAssignment,
    ShiftParse, YearMonth, parse_shift,
};

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }

    fn session(&self) -> Arc<RwLock<Session>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl From<RosterError> for ApiError {
    fn from(value: RosterError) -> Self {
        match value {
            RosterError::UnknownPerson(_) => ApiError::NotFound(value.to_string()),
            RosterError::DuplicatePerson(_) => ApiError::Conflict(value.to_string()),
            RosterError::EmptyName => ApiError::Invalid(value.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct PersonPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MonthPayload {
    month: String,
}

#[derive(Debug, Deserialize)]
struct CellPayload {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum CellOutcome {
    Accepted { shift: String, assignment: ShiftAssignment },
    Cleared,
    Rejected { reason: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum ParseOutcome {
    Empty,
    Malformed { reason: String },
    Parsed { start: String, end: String },
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/months", get(list_months))
        .route("/month", get(get_month).put(select_month))
        .route("/pharmacists", get(list_pharmacists).post(add_pharmacist))
        .route("/pharmacists/:name", delete(remove_pharmacist))
        .route("/cells/:name/:date", put(edit_cell))
        .route("/coverage", get(coverage))
        .route("/export", get(export_csv))
        .route("/parse", post(parse))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, session: Session) -> std::io::Result<()> {
    let state = AppState::new(session);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_months(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session();
    let guard = session.read();
    Json(json!({ "months": guard.months(), "selected": guard.month() }))
}

async fn get_month(State(state): State<AppState>) -> Json<YearMonth> {
    let session = state.session();
    let month = session.read().month();
    Json(month)
}

async fn select_month(
    State(state): State<AppState>,
    Json(payload): Json<MonthPayload>,
) -> Result<Json<YearMonth>, ApiError> {
    let month: YearMonth = payload
        .month
        .parse()
        .map_err(|err: crate::MonthParseError| ApiError::Invalid(err.to_string()))?;
    let session = state.session();
    session.write().select_month(month)?;
    Ok(Json(month))
}

async fn list_pharmacists(State(state): State<AppState>) -> Json<Vec<String>> {
    let session = state.session();
    let people = session.read().store().people().to_vec();
    Json(people)
}

async fn add_pharmacist(
    State(state): State<AppState>,
    Json(payload): Json<PersonPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let session = state.session();
    let name = session.write().add_person(&payload.name)?;
    Ok((StatusCode::CREATED, Json(json!({ "name": name }))))
}

async fn remove_pharmacist(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session();
    let discarded = session.write().remove_person(&name)?;
    Ok(Json(json!({ "name": name, "discarded_shifts": discarded })))
}

async fn edit_cell(
    State(state): State<AppState>,
    Path((name, date)): Path<(String, String)>,
    Json(payload): Json<CellPayload>,
) -> Result<Json<CellOutcome>, ApiError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|err| ApiError::Invalid(format!("invalid date '{date}': {err}")))?;
    let session = state.session();
    let edit = session.write().edit_cell(&name, date, &payload.value)?;
    let outcome = match edit {
        CellEdit::Accepted(assignment) => CellOutcome::Accepted {
            shift: assignment.cell_text(),
            assignment,
        },
        CellEdit::Cleared => CellOutcome::Cleared,
        CellEdit::Rejected(reason) => CellOutcome::Rejected {
            reason: reason.to_string(),
        },
    };
    Ok(Json(outcome))
}

async fn coverage(State(state): State<AppState>) -> Json<Vec<DayStatus>> {
    let session = state.session();
    let statuses = session.read().coverage();
    Json(statuses)
}

async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session();
    let (file_name, body) = {
        let guard = session.read();
        let mut buf = Vec::new();
        guard.export_csv(&mut buf)?;
        (guard.export_file_name(), buf)
    };
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn parse(Json(payload): Json<CellPayload>) -> Json<ParseOutcome> {
    let outcome = match parse_shift(&payload.value) {
        ShiftParse::Empty => ParseOutcome::Empty,
        ShiftParse::Malformed(reason) => ParseOutcome::Malformed {
            reason: reason.to_string(),
        },
        ShiftParse::Parsed(start, end) => ParseOutcome::Parsed {
            start: start.to_string(),
            end: end.to_string(),
        },
    };
    Json(outcome)
}
