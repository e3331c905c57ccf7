use actix_web::{HttpRequest, HttpResponse, Responder, error, get, post, put, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::services::{
    InMemorySessionService, ServiceError, SessionCommandHandler, SessionQueryHandler,
};
use crate::domain::session::ChargingSession;
use crate::domain::summary::{SessionSummary, SummaryBounds};

const DEFAULT_SUMMARY_SECONDS: i64 = 1;

#[derive(Clone)]
pub struct ApiState {
    pub sessions: InMemorySessionService,
    pub summary_bounds: SummaryBounds,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub station_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub seconds: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub station_id: String,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
    pub status: String,
}

impl From<&ChargingSession> for SessionResponse {
    fn from(session: &ChargingSession) -> Self {
        Self {
            id: session.id().to_string(),
            station_id: session.station_id().to_string(),
            started_at: timestamp_to_iso8601(session.started_at()),
            stopped_at: session.stopped_at().map(timestamp_to_iso8601),
            status: session.status().as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_count: u64,
    pub started_count: u64,
    pub stopped_count: u64,
}

impl From<SessionSummary> for SummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            total_count: summary.total_count,
            started_count: summary.started_count,
            stopped_count: summary.stopped_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<String>,
}

impl ApiErrorResponse {
    fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health)
        .service(list_sessions_endpoint)
        .service(start_session_endpoint)
        .service(session_summary_endpoint)
        .service(stop_session_endpoint);
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/chargingSessions")]
async fn list_sessions_endpoint(state: web::Data<ApiState>) -> impl Responder {
    match state.sessions.list_sessions() {
        Ok(sessions) => {
            let mapped: Vec<SessionResponse> =
                sessions.iter().map(SessionResponse::from).collect();
            HttpResponse::Ok().json(mapped)
        }
        Err(error) => service_error_response(error),
    }
}

#[post("/chargingSessions")]
async fn start_session_endpoint(
    state: web::Data<ApiState>,
    body: web::Json<StartSessionRequest>,
) -> impl Responder {
    if body.station_id.trim().is_empty() {
        return bad_request("stationId must not be blank");
    }

    match state.sessions.start_session(&body.station_id) {
        Ok(session) => HttpResponse::Created().json(SessionResponse::from(&session)),
        Err(error) => service_error_response(error),
    }
}

#[put("/chargingSessions/{id}")]
async fn stop_session_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> impl Responder {
    let raw_id = path.into_inner();
    let Ok(id) = Uuid::parse_str(raw_id.trim()) else {
        return bad_request(format!("invalid charging session id [{raw_id}]"));
    };

    match state.sessions.stop_session(id) {
        Ok(session) => HttpResponse::Ok().json(SessionResponse::from(&session)),
        Err(error) => service_error_response(error),
    }
}

#[get("/chargingSessions/summary")]
async fn session_summary_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<SummaryQuery>,
) -> impl Responder {
    let seconds = query.seconds.unwrap_or(DEFAULT_SUMMARY_SECONDS);

    match state.sessions.summarize(seconds, state.summary_bounds) {
        Ok(counts) => {
            HttpResponse::Ok().json(SummaryResponse::from(SessionSummary::from(&counts)))
        }
        Err(error) => service_error_response(error),
    }
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiErrorResponse::single(message))
}

fn service_error_response(error: ServiceError) -> HttpResponse {
    let body = ApiErrorResponse::single(error.to_string());
    match error {
        ServiceError::UnknownSession(_) => HttpResponse::NotFound().json(body),
        ServiceError::WindowOutOfRange { .. } => HttpResponse::BadRequest().json(body),
        ServiceError::LockPoisoned | ServiceError::Index(_) => {
            tracing::error!(error = %error, "session store failure");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("invalid request body: {err}"));
    error::InternalError::from_response(err, response).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("invalid query parameters: {err}"));
    error::InternalError::from_response(err, response).into()
}

fn timestamp_to_iso8601(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
