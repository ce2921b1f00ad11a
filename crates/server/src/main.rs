// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod client_error;
mod gemini;
mod slack;

#[cfg(test)]
mod test_support;

use axum::{
    Form, Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use leave_intake_api::{
    ApiError, ChallengeResponse, DEFAULT_DEDUP_CAPACITY, EventAck, EventEnvelope, EventOutcome,
    IntakeService, IntakeSettings, LruIdempotencyCache, SlashCommandForm, SlashCommandResponse,
    handle_event, leave_condition,
};
use leave_intake_domain::{Tz, parse_timezone};
use leave_intake_persistence::{DEFAULT_SPREADSHEET, SqliteLedger};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::client_error::http_client;
use crate::gemini::{DEFAULT_EXTRACTOR_URL, GeminiExtractor};
use crate::slack::SlackClient;

/// Leave Intake Server - HTTP endpoint for the leave intake chat bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(long, env = "LEAVE_INTAKE_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "LEAVE_INTAKE_PORT", default_value_t = 3000)]
    port: u16,

    /// Path to the `SQLite` ledger file. If not provided, uses an in-memory database.
    #[arg(short, long, env = "LEAVE_INTAKE_DATABASE")]
    database: Option<String>,

    /// Ledger name the yearly partitions are filed under
    #[arg(long, env = "LEAVE_INTAKE_SPREADSHEET", default_value = DEFAULT_SPREADSHEET)]
    spreadsheet: String,

    /// IANA zone the civil calendar is evaluated in
    #[arg(long, env = "LEAVE_INTAKE_TIMEZONE", default_value = "Asia/Bangkok")]
    timezone: String,

    /// Shared secret carried by every inbound Slack request
    #[arg(long, env = "SLACK_VERIFICATION_TOKEN", hide_env_values = true)]
    verification_token: String,

    /// Bot token for the Slack Web API
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Base URL of the Slack Web API
    #[arg(long, env = "SLACK_API_BASE", default_value = "https://slack.com/api")]
    slack_api_base: String,

    /// API key for the intent extractor
    #[arg(long, env = "GOOGLE_AI_API_KEY", hide_env_values = true)]
    extractor_api_key: String,

    /// Extractor endpoint; the API key is appended to it
    #[arg(long, env = "GOOGLE_AI_API_URL", default_value = DEFAULT_EXTRACTOR_URL)]
    extractor_url: String,

    /// Number of recent deliveries remembered for duplicate detection
    #[arg(long, env = "LEAVE_INTAKE_DEDUP_CAPACITY", default_value_t = DEFAULT_DEDUP_CAPACITY)]
    dedup_capacity: usize,

    /// Seconds an outbound Slack or extractor request may take
    #[arg(long, env = "LEAVE_INTAKE_UPSTREAM_TIMEOUT", default_value_t = 30)]
    upstream_timeout_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The intake pipeline with its ledger and collaborators.
    intake: IntakeService<SqliteLedger>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthRejected => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::Upstream { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handler for POST /slack/events
async fn handle_slack_event(
    AxumState(app_state): AxumState<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Result<Response, HttpError> {
    let event_id: Option<String> = envelope.event_id.clone();
    let outcome: EventOutcome = handle_event(&app_state.intake, envelope).await?;

    match outcome {
        EventOutcome::Challenge(challenge) => {
            Ok(Json(ChallengeResponse { challenge }).into_response())
        }
        EventOutcome::Failed { ref reason } => {
            warn!(event_id = ?event_id, reason = %reason, "Event failed");
            Ok(Json(outcome.ack()).into_response())
        }
        other => {
            info!(event_id = ?event_id, outcome = outcome_label(&other), "Event handled");
            Ok(Json(other.ack()).into_response())
        }
    }
}

const fn outcome_label(outcome: &EventOutcome) -> &'static str {
    match outcome {
        EventOutcome::Challenge(_) => "challenge",
        EventOutcome::Ignored => "ignored",
        EventOutcome::Duplicate => "duplicate",
        EventOutcome::UnknownUser => "unknown_user",
        EventOutcome::NotALeaveRequest => "not_a_leave_request",
        EventOutcome::Processed { .. } => "processed",
        EventOutcome::Failed { .. } => "failed",
    }
}

/// Handler for POST /slack/commands/leave-condition
async fn handle_leave_condition(
    AxumState(app_state): AxumState<AppState>,
    Form(form): Form<SlashCommandForm>,
) -> Result<Json<SlashCommandResponse>, HttpError> {
    let response: SlashCommandResponse =
        leave_condition(&app_state.intake.settings.verification_token, &form)?;
    Ok(Json(response))
}

/// Handler for GET /health
async fn handle_health() -> Json<EventAck> {
    Json(EventAck::ok())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/slack/events", post(handle_slack_event))
        .route("/slack/commands/leave-condition", post(handle_leave_condition))
        .route("/health", get(handle_health))
        .with_state(app_state)
}

fn open_ledger(args: &Args) -> Result<SqliteLedger, leave_intake_persistence::PersistenceError> {
    if let Some(db_path) = &args.database {
        info!(path = %db_path, "Using file-based ledger");
        SqliteLedger::new_with_file(db_path, &args.spreadsheet)
    } else {
        info!("Using in-memory ledger");
        SqliteLedger::new_in_memory(&args.spreadsheet)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Leave Intake Server");

    let timezone: Tz = parse_timezone(&args.timezone)?;
    let ledger: SqliteLedger = open_ledger(&args)?;
    info!(
        spreadsheet = %args.spreadsheet,
        timezone = %timezone,
        slack_api_base = %args.slack_api_base,
        dedup_capacity = args.dedup_capacity,
        upstream_timeout_secs = args.upstream_timeout_secs,
        "Configuration loaded"
    );
    let http: reqwest::Client = http_client(Duration::from_secs(args.upstream_timeout_secs))?;

    let app_state: AppState = AppState {
        intake: IntakeService {
            platform: Arc::new(SlackClient::new(
                http.clone(),
                &args.slack_api_base,
                &args.bot_token,
            )),
            extractor: Arc::new(GeminiExtractor::new(
                http,
                &args.extractor_url,
                &args.extractor_api_key,
            )),
            ledger: Arc::new(Mutex::new(ledger)),
            dedup: Arc::new(LruIdempotencyCache::new(args.dedup_capacity)),
            settings: IntakeSettings {
                verification_token: args.verification_token.clone(),
                timezone,
            },
        },
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
