use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use docqa_chat::{
    AnswerOrchestrator, AssistantError, ChatSession, ChatTurn, ConversationalRetrieval,
    FallbackResponder, OpenAICompletionClient,
};
use docqa_rag::{FileType, IngestionReport, OpenAIEmbeddingProvider, ingest_folder};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::AppConfig,
    protocol::{
        AskRequest, AskResponse, ClearHistoryResponse, ErrorBody, HistoryEntry, HistoryResponse,
        StatusResponse,
    },
};

/// Shown instead of the question box, and returned by `/api/ask`, when no API key is set.
pub const MISSING_KEY_MESSAGE: &str = "Please set your OpenAI API key in the .env file to proceed.";

/// What happened while the server was starting up.
#[derive(Clone, Debug)]
pub struct StartupStatus {
    pub credentials_present: bool,
    pub data_dir: PathBuf,
    pub file_type: FileType,
    pub report: Option<IngestionReport>,
    pub ingestion_error: Option<String>,
}

impl StartupStatus {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            credentials_present: config.has_credentials(),
            data_dir: config.data_dir.clone(),
            file_type: config.file_type,
            report: None,
            ingestion_error: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<AnswerOrchestrator>,
    session: Arc<Mutex<ChatSession>>,
    status: Arc<StartupStatus>,
}

impl AppState {
    pub fn new(orchestrator: AnswerOrchestrator, status: StartupStatus) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            session: Arc::new(Mutex::new(ChatSession::new())),
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> &StartupStatus {
        &self.status
    }
}

/// Build the application state, ingesting the document folder when an API key
/// is configured.
///
/// A failed ingestion run is recorded in [`StartupStatus`] and leaves the
/// assistant without a retrieval backend; it does not stop the server.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<AppState> {
    let fallback = FallbackResponder::builtin().context("failed to load the fallback reply table")?;
    let orchestrator = AnswerOrchestrator::new(Arc::new(fallback));
    let mut status = StartupStatus::from_config(config);

    let Some(api_key) = config.openai_api_key.as_deref() else {
        warn!("OPENAI_API_KEY is not set; document questions are disabled");
        return Ok(AppState::new(orchestrator, status));
    };

    let orchestrator = match build_retrieval(config, api_key).await {
        Ok(retrieval) => {
            let report = retrieval.index().report();
            info!(
                folder = %report.folder.display(),
                documents = report.document_count,
                chunks = report.chunk_count,
                "documents processed"
            );
            status.report = Some(report.clone());
            orchestrator.with_backend(Arc::new(retrieval))
        }
        Err(e) => {
            error!(error = %e, "document processing failed");
            status.ingestion_error = Some(e.to_string());
            orchestrator
        }
    };

    Ok(AppState::new(orchestrator, status))
}

async fn build_retrieval(
    config: &AppConfig,
    api_key: &str,
) -> docqa_chat::Result<ConversationalRetrieval> {
    let mut embedder =
        OpenAIEmbeddingProvider::new(api_key)?.with_api_base(&config.openai_base_url);
    if let Some(model) = &config.embedding_model {
        embedder = embedder.with_model(model);
    }
    let mut llm = OpenAICompletionClient::new(api_key)?.with_api_base(&config.openai_base_url);
    if let Some(model) = &config.completion_model {
        llm = llm.with_model(model);
    }

    info!(
        folder = %config.data_dir.display(),
        file_type = %config.file_type,
        "processing documents"
    );
    let index =
        ingest_folder(&config.data_dir, config.file_type, config.rag_config()?, Arc::new(embedder))
            .await?;
    Ok(ConversationalRetrieval::new(index, Arc::new(llm)))
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/ask", post(ask))
        .route("/api/history", get(history).delete(clear_history))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let state = bootstrap(&config).await?;
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for docqa-server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("docqa-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// An error returned to API clients as `{"error": kind, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, kind: "BadRequest", message: message.into() }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        let status = match &err {
            AssistantError::Synthesis { .. } => StatusCode::BAD_GATEWAY,
            AssistantError::Ingestion(_)
            | AssistantError::Configuration(_)
            | AssistantError::FallbackTable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let message = match &err {
            AssistantError::Configuration(message) => message.clone(),
            other => other.to_string(),
        };
        Self { status, kind: err.kind(), message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.kind.to_string(), message: self.message };
        (self.status, Json(body)).into_response()
    }
}

async fn index() -> impl IntoResponse {
    Html(include_str!("../ui/index.html"))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status":"ok","service":"docqa-server"}))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.status();
    let (document_count, chunk_count) = status
        .report
        .as_ref()
        .map(|r| (r.document_count, r.chunk_count))
        .unwrap_or_default();

    Json(StatusResponse {
        credentials_present: status.credentials_present,
        documents_ready: state.orchestrator.is_ready(),
        data_dir: status.data_dir.display().to_string(),
        file_type: status.file_type.to_string(),
        document_count,
        chunk_count,
        ingestion_error: status.ingestion_error.clone(),
    })
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::bad_request("question cannot be empty"));
    }
    if !state.status.credentials_present {
        return Err(AssistantError::Configuration(MISSING_KEY_MESSAGE.to_string()).into());
    }

    let mut session = state.session.lock().await;
    let answer = state
        .orchestrator
        .answer(&request.question, session.turns())
        .await
        .inspect_err(|e| error!(error = %e, "failed to answer question"))?;

    let turn = session.append_turn(ChatTurn::new(request.question, answer.text.clone()));
    debug!(turn, origin = ?answer.origin, "recorded chat turn");

    Ok(Json(AskResponse {
        answer: answer.text,
        origin: answer.origin,
        sources: answer.sources,
        turn,
    }))
}

async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;
    let turns =
        session.recent_first().map(|(number, turn)| HistoryEntry::new(number, turn)).collect();
    Json(HistoryResponse { turns })
}

async fn clear_history(State(state): State<AppState>) -> Json<ClearHistoryResponse> {
    let mut session = state.session.lock().await;
    let cleared = session.len();
    session.clear();
    info!(cleared, "chat history cleared");
    Json(ClearHistoryResponse { cleared })
}
