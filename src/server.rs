use crate::{
    config::Config,
    envelope::{failure, success},
    errors::{FsError, FsResult, Operation},
    files::{FileRecord, FileRepository, WorkingDir},
};
use anyhow::Context;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::Uri,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub workdir: Arc<WorkingDir>,
    pub repo: FileRepository,
}

impl AppState {
    pub fn new(cfg: Config, workdir: Arc<WorkingDir>) -> Self {
        let repo = FileRepository::new(workdir);
        Self {
            cfg: Arc::new(cfg),
            workdir: repo.workdir().clone(),
            repo,
        }
    }
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.cfg.addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

pub fn build_router(state: AppState) -> Router {
    let limit_bytes = state.cfg.limits.max_request_kb.saturating_mul(1024);
    Router::new()
        .route("/", get(status))
        .route("/files", get(list_files))
        .route("/change_dir/*path", post(change_dir))
        .route(
            "/create/:filename",
            post(create_file).layer(RequestBodyLimitLayer::new(limit_bytes)),
        )
        .route("/delete/:filename", delete(delete_file))
        .route("/:filename", get(file_data))
        .layer(DefaultBodyLimit::max(limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct CurrentDir {
    curr_dir: String,
}

#[derive(Debug, Serialize)]
struct DirChanged {
    message: String,
    curr_dir: String,
}

#[derive(Debug, Serialize)]
struct FileList {
    files: Vec<FileRecord>,
}

#[derive(Debug, Serialize)]
struct Deleted {
    location: String,
}

#[derive(Debug, Deserialize)]
struct ChangeDirQuery {
    autocreate: Option<String>,
}

async fn status(State(state): State<AppState>) -> Response {
    let curr_dir = state.workdir.get().display().to_string();
    success(CurrentDir { curr_dir }).into_response()
}

/// A segment that does not decode to UTF-8 is an invalid path, reported in
/// the envelope like any other.
fn path_arg(arg: Result<Path<String>, PathRejection>, uri: &Uri) -> FsResult<String> {
    arg.map(|Path(value)| value).map_err(|rejection| {
        tracing::debug!(uri = %uri, rejection = %rejection.body_text(), "undecodable path");
        FsError::invalid_path(uri.path())
    })
}

async fn change_dir(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ChangeDirQuery>, QueryRejection>,
) -> Response {
    let audit = Audit::start(Operation::ChangeDir);
    let path = match path_arg(path, &uri) {
        Ok(path) => path,
        Err(err) => return audit.finish::<DirChanged>(Err(err)),
    };
    info!(request_id = %audit.request_id, path = %path, "received path");
    let autocreate = match query {
        Ok(Query(query)) => !query
            .autocreate
            .map(|v| v.eq_ignore_ascii_case("false"))
            .unwrap_or(false),
        Err(_) => return audit.finish::<DirChanged>(Err(FsError::invalid_path(uri.to_string()))),
    };
    let outcome = state.repo.change_dir(&path, autocreate).map(|dir| {
        let curr_dir = dir.display().to_string();
        DirChanged {
            message: format!("The current directory has been successfully changed to \"{curr_dir}\"."),
            curr_dir,
        }
    });
    audit.finish(outcome)
}

async fn list_files(State(state): State<AppState>) -> Response {
    let audit = Audit::start(Operation::ListFiles);
    audit.finish(state.repo.list_files().map(|files| FileList { files }))
}

async fn file_data(
    State(state): State<AppState>,
    uri: Uri,
    filename: Result<Path<String>, PathRejection>,
) -> Response {
    let audit = Audit::start(Operation::GetFile);
    let outcome = path_arg(filename, &uri).and_then(|name| state.repo.file_data(&name, true));
    audit.finish(outcome)
}

async fn create_file(
    State(state): State<AppState>,
    uri: Uri,
    filename: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    let audit = Audit::start(Operation::CreateFile);
    let outcome = path_arg(filename, &uri).and_then(|name| state.repo.create_file(&name, &body));
    audit.finish(outcome)
}

async fn delete_file(
    State(state): State<AppState>,
    uri: Uri,
    filename: Result<Path<String>, PathRejection>,
) -> Response {
    let audit = Audit::start(Operation::DeleteFile);
    let outcome = path_arg(filename, &uri)
        .and_then(|name| state.repo.delete_file(&name))
        .map(|path| Deleted {
            location: path.display().to_string(),
        });
    audit.finish(outcome)
}

/// One `audit` line per request, written when the outcome is rendered.
struct Audit {
    request_id: uuid::Uuid,
    operation: Operation,
    started: Instant,
}

impl Audit {
    fn start(operation: Operation) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4(),
            operation,
            started: Instant::now(),
        }
    }

    fn finish<T: Serialize>(self, outcome: FsResult<T>) -> Response {
        let code = match &outcome {
            Ok(_) => "OK",
            Err(e) => e.code(),
        };
        info!(
            request_id = %self.request_id,
            operation = self.operation.name(),
            code = code,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "audit"
        );
        match outcome {
            Ok(body) => success(body).into_response(),
            Err(err) => failure(self.operation, &err).into_response(),
        }
    }
}
