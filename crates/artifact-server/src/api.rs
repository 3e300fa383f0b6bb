use {
    axum::{
        Json,
        Router,
        extract::{Path, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
        routing::get,
    },
    registry::{
        AddressBook,
        Contracts,
        token_book::{RANDOM_TOKENS_FILE, TOKENS_FILE},
    },
    serde::Serialize,
    std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc},
    tokio::sync::oneshot,
    tower_http::{cors::CorsLayer, trace::TraceLayer},
};

/// Published files served under a fixed path, `(route, file)`.
const FIXED_FILES: [(&str, &str); 6] = [
    ("/api/tokens", TOKENS_FILE),
    ("/api/random_tokens", RANDOM_TOKENS_FILE),
    ("/api/router", "router.json"),
    ("/api/factory", "factory.json"),
    ("/api/pairs", "pairs.json"),
    ("/api/keys", "keys.json"),
];

pub struct Api {
    pub addr: SocketAddr,
    /// Directory the deployer publishes into.
    pub public_dir: PathBuf,
}

impl Api {
    pub async fn serve(
        self,
        bind: Option<oneshot::Sender<SocketAddr>>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let app = router(self.public_dir);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "serving artifacts");
        if let Some(bind) = bind {
            let _ = bind.send(local_addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

pub fn router(public_dir: PathBuf) -> Router {
    let mut api = Router::new()
        .route("/", get(healthy))
        .route("/api/{network}/{contract_name}", get(contract_address));
    for (route, file) in FIXED_FILES {
        api = api.route(
            route,
            get(move |State(dir): State<Arc<PathBuf>>| async move { serve_file(&dir, file).await }),
        );
    }

    api.with_state(Arc::new(public_dir))
        .layer(CorsLayer::new().allow_origin(tower_http::cors::Any))
        .layer(TraceLayer::new_for_http().make_span_with(observe::tracing_axum::make_span))
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn json(body: impl Into<axum::body::Body>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body.into(),
    )
        .into_response()
}

async fn healthy() -> &'static str {
    "healthy"
}

/// Reads a published file. `None` if it does not exist.
async fn read(dir: &std::path::Path, file: &str) -> Result<Option<Vec<u8>>, Response> {
    match tokio::fs::read(dir.join(file)).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            tracing::error!(?err, %file, "failed to read published file");
            Err(error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read file",
            ))
        }
    }
}

async fn serve_file(dir: &std::path::Path, file: &str) -> Response {
    match read(dir, file).await {
        Ok(Some(content)) => json(content),
        Ok(None) => error(StatusCode::NOT_FOUND, "file not found"),
        Err(response) => response,
    }
}

async fn contract_address(
    State(dir): State<Arc<PathBuf>>,
    Path((network, contract_name)): Path<(String, String)>,
) -> Response {
    // Network names end up in a file name.
    if !network
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return error(StatusCode::NOT_FOUND, "file not found");
    }

    let content = match read(&dir, &AddressBook::file_name(&network)).await {
        Ok(Some(content)) => content,
        Ok(None) => return error(StatusCode::NOT_FOUND, "file not found"),
        Err(response) => return response,
    };
    let contracts: Contracts = match serde_json::from_slice(&content) {
        Ok(contracts) => contracts,
        Err(err) => {
            tracing::warn!(?err, %network, "unparsable contracts file");
            return error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid contracts file",
            );
        }
    };
    match contracts.ids.get(&contract_name) {
        Some(address) => json(serde_json::json!({ "address": address }).to_string()),
        None => error(StatusCode::NOT_FOUND, "contract name not found"),
    }
}
