//! Servidor web Axum com WebSocket para a extração morfológica em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Json,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use lexique_core::{
    corpus::demo_documents, Document, DocumentAnalysis, Error, ExtractionPipeline, PipelineEvent,
    ScorerConfig,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Parâmetros do saco de palavras, comuns a todas as rotas de análise.
#[derive(Debug, Default, Deserialize)]
struct ScoringParams {
    #[serde(default)]
    min_frequency: Option<i64>,
    #[serde(default)]
    max_words: Option<i64>,
}

impl ScoringParams {
    /// Monta um pipeline para a requisição; parâmetros inválidos viram `Error::Configuration`.
    fn pipeline(&self) -> lexique_core::Result<ExtractionPipeline> {
        let max_words = match self.max_words {
            Some(n) => Some(usize::try_from(n).map_err(|_| {
                Error::configuration(format!("max_words must be positive, got {n}"))
            })?),
            None => None,
        };
        let config = ScorerConfig::new(self.min_frequency.unwrap_or(1), max_words);
        ExtractionPipeline::with_config(config)
    }
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    document: Document,
    #[serde(flatten)]
    params: ScoringParams,
}

#[derive(Deserialize)]
struct BatchRequest {
    documents: Vec<Document>,
    #[serde(flatten)]
    params: ScoringParams,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("LEXIQUE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor lexique iniciado em http://{}", addr);
    axum::serve(listener, app()).await
}

fn app() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/batch", post(batch_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-documents", get(demo_documents_handler))
        .layer(cors)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Análise de um documento via HTTP POST (sem streaming)
async fn analyze_handler(Json(req): Json<AnalyzeRequest>) -> Response {
    let pipeline = match req.params.pipeline() {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let document = req.document;
    match tokio::task::spawn_blocking(move || pipeline.analyze(&document)).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Análise de vários documentos; a ordem da resposta segue a da entrada
async fn batch_handler(Json(req): Json<BatchRequest>) -> Response {
    let pipeline = match req.params.pipeline() {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let documents = req.documents;
    info!("Lote recebido: {} documentos", documents.len());
    let result: Result<Vec<DocumentAnalysis>, _> =
        tokio::task::spawn_blocking(move || pipeline.analyze_batch(&documents)).await;
    match result {
        Ok(analyses) => Json(analyses).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Documentos anotados de demonstração
async fn demo_documents_handler() -> impl IntoResponse {
    Json(demo_documents())
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_websocket)
}

/// Lógica do WebSocket: recebe um documento, executa o pipeline e envia os eventos
async fn handle_websocket(mut socket: WebSocket) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let req = match serde_json::from_str::<AnalyzeRequest>(&text) {
                    Ok(req) => req,
                    Err(e) => {
                        warn!("Mensagem WebSocket inválida: {}", e);
                        let body = serde_json::json!({ "error": e.to_string() }).to_string();
                        if socket.send(Message::Text(body)).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                let pipeline = match req.params.pipeline() {
                    Ok(p) => p,
                    Err(e) => {
                        let body = serde_json::json!({ "error": e.to_string() }).to_string();
                        if socket.send(Message::Text(body)).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                info!(
                    "Analisando via WebSocket: {} sentenças",
                    req.document.sentences.len()
                );

                // O pipeline é síncrono: roda fora do runtime e devolve os eventos ao final
                let (tx_std, rx_std) = std::sync::mpsc::channel::<PipelineEvent>();
                let document = req.document;
                let handle = tokio::task::spawn_blocking(move || {
                    pipeline.analyze_streaming(&document, tx_std);
                });
                if let Err(e) = handle.await {
                    warn!("Pipeline interrompido: {}", e);
                    continue;
                }

                let events: Vec<PipelineEvent> = rx_std.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn sample_document() -> serde_json::Value {
        serde_json::json!({
            "id": "doc-1",
            "sentences": [{
                "text": "Le chat dort.",
                "tokens": [
                    { "text": "Le", "lemma": "le", "coarse_tag": "DET" },
                    { "text": "chat", "lemma": "chat", "coarse_tag": "NOUN" },
                    {
                        "text": "dort",
                        "lemma": "dormir",
                        "coarse_tag": "VERB",
                        "morph_features": "Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin"
                    },
                    { "text": ".", "lemma": ".", "coarse_tag": "PUNCT" }
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_document() {
        let (status, body) =
            post_json("/analyze", serde_json::json!({ "document": sample_document() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document_id"], "doc-1");
        assert_eq!(body["verbs"][0]["tense_label"], "Indicatif Présent");
        assert_eq!(body["noun_phrases"][0]["matched_span_text"], "Le chat");
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_config() {
        let (status, body) = post_json(
            "/analyze",
            serde_json::json!({ "document": sample_document(), "min_frequency": -1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("min_frequency"));

        let (status, _) = post_json(
            "/analyze",
            serde_json::json!({ "document": sample_document(), "max_words": 0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let mut second = sample_document();
        second["id"] = serde_json::json!("doc-2");
        let (status, body) = post_json(
            "/analyze/batch",
            serde_json::json!({ "documents": [sample_document(), second], "max_words": 5 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let analyses = body.as_array().unwrap();
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0]["document_id"], "doc-1");
        assert_eq!(analyses[1]["document_id"], "doc-2");
    }

    #[tokio::test]
    async fn test_demo_documents() {
        let response = app()
            .oneshot(Request::builder().uri("/demo-documents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let docs: Vec<Document> = serde_json::from_slice(&bytes).unwrap();
        assert!(!docs.is_empty());
        assert!(docs.iter().all(|d| d.id.is_some()));
    }
}
