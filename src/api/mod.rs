// src/api/mod.rs
use reqwest::{Client, StatusCode};
use serde::{Serialize, Deserialize};

use crate::analysis::AnalysisResult;
use crate::file::UploadedFile;
use crate::settings::Settings;

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", status_message(.status, .message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("unexpected response from backend: {0}")]
    Decode(String),
}

// Server-supplied text wins over the generic status line
fn status_message(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("HTTP error! status: {}", status.as_u16()),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub question: String,
    pub context: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// One attempt per call, no retries and no client-side timeout
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base_url: settings.backend_url.clone(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn analyze(&self, file: &UploadedFile) -> Result<AnalysisResult, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!(file = %file.name, bytes = file.bytes.len(), "submitting image for analysis");

        let resp = self.client
            .post(format!("{}{}", self.base_url, ANALYZE_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|e| !e.is_empty());
            return Err(ApiError::Status { status, message });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let resp = self.client
            .post(format!("{}{}", self.base_url, CHAT_PATH))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status { status, message: None });
        }

        let body = resp.text().await?;
        let reply: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(reply.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Json, Multipart};
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn spawn_backend(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        ApiClient::new(&Settings {
            backend_url: format!("http://{addr}"),
        })
    }

    fn chest_png() -> UploadedFile {
        UploadedFile::new("chest.png", b"\x89PNG fake".to_vec())
    }

    #[tokio::test]
    async fn analyze_uploads_file_field_and_parses_result() {
        let seen = Arc::new(Mutex::new(None::<(String, String, Vec<u8>)>));
        let seen_in_handler = seen.clone();

        let router = Router::new().route(
            ANALYZE_PATH,
            post(move |mut multipart: Multipart| {
                let seen = seen_in_handler.clone();
                async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().unwrap_or_default().to_string();
                        let data = field.bytes().await.unwrap().to_vec();
                        *seen.lock().unwrap() = Some((name, file_name, data));
                    }
                    Json(json!({
                        "findings": "- Opacity in left lung\n- Mild effusion",
                        "confidence": "82%",
                        "disclaimer": "Not a diagnosis"
                    }))
                }
            }),
        );

        let client = spawn_backend(router).await;
        let result = client.analyze(&chest_png()).await.unwrap();

        assert_eq!(result.findings_list(), vec!["Opacity in left lung", "Mild effusion"]);
        assert_eq!(result.confidence_text(), Some("82%"));
        assert_eq!(result.disclaimer, "Not a diagnosis");

        let (field, file_name, data) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(field, "file");
        assert_eq!(file_name, "chest.png");
        assert_eq!(data, b"\x89PNG fake".to_vec());
    }

    #[tokio::test]
    async fn analyze_surfaces_server_error_text() {
        let router = Router::new().route(
            ANALYZE_PATH,
            post(|| async {
                (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": "model unavailable"})))
            }),
        );

        let client = spawn_backend(router).await;
        let err = client.analyze(&chest_png()).await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[tokio::test]
    async fn analyze_falls_back_to_status_message() {
        let router = Router::new().route(
            ANALYZE_PATH,
            post(|| async { (AxumStatus::BAD_GATEWAY, "upstream down").into_response() }),
        );

        let client = spawn_backend(router).await;
        let err = client.analyze(&chest_png()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_success_body() {
        let router = Router::new().route(ANALYZE_PATH, post(|| async { "not json" }));

        let client = spawn_backend(router).await;
        let err = client.analyze(&chest_png()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn chat_posts_question_and_context() {
        let seen = Arc::new(Mutex::new(None::<Value>));
        let seen_in_handler = seen.clone();

        let router = Router::new().route(
            CHAT_PATH,
            post(move |Json(body): Json<Value>| {
                let seen = seen_in_handler.clone();
                async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({"answer": "Please consult a doctor."}))
                }
            }),
        );

        let client = spawn_backend(router).await;
        let request = ChatRequest {
            question: "What does opacity mean?".to_string(),
            context: "{\n  \"findings\": \"x\"\n}".to_string(),
        };
        let answer = client.chat(&request).await.unwrap();

        assert_eq!(answer, "Please consult a doctor.");
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["question"], "What does opacity mean?");
        assert_eq!(body["context"], "{\n  \"findings\": \"x\"\n}");
    }

    #[tokio::test]
    async fn chat_failure_ignores_error_payload() {
        let router = Router::new().route(
            CHAT_PATH,
            post(|| async {
                (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": "no key"})))
            }),
        );

        let client = spawn_backend(router).await;
        let request = ChatRequest {
            question: "hi".to_string(),
            context: String::new(),
        };
        let err = client.chat(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&Settings {
            backend_url: format!("http://{addr}"),
        });
        let err = client.analyze(&chest_png()).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn configured_trailing_slash_reaches_endpoint() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(CHAT_PATH, post(|| async { Json(json!({"answer": "ok"})) }));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let vars: std::collections::HashMap<String, String> =
            [("XRAY_ASSIST_BACKEND_URL".to_string(), format!("http://{addr}/"))].into_iter().collect();
        let settings = Settings::load_from(
            None,
            ::config::Environment::with_prefix(crate::settings::ENV_PREFIX).source(Some(vars)),
        )
        .unwrap();
        let client = ApiClient::new(&settings);
        assert_eq!(client.base_url(), format!("http://{addr}"));

        let request = ChatRequest {
            question: "q".to_string(),
            context: String::new(),
        };
        assert_eq!(client.chat(&request).await.unwrap(), "ok");
    }
}
