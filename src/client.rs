//! Remote search and commentary service
//!
//! Both endpoints take a JSON `POST` and answer with JSON. Any field missing
//! from a reply is read as an empty string.

use crate::config::ServiceConfig;
use crate::error::{ServiceFailure, TakhrijError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReply {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRequest {
    pub arabic: String,
    pub english: String,
    pub reference: String,
    pub collection: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryReply {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub commentary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chain: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub evaluation: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend as seen by the session controller
#[async_trait]
pub trait HadithService: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply, ServiceFailure>;

    async fn commentary(&self, request: &CommentaryRequest) -> Result<CommentaryReply, ServiceFailure>;
}

/// `HadithService` over HTTP
#[derive(Debug, Clone)]
pub struct HttpHadithService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpHadithService {
    pub fn new(config: ServiceConfig) -> Result<Self, TakhrijError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TakhrijError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, ServiceFailure>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(ServiceFailure::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceFailure::Decode(e.to_string()))
    }
}

#[async_trait]
impl HadithService for HttpHadithService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply, ServiceFailure> {
        self.post_json(&self.config.search_url(), request).await
    }

    async fn commentary(&self, request: &CommentaryRequest) -> Result<CommentaryReply, ServiceFailure> {
        self.post_json(&self.config.commentary_url(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::time::Duration;

    /// Serve `app` on an ephemeral port and return a client pointed at it
    async fn serve(app: Router) -> HttpHadithService {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let mut config = ServiceConfig::with_base_url(format!("http://{}", addr));
        config.request_timeout = Some(Duration::from_secs(2));
        HttpHadithService::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let app = Router::new().route(
            "/search-hadith",
            post(|Json(req): Json<SearchRequest>| async move {
                Json(serde_json::json!({ "result": format!("You searched {}", req.query) }))
            }),
        );
        let service = serve(app).await;

        let reply = service
            .search(&SearchRequest { query: "intention".to_string() })
            .await
            .unwrap();
        assert_eq!(reply.result, "You searched intention");
    }

    #[tokio::test]
    async fn test_missing_and_null_fields_read_as_empty() {
        let app = Router::new()
            .route("/search-hadith", post(|| async { Json(serde_json::json!({})) }))
            .route(
                "/gpt-commentary",
                post(|| async { Json(serde_json::json!({ "commentary": "text", "chain": null })) }),
            );
        let service = serve(app).await;

        let reply = service
            .search(&SearchRequest { query: "x".to_string() })
            .await
            .unwrap();
        assert_eq!(reply.result, "");

        let reply = service.commentary(&CommentaryRequest::default()).await.unwrap();
        assert_eq!(reply.commentary, "text");
        assert_eq!(reply.chain, "");
        assert_eq!(reply.evaluation, "");
    }

    #[tokio::test]
    async fn test_commentary_request_body() {
        let app = Router::new().route(
            "/gpt-commentary",
            post(|Json(req): Json<CommentaryRequest>| async move {
                Json(serde_json::json!({
                    "commentary": req.english,
                    "chain": req.collection,
                    "evaluation": req.reference,
                }))
            }),
        );
        let service = serve(app).await;

        let reply = service
            .commentary(&CommentaryRequest {
                arabic: "نص".to_string(),
                english: "Text".to_string(),
                reference: "Sahih Muslim 1".to_string(),
                collection: "muslim".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.commentary, "Text");
        assert_eq!(reply.chain, "muslim");
        assert_eq!(reply.evaluation, "Sahih Muslim 1");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let app = Router::new().route(
            "/search-hadith",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let service = serve(app).await;

        let err = service
            .search(&SearchRequest { query: "x".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err, ServiceFailure::Status(502));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let app = Router::new().route("/search-hadith", post(|| async { "<html>sleeping</html>" }));
        let service = serve(app).await;

        let err = service
            .search(&SearchRequest { query: "x".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceFailure::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpHadithService::new(ServiceConfig::with_base_url(format!("http://{}", addr))).unwrap();
        let err = service
            .search(&SearchRequest { query: "x".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceFailure::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let app = Router::new().route(
            "/search-hadith",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "result": "late" }))
            }),
        );
        let mut service = serve(app).await;
        let mut config = service.config().clone();
        config.request_timeout = Some(Duration::from_millis(200));
        service = HttpHadithService::new(config).unwrap();

        let err = service
            .search(&SearchRequest { query: "x".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err, ServiceFailure::Timeout);
    }
}
