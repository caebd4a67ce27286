//! HTTP gateway client for the OnlysaidKB backend
//!
//! Each operation is one request/one response: validate arguments, build the
//! payload or path, issue a single HTTP call, and normalize the outcome into
//! a [`ResultEnvelope`]. Transport, remote, and decode failures are reported
//! inside the envelope; only validation failures surface as `Err`, before any
//! I/O happens. There is no retry and no state shared across calls.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{DebugInfo, QueryRequest, ResultEnvelope, RetrieveRequest};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Maximum number of characters of a remote body carried in a failure envelope
const MAX_BODY_EXCERPT: usize = 2048;

/// Client for the OnlysaidKB knowledge-base API
#[derive(Debug, Clone)]
pub struct KbClient {
    client: Client,
    base_url: Url,
    default_top_k: u32,
}

impl KbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            default_top_k: config.default_top_k,
        })
    }

    /// Build a full endpoint URL; the base URL may itself carry a path prefix
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Query knowledge bases and get an AI-generated answer
    pub async fn query(&self, request: &QueryRequest) -> Result<ResultEnvelope> {
        request.validate()?;
        let payload = serde_json::to_value(request)?;
        Ok(self.execute("/query", Some(payload)).await)
    }

    /// Retrieve raw scored document matches without answer generation
    ///
    /// `top_k` falls back to the configured default when unset.
    pub async fn retrieve(&self, request: &RetrieveRequest) -> Result<ResultEnvelope> {
        request.validate()?;
        let mut effective = request.clone();
        if effective.top_k.is_none() {
            effective.top_k = Some(self.default_top_k);
        }
        let payload = serde_json::to_value(&effective)?;
        Ok(self.execute("/retrieve", Some(payload)).await)
    }

    /// Fetch the full workspace structure, unmodified
    pub async fn view_workspace(&self, workspace_id: &str) -> Result<ResultEnvelope> {
        validate_identifier("workspace_id", workspace_id)?;
        Ok(self
            .execute(&format!("/view/{}", workspace_id), None)
            .await)
    }

    /// List the knowledge bases registered in a workspace
    ///
    /// A client-side projection over [`view_workspace`](Self::view_workspace):
    /// the `dataSources` field of the workspace structure, or an empty list
    /// when the field is absent.
    pub async fn list_knowledge_bases(&self, workspace_id: &str) -> Result<ResultEnvelope> {
        let envelope = self.view_workspace(workspace_id).await?;
        if !envelope.success {
            return Ok(envelope);
        }

        let sources = envelope
            .result
            .as_ref()
            .and_then(|r| r.get("dataSources"))
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        Ok(ResultEnvelope {
            result: Some(sources),
            ..envelope
        })
    }

    /// Fetch the status of a single knowledge base, unmodified
    pub async fn kb_status(&self, workspace_id: &str, kb_id: &str) -> Result<ResultEnvelope> {
        validate_identifier("workspace_id", workspace_id)?;
        validate_identifier("kb_id", kb_id)?;
        Ok(self
            .execute(&format!("/kb_status/{}/{}", workspace_id, kb_id), None)
            .await)
    }

    /// Issue one HTTP call and normalize the outcome into an envelope
    ///
    /// `Some(payload)` issues a POST with a JSON body, `None` a plain GET.
    async fn execute(&self, path: &str, payload: Option<Value>) -> ResultEnvelope {
        let debug_info = DebugInfo {
            endpoint: path.to_string(),
            payload: payload.clone(),
        };

        let url = self.endpoint(path);
        debug!("Requesting {}", url);

        let request = match &payload {
            Some(body) => self
                .client
                .post(&url)
                .json(body)
                .header(ACCEPT, "application/json"),
            None => self.client.get(&url).header(ACCEPT, "application/json"),
        };

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                return ResultEnvelope::failure(
                    format!("Request to {} failed: {}", path, e),
                    None,
                    debug_info,
                );
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                return ResultEnvelope::failure(
                    format!("Failed to read response body: {}", e),
                    Some(status.as_u16()),
                    debug_info,
                );
            }
        };

        if !status.is_success() {
            return ResultEnvelope::failure(
                format!("HTTP {}: {}", status.as_u16(), truncate_body(&body)),
                Some(status.as_u16()),
                debug_info,
            );
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => ResultEnvelope::success(value, debug_info),
            Err(e) => ResultEnvelope::failure(
                format!("Invalid JSON response: {} (body: {})", e, truncate_body(&body)),
                Some(status.as_u16()),
                debug_info,
            ),
        }
    }
}

fn validate_identifier(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", name)));
    }
    Ok(())
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let excerpt: String = body.chars().take(MAX_BODY_EXCERPT).collect();
    format!("{}... (truncated)", excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> Config {
        Config {
            base_url: base_url.to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_query_posts_streaming_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(json!({"streaming": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "42"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client
            .query(&QueryRequest::new("ws-1", "what is the answer?"))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.result.unwrap()["answer"], json!("42"));
    }

    #[tokio::test]
    async fn test_query_body_has_no_null_optionals() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        client
            .query(&QueryRequest::new("ws-1", "hello"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let mut keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["query", "streaming", "workspace_id"]);
    }

    #[tokio::test]
    async fn test_retrieve_parses_scored_matches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrieve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"results": [{"source": "doc1", "score": 0.9, "text": "..."}]}),
            ))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client
            .retrieve(&RetrieveRequest::new("ws-1", "rust"))
            .await
            .unwrap();

        assert!(envelope.success);
        let matches = envelope.document_matches();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 0.9);
    }

    #[tokio::test]
    async fn test_retrieve_applies_default_top_k() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrieve"))
            .and(body_partial_json(json!({"top_k": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client
            .retrieve(&RetrieveRequest::new("ws-1", "rust"))
            .await
            .unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_remote_error_becomes_failure_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client
            .query(&QueryRequest::new("ws-1", "hello"))
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.status_code, Some(404));
        assert!(envelope.error.unwrap().contains("not found"));
        let debug_info = envelope.debug.unwrap();
        assert_eq!(debug_info.endpoint, "/query");
        assert!(debug_info.payload.is_some());
    }

    #[tokio::test]
    async fn test_undecodable_body_becomes_failure_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client.view_workspace("ws-1").await.unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.status_code, Some(200));
        assert!(envelope.error.unwrap().contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failure_envelope() {
        // Nothing listens here
        let client = KbClient::new(&test_config("http://127.0.0.1:1")).unwrap();
        let envelope = client.view_workspace("ws-1").await.unwrap();

        assert!(!envelope.success);
        assert!(envelope.status_code.is_none());
        assert!(envelope.error.is_some());
    }

    #[tokio::test]
    async fn test_empty_query_fails_before_any_request() {
        let server = MockServer::start().await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let result = client.query(&QueryRequest::new("ws-1", "")).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = client.retrieve(&RetrieveRequest::new("", "q")).await;
        assert!(matches!(result, Err(Error::Validation(_))));

        let requests = server.received_requests().await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_list_knowledge_bases_projects_data_sources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/ws-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"dataSources": ["kb-a", "kb-b"], "other": 1})),
            )
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client.list_knowledge_bases("ws-1").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.result.unwrap(), json!(["kb-a", "kb-b"]));
    }

    #[tokio::test]
    async fn test_list_knowledge_bases_missing_field_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client.list_knowledge_bases("ws-1").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.result.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_view_workspace_returns_full_body() {
        let server = MockServer::start().await;
        let structure = json!({"dataSources": ["kb-a"], "folders": {"root": []}});
        Mock::given(method("GET"))
            .and(path("/view/ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(structure.clone()))
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let envelope = client.view_workspace("ws-1").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.result.unwrap(), structure);
    }

    #[tokio::test]
    async fn test_kb_status_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kb_status/ws-1/kb-a"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "ready", "docs": 12})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = KbClient::new(&test_config(&server.uri())).unwrap();
        let first = client.kb_status("ws-1", "kb-a").await.unwrap();
        let second = client.kb_status("ws-1", "kb-a").await.unwrap();

        assert!(first.success);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/kb/view/ws-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/api/kb", server.uri());
        let client = KbClient::new(&test_config(&base)).unwrap();
        let envelope = client.view_workspace("ws-1").await.unwrap();
        assert!(envelope.success);
    }

    #[test]
    fn test_truncate_body_caps_long_bodies() {
        let long = "x".repeat(MAX_BODY_EXCERPT * 2);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("(truncated)"));

        let short = "short body";
        assert_eq!(truncate_body(short), short);
    }
}
