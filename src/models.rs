//! Request and response structures for the OnlysaidKB API
//!
//! All structures are transient: built per call, serialized, discarded.
//! Optional fields carry `skip_serializing_if` so unset values are omitted
//! from outgoing bodies entirely rather than sent as nulls.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for the `/query` endpoint (retrieval + answer generation)
///
/// The remote service supports a streaming mode, but this adapter is
/// synchronous request/response only: `streaming` is private and always
/// serialized as `false`. There is deliberately no way to set it.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub workspace_id: String,
    pub query: String,
    streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_bases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl QueryRequest {
    pub fn new(workspace_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            query: query.into(),
            streaming: false,
            knowledge_bases: None,
            model: None,
            conversation_history: None,
            top_k: None,
            preferred_language: None,
            message_id: None,
        }
    }

    /// Validate required fields before any network call is attempted
    pub fn validate(&self) -> Result<()> {
        if self.workspace_id.trim().is_empty() {
            return Err(Error::Validation(
                "workspace_id must not be empty".to_string(),
            ));
        }
        if self.query.trim().is_empty() {
            return Err(Error::Validation("query must not be empty".to_string()));
        }
        if self.top_k == Some(0) {
            return Err(Error::Validation("top_k must be positive".to_string()));
        }
        Ok(())
    }
}

/// Request body for the `/retrieve` endpoint (raw document retrieval)
///
/// No model, language, or history fields: retrieval never invokes answer
/// generation.
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveRequest {
    pub workspace_id: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_bases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl RetrieveRequest {
    pub fn new(workspace_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            query: query.into(),
            knowledge_bases: None,
            top_k: None,
        }
    }

    /// Validate required fields before any network call is attempted
    pub fn validate(&self) -> Result<()> {
        if self.workspace_id.trim().is_empty() {
            return Err(Error::Validation(
                "workspace_id must not be empty".to_string(),
            ));
        }
        if self.query.trim().is_empty() {
            return Err(Error::Validation("query must not be empty".to_string()));
        }
        if self.top_k == Some(0) {
            return Err(Error::Validation("top_k must be positive".to_string()));
        }
        Ok(())
    }
}

/// A single scored document match returned by `/retrieve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatch {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub text: String,
}

/// Debug metadata attached to envelopes: what was sent, and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Uniform success/failure wrapper returned by every gateway operation
///
/// Transport, remote, and decode failures are carried here rather than
/// surfaced as errors; callers inspect `success` and decide for themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(rename = "_debug", skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl ResultEnvelope {
    pub fn success(result: Value, debug: DebugInfo) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            status_code: None,
            debug: Some(debug),
        }
    }

    pub fn failure(error: impl Into<String>, status_code: Option<u16>, debug: DebugInfo) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            status_code,
            debug: Some(debug),
        }
    }

    /// Project the remote `results` array into typed document matches
    ///
    /// Returns an empty list when the field is absent or the envelope is a
    /// failure.
    pub fn document_matches(&self) -> Vec<DocumentMatch> {
        self.result
            .as_ref()
            .and_then(|r| r.get("results"))
            .and_then(|r| serde_json::from_value(r.clone()).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_forces_streaming_off() {
        let req = QueryRequest::new("ws-1", "what is rust?");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["streaming"], json!(false));
    }

    #[test]
    fn test_query_request_omits_unset_optionals() {
        let req = QueryRequest::new("ws-1", "what is rust?");
        let body = serde_json::to_value(&req).unwrap();
        let mut keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["query", "streaming", "workspace_id"]);
    }

    #[test]
    fn test_query_request_includes_set_optionals() {
        let mut req = QueryRequest::new("ws-1", "what is rust?");
        req.top_k = Some(3);
        req.knowledge_bases = Some(vec!["kb-a".to_string()]);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["top_k"], json!(3));
        assert_eq!(body["knowledge_bases"], json!(["kb-a"]));
        assert!(body.get("model").is_none());
    }

    #[test]
    fn test_validation_rejects_empty_required_fields() {
        assert!(QueryRequest::new("", "q").validate().is_err());
        assert!(QueryRequest::new("ws", "   ").validate().is_err());
        assert!(QueryRequest::new("ws", "q").validate().is_ok());

        assert!(RetrieveRequest::new("", "q").validate().is_err());
        assert!(RetrieveRequest::new("ws", "").validate().is_err());
        assert!(RetrieveRequest::new("ws", "q").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_top_k() {
        let mut req = QueryRequest::new("ws", "q");
        req.top_k = Some(0);
        assert!(req.validate().is_err());

        let mut req = RetrieveRequest::new("ws", "q");
        req.top_k = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_envelope_serialization_omits_unset_fields() {
        let env = ResultEnvelope::success(
            json!({"answer": "42"}),
            DebugInfo {
                endpoint: "/query".to_string(),
                payload: None,
            },
        );
        let body = serde_json::to_value(&env).unwrap();
        assert_eq!(body["success"], json!(true));
        assert!(body.get("error").is_none());
        assert!(body.get("status_code").is_none());
        assert_eq!(body["_debug"]["endpoint"], json!("/query"));
    }

    #[test]
    fn test_document_matches_projection() {
        let env = ResultEnvelope::success(
            json!({"results": [{"source": "doc1", "score": 0.9, "text": "hello"}]}),
            DebugInfo {
                endpoint: "/retrieve".to_string(),
                payload: None,
            },
        );
        let matches = env.document_matches();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].source, "doc1");
        assert_eq!(matches[0].score, 0.9);
    }

    #[test]
    fn test_document_matches_empty_when_field_absent() {
        let env = ResultEnvelope::success(
            json!({}),
            DebugInfo {
                endpoint: "/retrieve".to_string(),
                payload: None,
            },
        );
        assert!(env.document_matches().is_empty());
    }
}
