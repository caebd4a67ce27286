//! MCP resource templates and handlers
//!
//! Three addressable surfaces, all backed by the workspace view and status
//! endpoints:
//!
//! - `onlysaidkb://workspace/{workspace_id}/knowledge_bases`
//! - `onlysaidkb://workspace/{workspace_id}/kb/{kb_id}/status`
//! - `onlysaidkb://workspace/{workspace_id}/structure`

use super::types::{ResourceContent, ResourceTemplate};
use crate::client::KbClient;
use crate::error::{Error, Result};
use crate::models::ResultEnvelope;

/// Get all advertised resource templates
pub fn get_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        ResourceTemplate {
            uri_template: "onlysaidkb://workspace/{workspace_id}/knowledge_bases".to_string(),
            name: "Workspace knowledge bases".to_string(),
            description: "List of knowledge bases registered in a workspace".to_string(),
            mime_type: "application/json".to_string(),
        },
        ResourceTemplate {
            uri_template: "onlysaidkb://workspace/{workspace_id}/kb/{kb_id}/status".to_string(),
            name: "Knowledge base status".to_string(),
            description: "Status of a specific knowledge base".to_string(),
            mime_type: "application/json".to_string(),
        },
        ResourceTemplate {
            uri_template: "onlysaidkb://workspace/{workspace_id}/structure".to_string(),
            name: "Workspace structure".to_string(),
            description: "Full structure of all knowledge bases in a workspace".to_string(),
            mime_type: "application/json".to_string(),
        },
    ]
}

/// A parsed resource URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    KnowledgeBases { workspace_id: String },
    KbStatus { workspace_id: String, kb_id: String },
    Structure { workspace_id: String },
}

/// Parse an `onlysaidkb://` resource URI into its addressed surface
pub fn parse_resource_uri(uri: &str) -> Option<ResourceRef> {
    let rest = uri.strip_prefix("onlysaidkb://workspace/")?;
    let segments: Vec<&str> = rest.split('/').collect();

    match segments.as_slice() {
        [workspace_id, "knowledge_bases"] if !workspace_id.is_empty() => {
            Some(ResourceRef::KnowledgeBases {
                workspace_id: workspace_id.to_string(),
            })
        }
        [workspace_id, "kb", kb_id, "status"] if !workspace_id.is_empty() && !kb_id.is_empty() => {
            Some(ResourceRef::KbStatus {
                workspace_id: workspace_id.to_string(),
                kb_id: kb_id.to_string(),
            })
        }
        [workspace_id, "structure"] if !workspace_id.is_empty() => {
            Some(ResourceRef::Structure {
                workspace_id: workspace_id.to_string(),
            })
        }
        _ => None,
    }
}

/// Read a resource by URI
pub async fn handle_resource_read(uri: &str, client: &KbClient) -> Result<ResourceContent> {
    let resource = parse_resource_uri(uri)
        .ok_or_else(|| Error::McpProtocol(format!("Unknown resource URI: {}", uri)))?;

    let envelope = match &resource {
        ResourceRef::KnowledgeBases { workspace_id } => {
            client.list_knowledge_bases(workspace_id).await?
        }
        ResourceRef::KbStatus {
            workspace_id,
            kb_id,
        } => client.kb_status(workspace_id, kb_id).await?,
        ResourceRef::Structure { workspace_id } => client.view_workspace(workspace_id).await?,
    };

    Ok(ResourceContent {
        uri: uri.to_string(),
        mime_type: "application/json".to_string(),
        text: render_envelope(&envelope)?,
    })
}

fn render_envelope(envelope: &ResultEnvelope) -> Result<String> {
    Ok(serde_json::to_string_pretty(envelope)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_resource_uris() {
        assert_eq!(
            parse_resource_uri("onlysaidkb://workspace/ws-1/knowledge_bases"),
            Some(ResourceRef::KnowledgeBases {
                workspace_id: "ws-1".to_string()
            })
        );
        assert_eq!(
            parse_resource_uri("onlysaidkb://workspace/ws-1/kb/kb-a/status"),
            Some(ResourceRef::KbStatus {
                workspace_id: "ws-1".to_string(),
                kb_id: "kb-a".to_string()
            })
        );
        assert_eq!(
            parse_resource_uri("onlysaidkb://workspace/ws-1/structure"),
            Some(ResourceRef::Structure {
                workspace_id: "ws-1".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed_uris() {
        assert!(parse_resource_uri("onlysaidkb://workspace//structure").is_none());
        assert!(parse_resource_uri("onlysaidkb://workspace/ws-1").is_none());
        assert!(parse_resource_uri("onlysaidkb://workspace/ws-1/kb//status").is_none());
        assert!(parse_resource_uri("other://workspace/ws-1/structure").is_none());
        assert!(parse_resource_uri("onlysaidkb://workspace/ws-1/unknown").is_none());
    }

    #[tokio::test]
    async fn test_read_knowledge_bases_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/ws-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"dataSources": ["kb-a", "kb-b"]})),
            )
            .mount(&server)
            .await;

        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        let client = KbClient::new(&config).unwrap();

        let content = handle_resource_read("onlysaidkb://workspace/ws-1/knowledge_bases", &client)
            .await
            .unwrap();
        assert_eq!(content.mime_type, "application/json");

        let envelope: Value = serde_json::from_str(&content.text).unwrap();
        assert_eq!(envelope["success"], json!(true));
        assert_eq!(envelope["result"], json!(["kb-a", "kb-b"]));
    }

    #[tokio::test]
    async fn test_read_unknown_resource_is_protocol_error() {
        let config = Config::default();
        let client = KbClient::new(&config).unwrap();

        let result = handle_resource_read("onlysaidkb://nope", &client).await;
        assert!(matches!(result, Err(Error::McpProtocol(_))));
    }
}
