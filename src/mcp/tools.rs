//! MCP tool definitions and handlers

use super::types::{ToolDefinition, ToolResult};
use crate::client::KbClient;
use crate::error::Error;
use crate::models::{QueryRequest, ResultEnvelope, RetrieveRequest};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "query_knowledge_base".to_string(),
            description: "Query knowledge bases with natural language and get an AI-generated answer based on retrieved documents. Performs both retrieval and generation.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "workspace_id": {
                        "type": "string",
                        "description": "The workspace ID containing the knowledge bases"
                    },
                    "query": {
                        "type": "string",
                        "description": "The natural language query to ask"
                    },
                    "knowledge_bases": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Knowledge base IDs to search in (optional, searches all if not provided)"
                    },
                    "model": {
                        "type": "string",
                        "description": "AI model to use for generation (optional)"
                    },
                    "conversation_history": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Previous conversation context as role-tagged lines (optional)"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Number of top documents to retrieve (optional)",
                        "minimum": 1
                    },
                    "preferred_language": {
                        "type": "string",
                        "description": "Preferred language code for the response (optional)"
                    },
                    "message_id": {
                        "type": "string",
                        "description": "Message ID for tracking (optional)"
                    }
                },
                "required": ["workspace_id", "query"]
            }),
        },
        ToolDefinition {
            name: "retrieve_from_knowledge_base".to_string(),
            description: "Retrieve the most relevant document excerpts from knowledge bases without AI answer generation. Returns raw scored matches.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "workspace_id": {
                        "type": "string",
                        "description": "The workspace ID containing the knowledge bases"
                    },
                    "query": {
                        "type": "string",
                        "description": "The search query to find relevant documents"
                    },
                    "knowledge_bases": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Knowledge base IDs to search in (optional, searches all if not provided)"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Number of top documents to retrieve (optional)",
                        "minimum": 1
                    }
                },
                "required": ["workspace_id", "query"]
            }),
        },
    ]
}

/// Handle a tool call
pub async fn handle_tool_call(
    name: &str,
    arguments: &HashMap<String, Value>,
    client: &KbClient,
) -> ToolResult {
    match name {
        "query_knowledge_base" => handle_query(arguments, client).await,
        "retrieve_from_knowledge_base" => handle_retrieve(arguments, client).await,
        _ => ToolResult::error(format!("Unknown tool: {}", name)),
    }
}

/// Handle query_knowledge_base tool
///
/// Any caller-supplied `streaming` argument is ignored: the outgoing payload
/// always requests the non-streaming mode.
async fn handle_query(arguments: &HashMap<String, Value>, client: &KbClient) -> ToolResult {
    let workspace_id = match arguments.get("workspace_id").and_then(|v| v.as_str()) {
        Some(w) => w,
        None => return ToolResult::error("Missing required parameter: workspace_id"),
    };

    let query = match arguments.get("query").and_then(|v| v.as_str()) {
        Some(q) => q,
        None => return ToolResult::error("Missing required parameter: query"),
    };

    let mut request = QueryRequest::new(workspace_id, query);
    request.knowledge_bases = parse_string_array(arguments.get("knowledge_bases"));
    request.model = parse_string(arguments.get("model"));
    request.conversation_history = parse_string_array(arguments.get("conversation_history"));
    request.top_k = arguments
        .get("top_k")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32);
    request.preferred_language = parse_string(arguments.get("preferred_language"));
    request.message_id = parse_string(arguments.get("message_id"));

    envelope_result(client.query(&request).await)
}

/// Handle retrieve_from_knowledge_base tool
async fn handle_retrieve(arguments: &HashMap<String, Value>, client: &KbClient) -> ToolResult {
    let workspace_id = match arguments.get("workspace_id").and_then(|v| v.as_str()) {
        Some(w) => w,
        None => return ToolResult::error("Missing required parameter: workspace_id"),
    };

    let query = match arguments.get("query").and_then(|v| v.as_str()) {
        Some(q) => q,
        None => return ToolResult::error("Missing required parameter: query"),
    };

    let mut request = RetrieveRequest::new(workspace_id, query);
    request.knowledge_bases = parse_string_array(arguments.get("knowledge_bases"));
    request.top_k = arguments
        .get("top_k")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32);

    envelope_result(client.retrieve(&request).await)
}

/// Render an operation outcome as tool content
///
/// Failure envelopes become error content, never a raised protocol error;
/// validation failures are reported the same way.
fn envelope_result(result: Result<ResultEnvelope, Error>) -> ToolResult {
    match result {
        Ok(envelope) => {
            let text = serde_json::to_string_pretty(&envelope)
                .unwrap_or_else(|e| format!("Failed to render envelope: {}", e));
            if envelope.success {
                ToolResult::text(text)
            } else {
                ToolResult::error(text)
            }
        }
        Err(e) => ToolResult::error(e.to_string()),
    }
}

fn parse_string(value: Option<&Value>) -> Option<String> {
    value.and_then(|v| v.as_str()).map(ToString::to_string)
}

fn parse_string_array(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(|v| {
        v.as_array().map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str().map(ToString::to_string))
                .collect::<Vec<_>>()
        })
    })
}
