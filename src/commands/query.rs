//! Query command implementation

use crate::client::KbClient;
use crate::error::Result;
use crate::models::{QueryRequest, ResultEnvelope};
use tracing::info;

/// Query options
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Restrict the search to these knowledge base IDs
    pub knowledge_bases: Option<Vec<String>>,
    /// Model to use for answer generation
    pub model: Option<String>,
    /// Number of documents to retrieve
    pub top_k: Option<u32>,
    /// Preferred response language code
    pub preferred_language: Option<String>,
}

/// Execute a query against the knowledge-base service
pub async fn cmd_query(
    client: &KbClient,
    workspace_id: &str,
    query: &str,
    options: QueryOptions,
) -> Result<ResultEnvelope> {
    info!("Querying workspace {}: {}", workspace_id, query);

    let mut request = QueryRequest::new(workspace_id, query);
    request.knowledge_bases = options.knowledge_bases;
    request.model = options.model;
    request.top_k = options.top_k;
    request.preferred_language = options.preferred_language;

    client.query(&request).await
}

/// Print a query envelope to the console
pub fn print_query_result(envelope: &ResultEnvelope) {
    if !envelope.success {
        print_failure(envelope);
        return;
    }

    if let Some(result) = &envelope.result {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", result),
        }
    }
}

/// Print a failure envelope to the console
pub fn print_failure(envelope: &ResultEnvelope) {
    eprintln!(
        "✗ Request failed: {}",
        envelope.error.as_deref().unwrap_or("unknown error")
    );
    if let Some(status) = envelope.status_code {
        eprintln!("  HTTP status: {}", status);
    }
    if let Some(debug) = &envelope.debug {
        eprintln!("  Endpoint: {}", debug.endpoint);
    }
}
