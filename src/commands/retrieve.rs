//! Retrieve command implementation

use super::print_failure;
use crate::client::KbClient;
use crate::error::Result;
use crate::models::{ResultEnvelope, RetrieveRequest};
use tracing::info;

/// Retrieve options
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    /// Restrict the search to these knowledge base IDs
    pub knowledge_bases: Option<Vec<String>>,
    /// Number of documents to retrieve
    pub top_k: Option<u32>,
}

/// Retrieve raw document matches without answer generation
pub async fn cmd_retrieve(
    client: &KbClient,
    workspace_id: &str,
    query: &str,
    options: RetrieveOptions,
) -> Result<ResultEnvelope> {
    info!("Retrieving from workspace {}: {}", workspace_id, query);

    let mut request = RetrieveRequest::new(workspace_id, query);
    request.knowledge_bases = options.knowledge_bases;
    request.top_k = options.top_k;

    client.retrieve(&request).await
}

/// Print retrieved document matches to the console
pub fn print_retrieve_result(envelope: &ResultEnvelope) {
    if !envelope.success {
        print_failure(envelope);
        return;
    }

    let matches = envelope.document_matches();
    if matches.is_empty() {
        println!("No matching documents found.");
        return;
    }

    println!("Found {} results:\n", matches.len());
    for (i, m) in matches.iter().enumerate() {
        println!("{}. [score: {:.3}] {}", i + 1, m.score, m.source);

        let preview = if m.text.len() > 200 {
            let cut: String = m.text.chars().take(200).collect();
            format!("{}...", cut.trim())
        } else {
            m.text.trim().to_string()
        };
        println!("   {}\n", preview.replace('\n', " "));
    }
}
