//! Knowledge-base status command implementation

use super::print_failure;
use crate::client::KbClient;
use crate::error::Result;
use crate::models::ResultEnvelope;
use tracing::info;

/// Fetch the status of a single knowledge base
pub async fn cmd_kb_status(
    client: &KbClient,
    workspace_id: &str,
    kb_id: &str,
) -> Result<ResultEnvelope> {
    info!("Getting status for kb {} in workspace {}", kb_id, workspace_id);
    client.kb_status(workspace_id, kb_id).await
}

/// Print a knowledge-base status envelope to the console
pub fn print_kb_status(envelope: &ResultEnvelope) {
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
