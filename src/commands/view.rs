//! Workspace view commands

use super::print_failure;
use crate::client::KbClient;
use crate::error::Result;
use crate::models::ResultEnvelope;
use tracing::info;

/// Fetch the full workspace structure
pub async fn cmd_view(client: &KbClient, workspace_id: &str) -> Result<ResultEnvelope> {
    info!("Viewing workspace {}", workspace_id);
    client.view_workspace(workspace_id).await
}

/// List the knowledge bases registered in a workspace
pub async fn cmd_list_knowledge_bases(
    client: &KbClient,
    workspace_id: &str,
) -> Result<ResultEnvelope> {
    info!("Listing knowledge bases in workspace {}", workspace_id);
    client.list_knowledge_bases(workspace_id).await
}

/// Print a workspace view envelope to the console
pub fn print_view_result(envelope: &ResultEnvelope) {
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
