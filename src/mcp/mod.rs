//! MCP (Model Context Protocol) server implementation
//!
//! Exposes the OnlysaidKB gateway as tools and resources over stdio.

mod resources;
mod server;
mod tools;
mod types;

pub use resources::{get_resource_templates, handle_resource_read, parse_resource_uri, ResourceRef};
pub use server::McpServer;
pub use tools::{get_tool_definitions, handle_tool_call};
pub use types::{McpError, McpRequest, McpResponse, ToolResult};
