//! onlysaidkb-mcp: MCP adapter for the OnlysaidKB knowledge-base API
//!
//! Exposes the remote service's query, retrieve, view, and status endpoints
//! as MCP tools and resources, plus a small CLI for direct invocation.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
