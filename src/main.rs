//! onlysaidkb-mcp CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use onlysaidkb_mcp::{
    client::KbClient,
    commands::{
        cmd_init, cmd_kb_status, cmd_list_knowledge_bases, cmd_query, cmd_retrieve, cmd_view,
        print_kb_status, print_query_result, print_retrieve_result, print_view_result,
        QueryOptions, RetrieveOptions,
    },
    config::Config,
    error::Result,
    mcp::McpServer,
    models::ResultEnvelope,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "onlysaidkb-mcp")]
#[command(version, about = "MCP server for the OnlysaidKB knowledge-base API", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output full envelopes as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Query knowledge bases and get an AI-generated answer
    Query {
        /// The workspace ID containing the knowledge bases
        workspace_id: String,

        /// The natural language query
        query: String,

        /// Restrict the search to these knowledge base IDs
        #[arg(long)]
        kb: Option<Vec<String>>,

        /// Model to use for answer generation
        #[arg(long)]
        model: Option<String>,

        /// Number of documents to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<u32>,

        /// Preferred response language code
        #[arg(long)]
        language: Option<String>,
    },

    /// Retrieve raw document matches without answer generation
    Retrieve {
        /// The workspace ID containing the knowledge bases
        workspace_id: String,

        /// The search query
        query: String,

        /// Restrict the search to these knowledge base IDs
        #[arg(long)]
        kb: Option<Vec<String>>,

        /// Number of documents to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },

    /// Show the full structure of a workspace
    View {
        /// The workspace ID
        workspace_id: String,
    },

    /// List the knowledge bases registered in a workspace
    Kbs {
        /// The workspace ID
        workspace_id: String,
    },

    /// Show the status of a single knowledge base
    KbStatus {
        /// The workspace ID
        workspace_id: String,

        /// The knowledge base ID
        kb_id: String,
    },

    /// Start MCP server on stdio
    Mcp,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout is reserved for command output and the MCP
    // stdio channel
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle init command specially (doesn't need existing config)
    if let Commands::Init { force } = &cli.command {
        let config = cmd_init(
            cli.config
                .as_deref()
                .and_then(|p| p.parent().map(PathBuf::from)),
            *force,
        )
        .await?;
        println!("✓ Initialized config at {}", config.config_path.display());
        println!("\nNext steps:");
        println!("  1. Edit the config file or set ONLYSAIDKB_BASE_URL");
        println!("  2. Run 'onlysaidkb-mcp mcp' to serve over stdio");
        return Ok(());
    }

    // Handle completions command (doesn't need config)
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "onlysaidkb-mcp", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration and build the gateway client
    let config = Config::load_or_default(cli.config.as_deref())?;
    let client = KbClient::new(&config)?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Query {
            workspace_id,
            query,
            kb,
            model,
            top_k,
            language,
        } => {
            let options = QueryOptions {
                knowledge_bases: kb,
                model,
                top_k,
                preferred_language: language,
            };
            let envelope = cmd_query(&client, &workspace_id, &query, options).await?;
            output(&envelope, cli.json, print_query_result)?;
        }

        Commands::Retrieve {
            workspace_id,
            query,
            kb,
            top_k,
        } => {
            let options = RetrieveOptions {
                knowledge_bases: kb,
                top_k,
            };
            let envelope = cmd_retrieve(&client, &workspace_id, &query, options).await?;
            output(&envelope, cli.json, print_retrieve_result)?;
        }

        Commands::View { workspace_id } => {
            let envelope = cmd_view(&client, &workspace_id).await?;
            output(&envelope, cli.json, print_view_result)?;
        }

        Commands::Kbs { workspace_id } => {
            let envelope = cmd_list_knowledge_bases(&client, &workspace_id).await?;
            output(&envelope, cli.json, print_view_result)?;
        }

        Commands::KbStatus {
            workspace_id,
            kb_id,
        } => {
            let envelope = cmd_kb_status(&client, &workspace_id, &kb_id).await?;
            output(&envelope, cli.json, print_kb_status)?;
        }

        Commands::Mcp => {
            let server = McpServer::new(config, client);
            server
                .run()
                .await
                .map_err(|e| onlysaidkb_mcp::error::Error::McpProtocol(e.to_string()))?;
        }
    }

    Ok(())
}

fn output(
    envelope: &ResultEnvelope,
    json: bool,
    print: impl Fn(&ResultEnvelope),
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(envelope)?);
    } else {
        print(envelope);
    }
    Ok(())
}
