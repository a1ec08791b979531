//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::error::{DbError, DbResult};
use crate::mcp::StudentService;
use crate::tools::ActionDispatcher;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// Reads JSON-RPC messages from stdin and writes responses to stdout.
pub struct StdioTransport {
    dispatcher: ActionDispatcher,
}

impl StdioTransport {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self { dispatcher }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = StudentService::new(self.dispatcher.clone());
        let running_service = service.serve(stdio()).await.map_err(|e| {
            DbError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DbError::internal(format!("Stdio transport error: {}", e)));
                    }
                }
            }
            _ = wait_for_signal() => {
                // stdin reads cannot be interrupted, so leave immediately.
                info!("Shutdown signal received, exiting");
                std::process::exit(0);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
