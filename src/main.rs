//! Student MCP Server - Main entry point.
//!
//! Serves the student CRUD tools over MCP, or runs a single action from the
//! command line and prints its result.

use clap::Parser;
use std::sync::Arc;
use student_mcp_server::auth::AuthConfig;
use student_mcp_server::config::{Command, Config, TransportMode};
use student_mcp_server::db::StudentRepository;
use student_mcp_server::tools::{ActionDispatcher, StudentTools};
use student_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout stays reserved for MCP messages and action output.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: student-mcp-server --database-url <url> [serve]");
    eprintln!("       student-mcp-server --database-url <url> action <create|read|update|delete> [fields]");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  student-mcp-server --database-url mysql://root:pw@localhost:3306/school");
    eprintln!("  student-mcp-server -d sqlite:students.db --init-schema --transport http");
    eprintln!("  student-mcp-server -d sqlite:students.db action create --name 'John Doe' --age 20 --grade A");
    eprintln!("  student-mcp-server -d sqlite:students.db action read --format table");
    eprintln!("  student-mcp-server -d sqlite:students.db action update --id 1 --grade B");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    let conn_config = match config.connection_config() {
        Ok(c) => c,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(1);
        }
    };

    info!(
        database = %conn_config.masked_connection_string(),
        table = %conn_config.table,
        "Starting Student MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let repository = Arc::new(StudentRepository::new(conn_config));
    if config.init_schema {
        repository.ensure_schema().await?;
        info!(table = %repository.config().table, "Student table ready");
    }

    let dispatcher = ActionDispatcher::new(StudentTools::new(repository));

    if let Some(Command::Action(args)) = config.command.clone() {
        let (request, format) = args.into_request();
        println!("{}", dispatcher.perform_action(request, format).await);
        return Ok(());
    }

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(dispatcher).run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let auth = AuthConfig::from_tokens(config.auth_tokens.clone())?;
            let transport = HttpTransport::new(
                dispatcher,
                auth,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
