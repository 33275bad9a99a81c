//! Body Metrics Tracker (BMT)
//!
//! An MCP server for BMI calculation and weight tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bmt::build_info;
use bmt::config::Config;
use bmt::db::Database;
use bmt::mcp::BmtService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bmt=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!("Database path: {}", config.database_path.display());

    // Creates the data directory and runs migrations
    let database = Database::open(&config.database_path)?;
    info!(
        weight_history_days = config.weight_history_days,
        bmi_history_days = config.bmi_history_days,
        "Database ready"
    );

    let service = BmtService::new(&config, database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
