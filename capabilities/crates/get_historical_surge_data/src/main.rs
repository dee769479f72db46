use capability_common::{surge, ToolServer};
use get_historical_surge_data::HistoricalSurgeTool;

#[tokio::main]
async fn main() {
    capability_common::init_logging();

    let server = ToolServer::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .with_tool(HistoricalSurgeTool::new(surge::configured_repository()));

    if let Err(e) = server.serve_stdio().await {
        tracing::error!(error = %e, "stdio server failed");
        std::process::exit(1);
    }
}
