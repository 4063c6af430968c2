use anyhow::Result;
use monujo::cli;

// Main function
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let action = cli::start()?;

    // Flush any pending spans even when the action failed.
    let result = action.execute().await;
    cli::telemetry::shutdown_tracer();

    result
}
