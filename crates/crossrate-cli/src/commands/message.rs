use super::load_config;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossrate_core::Orchestrator;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Line-delimited request/response loop over stdin and stdout.
pub async fn run_message(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = Orchestrator::from_config(&config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0usize;
    while let Some(line) = lines.next_line().await.wrap_err("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        output.json_line(&orchestrator.handle_message(line).await);
        handled += 1;
    }

    tracing::debug!(handled, "stdin closed");
    Ok(())
}
