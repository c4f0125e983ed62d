use super::{display_locale, load_config, ratings_table, spinner, title_line};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossrate_core::{LookupRequest, Orchestrator};
use crossrate_models::SiteName;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_lookup(url: &str, site: Option<SiteName>, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    tracing::debug!(url = %url, "Lookup command started");

    let config = load_config(config_path)?;
    let locale = display_locale(&config, None)?;
    let orchestrator = Orchestrator::from_config(&config);

    let progress = spinner(output, format!("Fetching {}", url))?;
    let adapter = match orchestrator.open_page(url, site).await {
        Ok(adapter) => adapter,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e).wrap_err_with(|| format!("Failed to open {}", url));
        }
    };

    let info = match adapter.movie_info().await {
        Ok(info) => info,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e).wrap_err("Could not identify the movie on this page");
        }
    };

    let remote_site = adapter.site().other();
    progress.set_message(format!("Looking up {} on {}", info.title(), remote_site.display_name()));

    let request = LookupRequest {
        movie_info: info,
        remote_page_name: remote_site.page_name().to_string(),
    };
    let (local, remote) = tokio::join!(adapter.movie_info_with_ratings(), orchestrator.handle(&request));
    progress.finish_and_clear();

    let local = local.wrap_err_with(|| format!("Failed to read ratings from {}", url))?;
    let remote = remote.wrap_err_with(|| format!("Failed to find the movie on {}", remote_site.display_name()))?;

    if output.is_human() {
        if !output.is_quiet() {
            println!("{}", title_line(&local));
        }
        println!("{}", ratings_table(&[&local, &remote], &locale));
    } else {
        output.json(&json!({
            "type": "lookup",
            "page": serde_json::to_value(&local)?,
            "remote": serde_json::to_value(&remote)?,
        }));
    }
    Ok(())
}
