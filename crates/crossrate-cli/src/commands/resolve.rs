use super::{display_locale, load_config, ratings_table, spinner, title_line};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossrate_core::{LookupRequest, LookupResponse, Orchestrator};
use crossrate_models::{MovieInfo, SiteName};
use std::path::PathBuf;

pub async fn run_resolve(
    title: String,
    year: Option<u16>,
    director: Option<String>,
    target: SiteName,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let config = load_config(config_path)?;
    let orchestrator = Orchestrator::from_config(&config);

    let request = LookupRequest {
        movie_info: MovieInfo::new(title, year, director).wrap_err("Invalid movie identity")?,
        remote_page_name: target.page_name().to_string(),
    };
    tracing::debug!(title = %request.movie_info.title(), target = %target, "Resolve command started");

    let progress = spinner(output, format!("Searching {} for {}", target.display_name(), request.movie_info.title()))?;
    let response = orchestrator.handle_request(&request).await;
    progress.finish_and_clear();

    // JSON modes print the response as the orchestrator produced it, errors included
    if !output.is_human() {
        output.json(&serde_json::to_value(&response)?);
        return match response {
            LookupResponse::Ratings(_) => Ok(()),
            LookupResponse::Error { .. } => std::process::exit(1),
        };
    }

    match response {
        LookupResponse::Ratings(data) => {
            if !output.is_quiet() {
                println!("{}", title_line(&data));
            }
            println!("{}", ratings_table(&[&data], &display_locale(&config, None)?));
            Ok(())
        }
        LookupResponse::Error { kind, message } => Err(color_eyre::eyre::eyre!("{} ({})", message, kind)),
    }
}
