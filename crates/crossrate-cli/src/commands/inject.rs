use super::{display_locale, load_config, spinner};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossrate_core::Orchestrator;
use crossrate_models::SiteName;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_inject(
    url: &str,
    site: Option<SiteName>,
    out: Option<PathBuf>,
    locale: Option<String>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let config = load_config(config_path)?;
    let locale = display_locale(&config, locale.as_deref())?;
    let orchestrator = Orchestrator::from_config(&config);

    let progress = spinner(output, format!("Fetching {}", url))?;
    let result = async {
        let mut adapter = orchestrator.open_page(url, site).await?;
        let (data, summary) = orchestrator.cross_link(adapter.as_mut(), &locale).await?;
        Ok::<_, crossrate_sites::SiteError>((adapter, data, summary))
    }
    .await;
    progress.finish_and_clear();

    let (adapter, data, summary) = result.wrap_err_with(|| format!("Failed to cross-link {}", url))?;
    let html = adapter.document().to_html();

    tracing::info!(
        url = %url,
        remote = %data.url(),
        locale = %locale.tag(),
        inserted = ?summary.inserted,
        skipped = ?summary.skipped,
        synthesized = ?summary.synthesized,
        "Injected ratings"
    );

    let Some(path) = out else {
        // stdout carries the page itself
        print!("{}", html);
        return Ok(());
    };

    tokio::fs::write(&path, &html)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    if output.is_human() {
        output.success(format!(
            "Injected {} ratings into {}",
            data.page_name().display_name(),
            path.display()
        ));
        if !summary.synthesized.is_empty() {
            output.info(format!("Created missing anchors: {}", summary.synthesized.join(", ")));
        }
        if !summary.skipped.is_empty() {
            output.warn(format!("Already present, left alone: {}", summary.skipped.join(", ")));
        }
    } else {
        output.json(&json!({
            "type": "inject",
            "path": path.display().to_string(),
            "remote": serde_json::to_value(&data)?,
            "inserted": summary.inserted,
            "skipped": summary.skipped,
            "synthesized": summary.synthesized,
        }));
    }
    Ok(())
}
