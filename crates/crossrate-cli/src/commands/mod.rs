pub mod config;
pub mod inject;
pub mod lookup;
pub mod message;
pub mod resolve;

use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use crossrate_config::{Config, PathManager};
use crossrate_models::{MovieInfoWithRatings, Ratings, SiteName};
use crossrate_sites::templates::{count_label, NOT_AVAILABLE};
use crossrate_sites::DisplayLocale;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

pub fn config_file(path: Option<&PathBuf>) -> PathBuf {
    path.cloned().unwrap_or_else(|| PathManager::default().config_file())
}

/// Load and validate the config; a missing file means defaults.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let file = config_file(path);
    let config = Config::load_or_default(Some(&file))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", file.display(), e))?;
    tracing::debug!(path = %file.display(), exists = file.exists(), "Configuration loaded");
    Ok(config)
}

pub fn display_locale(config: &Config, override_tag: Option<&str>) -> Result<DisplayLocale> {
    match override_tag {
        Some(tag) => DisplayLocale::parse(tag).ok_or_else(|| color_eyre::eyre::eyre!("Unrecognized locale: {}", tag)),
        None => Ok(DisplayLocale::detect(config.display.locale.as_deref())),
    }
}

/// Steady-ticking spinner; hidden unless a human is reading.
pub fn spinner(output: &Output, msg: impl Into<String>) -> Result<ProgressBar> {
    if !output.is_human() || output.is_quiet() {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .wrap_err("Invalid spinner template")?,
    );
    spinner.set_message(msg.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

fn critic_cell(site: SiteName, ratings: Option<&Ratings>, locale: &DisplayLocale) -> String {
    let Some(ratings) = ratings else {
        return NOT_AVAILABLE.to_string();
    };
    let score = match (site, ratings.score()) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (SiteName::RottenTomatoes, Some(s)) => format!("{}% {}", locale.format_score(s, 0), ratings.custom()),
        (SiteName::Imdb, Some(s)) => format!("Metascore {}", locale.format_score(s, 0)),
    };
    format!("{}\n{}", score, count_label(ratings.count(), "review", locale))
}

fn user_cell(site: SiteName, ratings: Option<&Ratings>, locale: &DisplayLocale) -> String {
    let Some(ratings) = ratings else {
        return NOT_AVAILABLE.to_string();
    };
    let score = match (site, ratings.score()) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (SiteName::RottenTomatoes, Some(s)) => format!("{}% {}", locale.format_score(s, 0), ratings.custom()),
        (SiteName::Imdb, Some(s)) => format!("{}/10", locale.format_score(s, 1)),
    };
    format!("{}\n{}", score, count_label(ratings.count(), "rating", locale))
}

/// One row per site, for the terminal.
pub fn ratings_table(rows: &[&MovieInfoWithRatings], locale: &DisplayLocale) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Site").add_attribute(Attribute::Bold),
        Cell::new("Critics").add_attribute(Attribute::Bold),
        Cell::new("Audience").add_attribute(Attribute::Bold),
        Cell::new("Notes").add_attribute(Attribute::Bold),
    ]);

    for data in rows {
        let site = data.page_name();
        let mut notes = Vec::new();
        if let Some(position) = data.toplist_position() {
            notes.push(format!("Top Rated #{}", position));
        }
        if let Some(summary) = data.summary() {
            notes.push(format!("{}: {}", summary.title, summary.content));
        }
        notes.push(data.url().to_string());

        table.add_row(vec![
            Cell::new(site.display_name()).fg(Color::Cyan),
            Cell::new(critic_cell(site, data.critic_ratings(), locale)),
            Cell::new(user_cell(site, data.user_ratings(), locale)),
            Cell::new(notes.join("\n")),
        ]);
    }
    table
}

pub fn title_line(data: &MovieInfoWithRatings) -> String {
    let info = data.info();
    let mut line = info.title().to_string();
    if let Some(year) = info.year() {
        line.push_str(&format!(" ({})", year));
    }
    if let Some(director) = info.director() {
        line.push_str(&format!(", directed by {}", director));
    }
    line
}
