use super::config_file;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use crossrate_config::Config;
use crossrate_sites::DisplayLocale;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

pub async fn run_config(cmd: ConfigCommands, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let path = config_file(config_path);
    match cmd {
        ConfigCommands::Show => show_config(&path, output),
        ConfigCommands::Init { force } => init_config(&path, force, output),
        ConfigCommands::Path => {
            if output.is_human() {
                println!("{}", path.display());
            } else {
                output.json(&json!({ "type": "path", "path": path.display().to_string() }));
            }
            Ok(())
        }
    }
}

fn show_config(path: &Path, output: &Output) -> Result<()> {
    let exists = path.exists();
    let config = Config::load_or_default(Some(&path.to_path_buf()))
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", path.display(), e))?;
    let problem = config.validate().err().map(|e| e.to_string());
    let locale = DisplayLocale::detect(config.display.locale.as_deref());

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "path": path.display().to_string(),
            "exists": exists,
            "config": serde_json::to_value(&config)?,
            "effectiveLocale": locale.tag(),
            "error": problem,
        }));
        return Ok(());
    }

    if !exists {
        output.warn(format!("No configuration file at {}, showing defaults", path.display()));
        output.info("Run 'crossrate config init' to write one.");
    }
    println!("{}", config_table(path, &config, &locale));
    match problem {
        Some(problem) => output.error(format!("Configuration is invalid: {}", problem)),
        None => output.success("Configuration is valid"),
    }
    Ok(())
}

fn config_table(path: &Path, config: &Config, locale: &DisplayLocale) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new(path.display().to_string()).fg(Color::Cyan),
    ]);

    let configured_locale = match &config.display.locale {
        Some(tag) => tag.clone(),
        None => format!("{} {}", locale.tag(), "(detected)".bright_black()),
    };
    let rows = [
        ("http.user_agent", config.http.user_agent.clone()),
        ("http.timeout_secs", config.http.timeout_secs.to_string()),
        ("http.accept_language", config.http.accept_language.clone()),
        ("search.base_url", config.search.base_url.clone()),
        ("search.lucky_param", config.search.lucky_param.clone()),
        ("display.locale", configured_locale),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

fn init_config(path: &Path, force: bool, output: &Output) -> Result<()> {
    if path.exists() && !force {
        let overwrite = if output.is_human() && std::io::stdin().is_terminal() {
            Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite it with defaults?", path.display()))
                .default(false)
                .interact()
                .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))?
        } else {
            false
        };
        if !overwrite {
            return Err(color_eyre::eyre::eyre!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ));
        }
    }

    Config::default()
        .save_to_file(&path.to_path_buf())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    if output.is_human() {
        output.success(format!("Wrote default configuration to {}", path.display()));
    } else {
        output.json(&json!({ "type": "config", "path": path.display().to_string(), "written": true }));
    }
    Ok(())
}
