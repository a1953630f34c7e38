//! Config subcommands handler

use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use termsite::config::{migrate_config, MigrateResult};
use termsite::tui::theme::{ansi, Theme};
use termsite::Config;

/// Theme named in the config file, for colored CLI output.
fn current_theme() -> Theme {
    Config::load()
        .ok()
        .and_then(|config| Theme::by_name(&config.display.theme))
        .unwrap_or_default()
}

/// Show current configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", current_theme().primary_text(&toml_str));
    Ok(())
}

/// Open configuration file in $EDITOR (defaults to 'vi').
#[cfg(not(tarpaulin_include))]
pub fn handle_edit() -> Result<()> {
    let config_path = Config::config_path()?;
    if !config_path.exists() {
        Config::default().save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!(
        "{}",
        current_theme().primary_text(&format!("Opening {} with {}", config_path.display(), editor))
    );

    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;
    Ok(())
}

/// Add fields the config file lacks.
///
/// Shows the added lines and asks before writing, unless `yes` is set.
/// A missing file is created with all defaults.
#[cfg(not(tarpaulin_include))]
pub fn handle_migrate(yes: bool) -> Result<()> {
    let theme = current_theme();
    let config_path = Config::config_path()?;
    let file_exists = config_path.exists();

    let content = if file_exists {
        fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?
    } else {
        String::new()
    };

    let result = migrate_config(&content)?;
    if !result.has_changes() {
        println!("{}", theme.primary_text("Config is already up to date."));
        return Ok(());
    }

    let question = if file_exists {
        println!(
            "{}",
            theme.primary_text(&format!(
                "Found {} missing field(s), {} new section(s):",
                result.added_fields.len(),
                result.sections_added.len()
            ))
        );
        format!("Apply these changes to {}?", config_path.display())
    } else {
        println!("{}", theme.primary_text("Config file does not exist. Will create it with defaults."));
        format!("Create {}?", config_path.display())
    };
    println!();
    for line in added_lines(&result, !file_exists) {
        println!("{}+ {}{}", ansi::GREEN, line, ansi::RESET);
    }
    println!();

    if !yes && !prompt_confirmation(&question)? {
        println!("{}", theme.primary_text("No changes made."));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, &result.content)?;
    println!("{}", theme.success_text("Config updated successfully."));
    Ok(())
}

/// Lines of the migrated file that are new: section headers of added
/// sections and assignments of added fields. Everything for a new file.
fn added_lines(result: &MigrateResult, new_file: bool) -> Vec<String> {
    let mut section = String::new();
    let mut lines = Vec::new();
    for line in result.content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if new_file {
            lines.push(line.to_string());
            continue;
        }
        if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            section = name.to_string();
            if result.sections_added.contains(&section) {
                lines.push(line.to_string());
            }
            continue;
        }
        if let Some((key, _)) = trimmed.split_once('=') {
            let field = format!("{}.{}", section, key.trim());
            if result.added_fields.contains(&field) {
                lines.push(line.to_string());
            }
        }
    }
    lines
}

/// Ask a yes/no question. Non-interactive stdin counts as "no".
fn prompt_confirmation(message: &str) -> Result<bool> {
    let theme = current_theme();
    if !atty::is(atty::Stream::Stdin) {
        println!(
            "{}",
            theme.secondary_text("Non-interactive mode: use --yes to apply changes automatically")
        );
        return Ok(false);
    }

    print!("{} [y/N] ", theme.primary_text(message));
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
