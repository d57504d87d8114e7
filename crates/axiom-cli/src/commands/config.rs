use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use game_library_config::{Config, PathManager};
use serde_json::json;

use crate::output::{new_table, Output};
use crate::ConfigCommands;

pub fn run_config(cmd: ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(paths, output),
        ConfigCommands::Init { force, api_url } => init_config(paths, force, api_url, output),
    }
}

fn show_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let exists = config_file.exists();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let validation = config.validate().err().map(|e| e.to_string());

    output.data(&json!({
        "config_file": config_file.display().to_string(),
        "exists": exists,
        "snapshot_dir": paths.snapshot_dir().display().to_string(),
        "config": config,
        "validation_error": validation,
    }));

    if !output.is_human() {
        return Ok(());
    }

    if !exists {
        output.warn(format!(
            "Configuration file not found at {}; showing defaults. Run 'axiom config init' to create it.",
            config_file.display()
        ));
    }

    let mut files = new_table(["Location", "Path"]);
    files.add_row(vec!["Config file".to_string(), config_file.display().to_string()]);
    files.add_row(vec!["Snapshots".to_string(), paths.snapshot_dir().display().to_string()]);
    files.add_row(vec!["Logs".to_string(), paths.log_dir().display().to_string()]);
    output.table(&files);

    let mut settings = new_table(["Setting", "Value"]);
    settings.add_row(vec![section_cell("api"), Cell::new("")]);
    settings.add_row(vec!["  base_url".to_string(), config.api.base_url.clone()]);
    settings.add_row(vec!["  timeout_secs".to_string(), config.api.timeout_secs.to_string()]);
    settings.add_row(vec![section_cell("stats"), Cell::new("")]);
    settings.add_row(vec!["  recent_limit".to_string(), config.stats.recent_limit.to_string()]);
    settings.add_row(vec![
        "  high_score_threshold".to_string(),
        config.stats.high_score_threshold.to_string(),
    ]);
    settings.add_row(vec![
        "  low_score_threshold".to_string(),
        config.stats.low_score_threshold.to_string(),
    ]);
    settings.add_row(vec![section_cell("logging"), Cell::new("")]);
    settings.add_row(vec!["  level".to_string(), config.logging.level.clone()]);
    settings.add_row(vec!["  json".to_string(), config.logging.json.to_string()]);
    settings.add_row(vec![
        "  file".to_string(),
        config
            .logging
            .file
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "(stderr)".to_string()),
    ]);
    output.table(&settings);

    match validation {
        Some(err) => output.error(format!("Invalid configuration: {}", err)),
        None => output.success("Configuration is valid"),
    }
    Ok(())
}

fn section_cell(name: &str) -> Cell {
    Cell::new(format!("[{}]", name))
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn init_config(paths: &PathManager, force: bool, api_url: Option<String>, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    let mut config = Config::default();
    if let Some(url) = api_url {
        config.api.base_url = url.trim().to_string();
    }
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration: {}", e))?;

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        init_config(&paths, false, Some("http://games.local:8080".to_string()), &output).unwrap();
        let config = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(config.api.base_url, "http://games.local:8080");
        assert!(paths.snapshot_dir().is_dir());

        // Without --force the existing file is kept.
        init_config(&paths, false, Some("http://other:1".to_string()), &output).unwrap();
        let config = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(config.api.base_url, "http://games.local:8080");

        init_config(&paths, true, Some("http://other:1".to_string()), &output).unwrap();
        let config = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(config.api.base_url, "http://other:1");
    }

    #[test]
    fn test_init_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let output = Output::new(OutputFormat::Json, true);

        assert!(init_config(&paths, false, Some("localhost:5000".to_string()), &output).is_err());
        assert!(!paths.config_file().exists());
    }
}
