use crate::output::{styled_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use media_request_config::{Config, PathManager, API_KEY_PLACEHOLDER};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;

pub struct InitOptions {
    pub force: bool,
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn run_show(full: bool, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let path = super::config_path(config_path);

    if !path.exists() {
        output.warn(format!("Configuration file not found at: {}", path.display()));
        output.info("Create one with 'overseerr-bridge config init'.");
        return Ok(());
    }

    let config = Config::load_from_file(&path)
        .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?;
    let shown = if full { config } else { config.masked() };

    if !output.is_human() {
        output.data(&shown);
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    println!("{}\n", path.display().to_string().dimmed());

    let mut table = styled_table(vec!["Setting", "Value"]);
    let overseerr = &shown.overseerr;
    let rows = [
        ("Overseerr URL", overseerr.api_url()),
        ("API key", overseerr.api_key.clone()),
        ("Username", overseerr.username.clone().unwrap_or_else(|| "-".to_string())),
        ("Password", overseerr.password.clone().unwrap_or_else(|| "-".to_string())),
        ("Bind address", shown.server.bind.clone()),
        (
            "Webhook id",
            shown
                .server
                .webhook_id
                .clone()
                .unwrap_or_else(|| "<generated at startup>".to_string()),
        ),
        ("Scan interval", format!("{}s", shown.sensors.scan_interval_seconds)),
        ("Refresh on startup", shown.sensors.refresh_on_startup.to_string()),
        ("HTTP timeout", format!("{}s", shown.http.timeout_seconds)),
    ];
    for (setting, value) in rows {
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }
    println!("{}", table);

    Ok(())
}

fn prompt_api_key() -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let key = rpassword::prompt_password("Overseerr API key (Settings > General, leave empty to fill in later): ")
        .map_err(|e| eyre!("Failed to read API key: {}", e))?;
    let key = key.trim().to_string();
    Ok(if key.is_empty() { None } else { Some(key) })
}

pub async fn run_init(options: InitOptions, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let path_manager = PathManager::default();
            path_manager
                .ensure_directories()
                .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
            path_manager.config_file()
        }
    };

    if path.exists() && !options.force {
        return Err(eyre!(
            "Configuration already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    let mut config = Config::template();
    if let Some(host) = options.host {
        config.overseerr.host = host;
    }
    if let Some(port) = options.port {
        config.overseerr.port = port;
    }
    let api_key = match options.api_key {
        Some(key) => Some(key),
        None => prompt_api_key()?,
    };
    if let Some(key) = api_key {
        config.overseerr.api_key = key;
    }

    config
        .save_to_file(&path)
        .map_err(|e| eyre!("Failed to save config to {}: {}", path.display(), e))?;

    output.success(format!("Configuration written to {}", path.display()));
    if config.overseerr.api_key == API_KEY_PLACEHOLDER {
        output.warn("Set overseerr.api_key in the file or export OVERSEERR_API_KEY before running 'serve'.");
    }
    Ok(())
}
