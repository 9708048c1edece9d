//! `rhsmctl config` - show settings

use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::Settings;
use crate::{paths, ui};

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
    }
}

fn show() -> Result<()> {
    let dir = paths::config_dir()?;
    let file = dir.join(paths::CONFIG_FILE);

    ui::header("rhsmctl Configuration");
    ui::kv("Config dir", &dir.display().to_string());
    if std::env::var(paths::ENV_CONFIG_DIR).is_ok() {
        ui::dim(&format!("(from {})", paths::ENV_CONFIG_DIR));
    }
    if file.exists() {
        ui::kv("Settings", &file.display().to_string());
    } else {
        ui::kv("Settings", "(no config.toml, using defaults)");
    }

    let settings = Settings::load_from(&file)?;
    ui::section("In effect");
    ui::kv("jobs", &settings.jobs.to_string());
    ui::kv(
        "timeout",
        &settings
            .call_timeout()
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs())),
    );
    ui::kv("lock wait", &format!("{}s", settings.lock_wait_secs));
    ui::kv("retries", &settings.retries.to_string());
    ui::kv("retry delay", &format!("{}ms", settings.retry_delay_ms));
    Ok(())
}
