// Config command for inspecting and editing launcher_config.json

use crate::cli::ConfigAction;
use crate::config::{self, LauncherConfig};
use crate::ui;

pub fn config(action: ConfigAction) -> anyhow::Result<()> {
    let path = config::config_path();

    match action {
        ConfigAction::Path => ui::line(&path.display().to_string()),
        ConfigAction::Show => {
            let (config, _) = LauncherConfig::load_or_init(&path)?;
            ui::line(&serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let (config, _) = LauncherConfig::load_or_init(&path)?;
            let updated = config.with_value(&key, &value)?;
            updated.save(&path)?;
            ui::success(&format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}
