// Update command: standalone patch downloader

use crate::config::{self, LauncherConfig};
use crate::patch::{self, PatchOutcome};
use crate::ui;
use std::path::PathBuf;

/// Unlike the launcher, an unreachable server is a failure here: checking
/// the server is the only thing this command does.
pub async fn update(root: Option<PathBuf>) -> anyhow::Result<bool> {
    let (config, _) = LauncherConfig::load_or_init(&config::config_path())?;
    let root = root.unwrap_or_else(|| config.wow_path.clone());

    ui::header("Progressive Systems Patch Downloader");
    ui::dim(&format!("Client directory: {}", root.display()));

    match patch::run_patch_update(&config, &root).await {
        Ok(PatchOutcome::Updated { .. }) => {
            ui::line("Please restart your WoW client.");
            Ok(true)
        }
        Ok(PatchOutcome::UpToDate { .. }) => Ok(true),
        Ok(PatchOutcome::Unreachable { reason }) => {
            ui::error(&format!(
                "Could not reach {}: {}",
                config.patch_version_url, reason
            ));
            ui::dim("Check patch_version_url in launcher_config.json");
            Ok(false)
        }
        Err(e) => {
            ui::error(&format!("Failed to download patch: {:#}", e));
            Ok(false)
        }
    }
}
