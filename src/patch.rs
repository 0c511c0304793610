// Patch update flow shared by `update` and the launcher session

use crate::config::LauncherConfig;
use crate::constants;
use crate::fetch;
use crate::hash;
use crate::http;
use crate::ui;
use crate::version::{self, UpdateStatus};
use anyhow::Context;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Version check failed; nothing was downloaded.
    Unreachable { reason: String },
    UpToDate { version: String },
    Updated { from: String, to: String },
}

/// Where the patch and its version marker live under an installation root.
#[derive(Debug, Clone)]
pub struct PatchPaths {
    pub dest: PathBuf,
    pub marker: PathBuf,
}

impl PatchPaths {
    pub fn under(root: &Path) -> Self {
        Self {
            dest: root.join(constants::PATCH_DEST),
            marker: root.join(constants::VERSION_MARKER),
        }
    }
}

/// Check the server's patch version and download the patch if it is newer.
///
/// The marker is only rewritten after the download (and checksum, when
/// `verify_integrity` is set) succeeded. Download and verification errors
/// are returned; an unreachable server is not an error.
pub async fn run_patch_update(
    config: &LauncherConfig,
    root: &Path,
) -> anyhow::Result<PatchOutcome> {
    ui::header("Checking for Patch Updates");
    let paths = PatchPaths::under(root);

    let status = version::check_for_update(
        &config.patch_version_url,
        &paths.marker,
        config.version_ordering,
    )
    .await?;

    let (local, remote) = match status {
        UpdateStatus::Unreachable { reason } => {
            ui::warning("Could not connect to server. Skipping patch update.");
            return Ok(PatchOutcome::Unreachable { reason });
        }
        UpdateStatus::UpToDate { local, remote } => {
            ui::status("Local version:", &local);
            ui::status("Server version:", &remote);
            ui::success("Patch is up to date!");
            return Ok(PatchOutcome::UpToDate { version: local });
        }
        UpdateStatus::Available { local, remote } => (local, remote),
    };

    ui::status("Local version:", &local);
    ui::status("Server version:", &remote);
    ui::action("New patch available! Downloading...");

    fetch::download_file(&config.patch_download_url, &paths.dest, "MPQ patch").await?;

    if config.verify_integrity {
        verify_patch(&config.patch_checksum_url, &paths.dest).await?;
    }

    version::write_local_version(&paths.marker, &remote)?;
    info!("Patch updated {} -> {}", local, remote);
    ui::success("Patch updated successfully!");

    Ok(PatchOutcome::Updated {
        from: local,
        to: remote,
    })
}

async fn verify_patch(checksum_url: &str, patch: &Path) -> anyhow::Result<()> {
    let body = http::fetch_text(
        checksum_url,
        Duration::from_secs(constants::VERSION_CHECK_TIMEOUT_SECS),
    )
    .await
    .context("Failed to fetch patch checksum")?;

    let expected = hash::parse_checksum(&body)?;
    let actual = hash::sha256_file(patch)?;
    if actual != expected {
        anyhow::bail!(
            "Checksum mismatch for {}: expected {}, got {}",
            patch.display(),
            expected,
            actual
        );
    }

    ui::success("Patch checksum verified");
    Ok(())
}
