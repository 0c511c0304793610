// Client installation: presence checks, missing-file check and ZIP install

use crate::config::LauncherConfig;
use crate::constants;
use crate::fetch;
use crate::prompt::{Decider, Decision, Question};
use crate::ui;
use anyhow::Context;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Installation lifecycle within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotChecked,
    Checking,
    Installed,
    NeedsInstall,
    InstallFailed,
}

/// True iff the configured executable exists under the installation root.
pub fn check_installed(config: &LauncherConfig) -> bool {
    config.exe_path().exists()
}

/// Entries of `required` that do not exist under `root`.
pub fn missing_files(root: &Path, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|file| !root.join(file).exists())
        .cloned()
        .collect()
}

/// Check every required file, printing what was found. If anything is
/// missing, offer a full reinstall.
///
/// Returns true when nothing was missing or the reinstall succeeded.
pub async fn check_missing_files(
    config: &LauncherConfig,
    root: &Path,
    required: &[String],
    decider: &mut dyn Decider,
) -> anyhow::Result<bool> {
    ui::header("Checking for Missing Files");

    let missing = missing_files(root, required);
    for file in required {
        if missing.contains(file) {
            ui::error(&format!("Missing: {}", file));
        } else {
            ui::success(&format!("Found: {}", file));
        }
    }

    if missing.is_empty() {
        ui::success("All critical files present!");
        return Ok(true);
    }

    ui::warning(&format!("{} critical file(s) missing!", missing.len()));
    match decider.decide(&Question::Reinstall {
        missing: missing.len(),
    })? {
        Decision::Proceed => match install(config, root).await {
            Ok(()) => Ok(true),
            Err(e) => {
                ui::error(&format!("Reinstall failed: {:#}", e));
                Ok(false)
            }
        },
        Decision::Abort => Ok(false),
    }
}

/// Install the client into `root` from the game ZIP.
///
/// A ZIP named `game_zip_file` in the working directory is used as-is;
/// otherwise it is downloaded from `game_zip_url` into `temp_path`.
pub async fn install(config: &LauncherConfig, root: &Path) -> anyhow::Result<()> {
    ui::header("Installing WoW Client");

    let zip_path = locate_or_download_zip(config).await?;
    let extracted = extract_zip(&zip_path, root)?;

    info!("Installed {} entries into {}", extracted, root.display());
    ui::success(&format!("WoW client installed to: {}", root.display()));
    Ok(())
}

async fn locate_or_download_zip(config: &LauncherConfig) -> anyhow::Result<PathBuf> {
    let local = PathBuf::from(&config.game_zip_file);
    if local.is_file() {
        debug!("Using local client archive {}", local.display());
        return Ok(local);
    }

    let temp_zip = config.temp_path.join(&config.game_zip_file);
    fetch::download_file(&config.game_zip_url, &temp_zip, "WoW client ZIP").await?;
    Ok(temp_zip)
}

/// Extract every entry of `zip_path` into `dest`. Entries whose names would
/// escape `dest` are skipped. Returns the number of entries extracted.
pub fn extract_zip(zip_path: &Path, dest: &Path) -> anyhow::Result<usize> {
    ui::action(&format!(
        "Extracting {} to {}...",
        zip_path.display(),
        dest.display()
    ));

    let file =
        File::open(zip_path).with_context(|| format!("Failed to open {}", zip_path.display()))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a valid ZIP archive", zip_path.display()))?;

    let total = archive.len();
    let pb = ui::extract_bar(total as u64);
    let mut extracted = 0usize;

    for index in 0..total {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping unsafe ZIP entry: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            io::copy(&mut entry, &mut out)?;

            // Only the executable bits are taken from the archive; files stay
            // writable so a reinstall can overwrite them
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let exec_bits = entry.unix_mode().map_or(0, |mode| mode & 0o111);
                if exec_bits != 0 {
                    let mut perms = fs::metadata(&out_path)?.permissions();
                    perms.set_mode(perms.mode() | exec_bits);
                    fs::set_permissions(&out_path, perms)?;
                }
            }
        }

        extracted += 1;
        if extracted % constants::EXTRACT_PROGRESS_INTERVAL == 0 {
            pb.set_position(extracted as u64);
            debug!("Extracted {}/{} entries", extracted, total);
        }
    }

    ui::finish_bar_success(&pb, &format!("Extraction complete! ({} files)", extracted));
    Ok(extracted)
}
