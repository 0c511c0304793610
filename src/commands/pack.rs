// Pack command for building patch-Z.MPQ from DBC files

use crate::packager::{self, MpqBackend};
use crate::ui;
use std::path::Path;

pub fn pack(source: &Path, output: &Path) -> anyhow::Result<bool> {
    ui::action("Creating MPQ archive from DBC files...");
    ui::dim(&format!("  DBC directory: {}", source.display()));
    ui::dim(&format!("  Output MPQ: {}", output.display()));

    match packager::pack_directory(&MpqBackend, source, output) {
        Ok(summary) => {
            if !summary.skipped.is_empty() {
                ui::warning(&format!(
                    "{} file(s) could not be added",
                    summary.skipped.len()
                ));
            }
            ui::success(&format!(
                "Patch generated successfully! Added {} DBC file(s)",
                summary.added.len()
            ));
            ui::dim(&format!(
                "  Place {} in your WoW client's Data/ folder",
                output.display()
            ));
            Ok(true)
        }
        Err(e) => {
            ui::error(&format!("Failed to generate patch: {:#}", e));
            Ok(false)
        }
    }
}
