// Streamed downloads to disk

use crate::constants;
use crate::http;
use crate::ui;
use anyhow::Context;
use indicatif::ProgressBar;
use log::debug;
use reqwest::Response;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Stream `url` into `dest`, creating parent directories.
///
/// The body is written through an 8 KiB buffer as it arrives. On failure a
/// partially written `dest` is left in place.
pub async fn download_file(url: &str, dest: &Path, label: &str) -> anyhow::Result<u64> {
    ui::action(&format!("Downloading {}...", label));
    ui::dim(&format!("  From: {}", url));
    ui::dim(&format!("  To: {}", dest.display()));

    let response = http::download_response(url).await?;
    let total = response.content_length().filter(|len| *len > 0);
    debug!("GET {} -> {:?} bytes announced", url, total);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
    let writer = BufWriter::with_capacity(constants::DOWNLOAD_CHUNK_SIZE, file);

    let pb = match total {
        Some(total) => ui::download_bar(total, label),
        None => ui::download_bar_indeterminate(label),
    };

    match stream_body(response, writer, &pb).await {
        Ok(written) => {
            ui::finish_bar_success(&pb, &format!("{} downloaded ({} bytes)", label, written));
            Ok(written)
        }
        Err(e) => {
            ui::clear_bar(&pb);
            Err(e.context(format!("Download of {} interrupted", label)))
        }
    }
}

async fn stream_body(
    mut response: Response,
    mut writer: BufWriter<File>,
    pb: &ProgressBar,
) -> anyhow::Result<u64> {
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        writer.write_all(&chunk)?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    writer.flush()?;
    Ok(written)
}
