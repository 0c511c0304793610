// Patch version tokens: local marker file, remote lookup and ordering

use crate::constants;
use crate::http;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How two version tokens are ordered.
///
/// `Lexical` compares the raw strings, which is what the patch server's
/// fixed-width hex timestamps need. It gets multi-digit decimal counters
/// wrong ("9" sorts after "10"). `Numeric` compares tokens that both parse
/// as unsigned integers by value and falls back to lexical otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    #[default]
    Lexical,
    Numeric,
}

impl VersionOrdering {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            VersionOrdering::Lexical => a.cmp(b),
            VersionOrdering::Numeric => match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            },
        }
    }

    /// True if `remote` orders strictly after `local`.
    pub fn is_newer(&self, local: &str, remote: &str) -> bool {
        self.compare(remote, local) == Ordering::Greater
    }
}

/// Result of comparing the local marker against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The server could not be reached or answered with an error status.
    Unreachable { reason: String },
    UpToDate { local: String, remote: String },
    Available { local: String, remote: String },
}

/// Read the local version token, or `"0"` when no marker exists yet.
pub fn read_local_version(marker: &Path) -> anyhow::Result<String> {
    if !marker.exists() {
        return Ok(constants::DEFAULT_LOCAL_VERSION.to_string());
    }
    Ok(fs::read_to_string(marker)?.trim().to_string())
}

/// Persist `token` to the marker, replacing any previous value.
pub fn write_local_version(marker: &Path, token: &str) -> anyhow::Result<()> {
    if let Some(parent) = marker.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(marker, token)?;
    Ok(())
}

/// Fetch the latest version token from the server.
pub async fn fetch_remote_version(url: &str) -> anyhow::Result<String> {
    let body = http::fetch_text(
        url,
        Duration::from_secs(constants::VERSION_CHECK_TIMEOUT_SECS),
    )
    .await?;
    let token = body.trim();
    if token.is_empty() {
        anyhow::bail!("Server returned an empty version from {}", url);
    }
    Ok(token.to_string())
}

/// Compare the marker at `marker` with the token served at `url`.
///
/// Connectivity problems come back as `UpdateStatus::Unreachable`; only
/// local I/O errors are returned as `Err`.
pub async fn check_for_update(
    url: &str,
    marker: &Path,
    ordering: VersionOrdering,
) -> anyhow::Result<UpdateStatus> {
    let local = read_local_version(marker)?;

    let remote = match fetch_remote_version(url).await {
        Ok(remote) => remote,
        Err(e) => {
            warn!("Version check against {} failed: {:#}", url, e);
            return Ok(UpdateStatus::Unreachable {
                reason: format!("{:#}", e),
            });
        }
    };

    debug!("local={} remote={} ordering={:?}", local, remote, ordering);

    if ordering.is_newer(&local, &remote) {
        Ok(UpdateStatus::Available { local, remote })
    } else {
        Ok(UpdateStatus::UpToDate { local, remote })
    }
}
