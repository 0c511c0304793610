// SHA-256 digests for patch integrity checks

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hex-encoded SHA-256 of the file at `path`, read in 8 KiB blocks.
pub fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; crate::constants::DOWNLOAD_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Parse a checksum file body. Accepts a bare hex digest or the
/// `sha256sum` format (`<digest>  <file name>`), with an optional
/// `sha256:` prefix.
pub fn parse_checksum(body: &str) -> anyhow::Result<String> {
    let field = body
        .split_whitespace()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Checksum file is empty"))?;
    let digest = field.strip_prefix("sha256:").unwrap_or(field).to_lowercase();

    if digest.len() != 64 || hex::decode(&digest).is_err() {
        anyhow::bail!("Not a SHA-256 hex digest: '{}'", field);
    }
    Ok(digest)
}
