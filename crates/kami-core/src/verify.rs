use std::{io::ErrorKind, path::Path};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{Error, Result};

const BUFFER_SIZE: usize = 64 * 1024;

/// Hex-encoded SHA-256 of the file at `path`, read in chunks.
pub async fn sha256_file(path: &Path) -> Result<String> {
    let integrity = |source: std::io::Error| Error::IntegrityCheck {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(integrity)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer).await.map_err(integrity)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Whether the artifact at `path` has to be (re)downloaded.
///
/// A missing file always needs a download. An existing one is kept only if
/// its hash equals `expected_sha256`.
pub async fn should_download(path: &Path, expected_sha256: &str) -> Result<bool> {
    let actual = match sha256_file(path).await {
        Ok(hash) => hash,
        Err(Error::IntegrityCheck { source, .. }) if source.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(true);
        }
        Err(err) => return Err(err),
    };

    let matches = actual.eq_ignore_ascii_case(expected_sha256.trim());
    debug!(
        "{}: local {actual}, remote {expected_sha256}, up to date: {matches}",
        path.display()
    );

    Ok(!matches)
}
