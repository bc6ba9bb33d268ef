use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

/// Decodes `s`, naming `path` and the offending field on failure.
pub fn parse_json_config<T>(s: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(s);
    let body: T = serde_path_to_error::deserialize(&mut deserializer).with_context(|| {
        format!("{} is not a valid config", path.to_string_lossy())
    })?;

    tracing::debug!("Config {} has been read successfully", path.to_string_lossy());

    Ok(body)
}

pub async fn write_json_config<T>(data: &T, path: impl AsRef<Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let body = serde_json::to_string_pretty(data)?;

    write_to_file(body.as_bytes(), path).await?;

    tracing::debug!("Config {} saved successfully", path.to_string_lossy());

    Ok(())
}

/// Writes `data` next to `path` first and renames it into place, so readers
/// never see a half written file.
pub async fn write_to_file(data: &[u8], path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let staging = staging_path(path);
    let written = write_staged(data, &staging).await;

    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(err);
    }

    tokio::fs::rename(&staging, path)
        .await
        .with_context(|| format!("failed to move {} into place", path.display()))
}

async fn write_staged(data: &[u8], staging: &Path) -> anyhow::Result<()> {
    let mut file = tokio::fs::File::create(staging)
        .await
        .with_context(|| format!("failed to create {}", staging.display()))?;

    file.write_all(data).await?;
    file.sync_all().await?;

    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
