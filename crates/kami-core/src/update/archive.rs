use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context;
use flate2::read::GzDecoder;
use tar::Archive;
use walkdir::WalkDir;

pub fn extract_tar_gz(archive: &Path, target: &Path) -> anyhow::Result<()> {
    let file = File::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;

    std::fs::create_dir_all(target)?;

    let tar = GzDecoder::new(file);
    let mut archive = Archive::new(tar);
    archive
        .unpack(target)
        .with_context(|| format!("failed to extract into {}", target.display()))
}

/// Finds a regular file called `name` somewhere below `dir`.
pub fn find_file(dir: &Path, name: &str) -> anyhow::Result<Option<PathBuf>> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;

        if entry.file_type().is_file() && entry.file_name() == name {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}
