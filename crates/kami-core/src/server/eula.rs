use std::path::{Path, PathBuf};

use tracing::info;

use crate::{consts::EULA_FILE, fs::write_to_file};

/// Writes `eula.txt` accepting the Minecraft EULA.
pub async fn accept_eula(server_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = server_dir.join(EULA_FILE);
    write_to_file(b"eula=true\n", &path).await?;

    info!("Accepted the Minecraft EULA in {}", path.display());
    Ok(path)
}
