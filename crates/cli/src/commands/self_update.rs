use anyhow::Context as _;
use kami_core::{update::install_update, INSTALLER_NAME, INSTALLER_VERSION};
use tracing::info;

use crate::progress::ProgressBarSink;

use super::Context;

pub async fn self_update(context: &Context) -> anyhow::Result<()> {
    let checker = context.update_checker();
    let check = checker.check_for_update(INSTALLER_VERSION).await?;

    if !check.update_available {
        info!("{INSTALLER_NAME} {INSTALLER_VERSION} is up to date");
        return Ok(());
    }

    let version = check.remote_version.unwrap_or_default();
    let url = check
        .asset_url
        .with_context(|| format!("{version} has no build for this platform"))?;

    info!("Downloading {version} from {url}");
    let archive = checker
        .download_update(&url, &context.temp_dir, &ProgressBarSink::new("Update"))
        .await?;

    let current = std::env::current_exe().context("failed to locate the running installer")?;
    install_update(
        &archive,
        &context.temp_dir,
        context.platform.as_ref(),
        &current,
    )
    .await?;

    info!("Update complete! Run the installer again to use {version}.");
    Ok(())
}
