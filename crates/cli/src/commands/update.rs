use kami_core::{
    configs::InstallerConfig,
    paper::{install_paper, InstallRequest, PaperClient, VersionRequest},
    PAPER_PROJECT, SERVER_JAR,
};
use tracing::{info, warn};

use crate::progress::ProgressBarSink;

use super::Context;

/// Moves the installed server to the newest build of its Minecraft version.
pub async fn update(context: &Context, allow_experimental: bool) -> anyhow::Result<()> {
    info!("Updating the server...");

    let server_dir = &context.server_dir;
    let mut config = InstallerConfig::load(server_dir).await?;

    let version = match config.minecraft_version() {
        Some(version) => VersionRequest::Exact(version.to_owned()),
        None => {
            warn!("No installed Minecraft version recorded, using the latest one");
            VersionRequest::Latest
        }
    };

    if let Some(build) = config.paper_build {
        info!("Installed: Paper {version} build {build}");
    }

    let request = InstallRequest::builder()
        .project(PAPER_PROJECT)
        .version(version)
        .allow_experimental(allow_experimental)
        .destination(server_dir.join(SERVER_JAR))
        .build();
    let outcome = install_paper(
        &PaperClient::new(context.http.clone()),
        &request,
        &ProgressBarSink::new("Paper"),
    )
    .await?;

    if outcome.downloaded {
        info!("Updated to Paper {} build {}", outcome.version, outcome.build);
    } else {
        info!("Paper {} build {} is already up to date", outcome.version, outcome.build);
    }

    config.record_install(&outcome);
    config.save(server_dir).await?;

    info!("Update complete!");
    Ok(())
}
