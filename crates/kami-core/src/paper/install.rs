use std::path::PathBuf;

use tracing::{error, info, warn};
use typed_builder::TypedBuilder;

use crate::{
    downloads::ProgressSink,
    error::{Error, Result},
    verify::{sha256_file, should_download},
};

use super::{selector::BuildSelector, ArtifactSource, VersionRequest};

#[derive(Debug, TypedBuilder)]
pub struct InstallRequest {
    #[builder(setter(into))]
    pub project: String,
    #[builder(default)]
    pub version: VersionRequest,
    #[builder(default)]
    pub allow_experimental: bool,
    /// Where the artifact ends up, e.g. `server/paper.jar`.
    #[builder(setter(into))]
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub version: String,
    pub build: u32,
    pub newest_build: u32,
    /// `false` when the local file already matched the remote hash.
    pub downloaded: bool,
}

/// Resolves a build, checks the local artifact against its hash and downloads
/// it only if it differs.
pub async fn install_paper<S: ArtifactSource + ?Sized>(
    source: &S,
    request: &InstallRequest,
    progress: &dyn ProgressSink,
) -> Result<InstallOutcome> {
    let resolved = BuildSelector::new(source, &request.project)
        .resolve(&request.version, request.allow_experimental)
        .await?;

    let artifact = resolved.build.artifact();
    let outcome = InstallOutcome {
        version: resolved.version.clone(),
        build: resolved.build.build,
        newest_build: resolved.newest_build,
        downloaded: false,
    };

    if !should_download(&request.destination, &artifact.sha256).await? {
        info!(
            "{} {} build {} is already installed",
            request.project, resolved.version, resolved.build.build
        );
        return Ok(outcome);
    }

    info!(
        "Installing {} {} build {} ({})",
        request.project, resolved.version, resolved.build.build, resolved.build.channel
    );

    source
        .download_artifact(
            &request.project,
            &resolved.version,
            resolved.build.build,
            &artifact.name,
            &request.destination,
            progress,
        )
        .await?;

    let actual = sha256_file(&request.destination).await?;
    if !actual.eq_ignore_ascii_case(&artifact.sha256) {
        error!("Downloaded {} is corrupt", artifact.name);

        if let Err(err) = tokio::fs::remove_file(&request.destination).await {
            warn!(
                "Failed to remove {}: {err}",
                request.destination.display()
            );
        }

        return Err(Error::ChecksumMismatch {
            path: request.destination.clone(),
            expected: artifact.sha256.clone(),
            actual,
        });
    }

    Ok(InstallOutcome {
        downloaded: true,
        ..outcome
    })
}
