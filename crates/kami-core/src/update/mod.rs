//! Self-update from the installer's GitHub releases.

use std::path::{Path, PathBuf};

use anyhow::Context;
use semver::Version;
use tracing::{debug, info, warn};

use crate::{
    consts::{DEV_VERSION, INSTALLER_BINARY, RELEASE_FEED},
    downloads::{download_file, ProgressSink},
    error::{Error, Result},
    http::HttpClient,
    platform::{Arch, OsKind, Platform},
    repository::release::Release,
};

pub mod archive;

pub const UPDATE_ARCHIVE: &str = "update.tar.gz";

/// Operating system and architecture a release asset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub os: OsKind,
    pub arch: Arch,
}

impl ReleaseTarget {
    pub fn of(platform: &dyn Platform) -> Self {
        Self {
            os: platform.os(),
            arch: platform.arch(),
        }
    }

    /// Name of the archive published for this target, if there is one.
    pub fn asset_name(self) -> Option<String> {
        let arch = match (self.os, self.arch) {
            (OsKind::Windows, Arch::Arm64) => return None,
            (_, arch) => arch.release_name()?,
        };

        Some(format!(
            "{INSTALLER_BINARY}_{}_{arch}.tar.gz",
            self.os.release_name()
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCheck {
    pub update_available: bool,
    pub remote_version: Option<String>,
    /// Download of the archive for the running platform. `None` means an
    /// update can be detected but not installed.
    pub asset_url: Option<String>,
}

/// Parses a release tag such as `v1.4` or `1.4.2`.
pub fn parse_tag(tag: &str) -> Result<Version> {
    let trimmed = tag.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let (core, suffix) = trimmed
        .find(['-', '+'])
        .map_or((trimmed, ""), |at| trimmed.split_at(at));
    let padding = match core.matches('.').count() {
        0 => ".0.0",
        1 => ".0",
        _ => "",
    };

    Version::parse(&format!("{core}{padding}{suffix}")).map_err(|source| Error::VersionParse {
        tag: tag.to_owned(),
        source,
    })
}

pub fn is_newer(current: &str, remote: &str) -> Result<bool> {
    Ok(parse_tag(remote)? > parse_tag(current)?)
}

fn evaluate(release: &Release, current: &Version, target: ReleaseTarget) -> Result<UpdateCheck> {
    let remote = parse_tag(&release.tag_name)?;
    let update_available = remote > *current;

    let asset_url = target.asset_name().and_then(|name| {
        let asset = release.find_asset(&name);
        if asset.is_none() {
            warn!("Release {} has no {name}", release.tag_name);
        }
        asset.map(|asset| asset.browser_download_url.clone())
    });

    Ok(UpdateCheck {
        update_available,
        remote_version: Some(release.tag_name.clone()),
        asset_url,
    })
}

#[derive(Debug, Clone)]
pub struct UpdateChecker {
    http: HttpClient,
    feed_url: String,
    target: ReleaseTarget,
}

impl UpdateChecker {
    pub fn new(http: HttpClient, target: ReleaseTarget) -> Self {
        Self::with_feed_url(http, RELEASE_FEED, target)
    }

    pub fn with_feed_url(http: HttpClient, feed_url: impl Into<String>, target: ReleaseTarget) -> Self {
        Self {
            http,
            feed_url: feed_url.into(),
            target,
        }
    }

    pub async fn latest_release(&self) -> Result<Release> {
        self.http
            .get_json(&self.feed_url)
            .await
            .map_err(|err| err.describe_missing("the latest installer release"))
    }

    /// Compares `current` with the latest release.
    ///
    /// Development builds never update and do not touch the network.
    pub async fn check_for_update(&self, current: &str) -> Result<UpdateCheck> {
        info!("Checking for updates...");

        if current == DEV_VERSION {
            debug!("Development build, skipping the update check");
            return Ok(UpdateCheck::default());
        }

        let current = parse_tag(current)?;
        let release = self.latest_release().await?;

        evaluate(&release, &current, self.target)
    }

    /// Downloads the update archive into `staging_dir`.
    pub async fn download_update(
        &self,
        url: &str,
        staging_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<PathBuf> {
        let path = staging_dir.join(UPDATE_ARCHIVE);
        download_file(&self.http, url, &path, progress).await?;

        Ok(path)
    }
}

/// Extracts `archive` and hands the new installer binary to the platform to
/// put in place of `current_exe`. Staging files are removed afterwards.
pub async fn install_update(
    archive: &Path,
    staging_dir: &Path,
    platform: &dyn Platform,
    current_exe: &Path,
) -> anyhow::Result<PathBuf> {
    let extract_dir = staging_dir.join("update");
    let file_name = platform.installer_file_name();

    let binary = {
        let archive = archive.to_path_buf();
        let extract_dir = extract_dir.clone();

        tokio::task::spawn_blocking(move || {
            archive::extract_tar_gz(&archive, &extract_dir)?;
            archive::find_file(&extract_dir, file_name)
        })
        .await??
        .with_context(|| format!("the update does not contain {file_name}"))?
    };

    let installed = platform.install_executable(&binary, current_exe).await?;

    for result in [
        tokio::fs::remove_file(archive).await,
        tokio::fs::remove_dir_all(&extract_dir).await,
    ] {
        if let Err(err) = result {
            warn!("Failed to clean up the update: {err}");
        }
    }

    info!("Update installed to {}", installed.display());
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        platform::Linux,
        repository::release::ReleaseAsset,
    };

    fn release(tag: &str, assets: &[&str]) -> Release {
        Release {
            tag_name: tag.into(),
            assets: assets
                .iter()
                .map(|name| ReleaseAsset {
                    name: (*name).to_owned(),
                    browser_download_url: format!("https://example.invalid/{name}"),
                    size: 0,
                })
                .collect(),
            ..Release::default()
        }
    }

    const LINUX_X64: ReleaseTarget = ReleaseTarget {
        os: OsKind::Linux,
        arch: Arch::X86_64,
    };

    #[test]
    fn tags_are_normalized() {
        assert_eq!(parse_tag("v1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(parse_tag("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_tag("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(parse_tag("v1.3-rc.1").unwrap().pre.as_str(), "rc.1");

        assert!(matches!(parse_tag("latest"), Err(Error::VersionParse { .. })));
    }

    #[test]
    fn only_strictly_newer_is_an_update() {
        assert!(is_newer("1.2.0", "v1.3.0").unwrap());
        assert!(!is_newer("1.3.0", "v1.3.0").unwrap());
        assert!(!is_newer("1.4.0", "v1.3.0").unwrap());
    }

    #[test]
    fn asset_table() {
        let name = |os, arch| ReleaseTarget { os, arch }.asset_name();

        assert_eq!(
            name(OsKind::Linux, Arch::Arm64).as_deref(),
            Some("kami-chan-server-installer_Linux_arm64.tar.gz")
        );
        assert_eq!(
            name(OsKind::Windows, Arch::X86_64).as_deref(),
            Some("kami-chan-server-installer_Windows_x86_64.tar.gz")
        );
        assert_eq!(
            name(OsKind::MacOs, Arch::Arm64).as_deref(),
            Some("kami-chan-server-installer_Darwin_arm64.tar.gz")
        );
        assert_eq!(name(OsKind::Windows, Arch::Arm64), None);
        assert_eq!(name(OsKind::Linux, Arch::Unknown), None);
    }

    #[test]
    fn newer_release_with_matching_asset() {
        let release = release(
            "v1.3.0",
            &[
                "kami-chan-server-installer_Windows_x86_64.tar.gz",
                "kami-chan-server-installer_Linux_x86_64.tar.gz",
            ],
        );

        let check = evaluate(&release, &Version::new(1, 2, 0), LINUX_X64).unwrap();

        assert_eq!(
            check,
            UpdateCheck {
                update_available: true,
                remote_version: Some("v1.3.0".into()),
                asset_url: Some(
                    "https://example.invalid/kami-chan-server-installer_Linux_x86_64.tar.gz".into()
                ),
            }
        );
    }

    #[test]
    fn missing_asset_is_not_installable() {
        let release = release("v1.3.0", &["kami-chan-server-installer_Windows_x86_64.tar.gz"]);

        let check = evaluate(&release, &Version::new(1, 2, 0), LINUX_X64).unwrap();

        assert!(check.update_available);
        assert_eq!(check.asset_url, None);
    }

    #[test]
    fn same_version_is_not_an_update() {
        let check = evaluate(&release("1.2.0", &[]), &Version::new(1, 2, 0), LINUX_X64).unwrap();

        assert!(!check.update_available);
    }

    #[tokio::test]
    async fn dev_build_skips_the_feed() {
        // Nothing listens here; the check must not try.
        let checker = UpdateChecker::with_feed_url(
            HttpClient::new().unwrap(),
            "http://127.0.0.1:9/releases/latest",
            LINUX_X64,
        );

        let check = checker.check_for_update(DEV_VERSION).await.unwrap();

        assert_eq!(check, UpdateCheck::default());
    }

    #[tokio::test]
    async fn bad_current_version_is_surfaced() {
        let checker = UpdateChecker::with_feed_url(
            HttpClient::new().unwrap(),
            "http://127.0.0.1:9/releases/latest",
            LINUX_X64,
        );

        let err = checker.check_for_update("nightly").await.unwrap_err();

        assert!(matches!(err, Error::VersionParse { ref tag, .. } if tag == "nightly"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn installs_extracted_binary_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("temp");
        std::fs::create_dir_all(&staging).unwrap();
        let archive = staging.join(UPDATE_ARCHIVE);
        archive::tests::write_archive(&archive, &[("kami-chan-server-installer", &b"v2"[..])]);
        let current = dir.path().join("kami-chan-server-installer");
        std::fs::write(&current, "v1").unwrap();

        let installed = install_update(&archive, &staging, &Linux::new(Arch::X86_64), &current)
            .await
            .unwrap();

        assert_eq!(installed, current);
        assert_eq!(std::fs::read_to_string(&current).unwrap(), "v2");
        assert!(!archive.exists());
        assert!(!staging.join("update").exists());
    }
}
