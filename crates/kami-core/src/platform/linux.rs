use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::info;

use crate::{
    consts::{INSTALLER_BINARY, SERVER_JAR, START_SCRIPT},
    downloads::ProgressSink,
    http::HttpClient,
    server::script,
};

use super::{process::run_or_log, Arch, JavaInstallOptions, OsKind, Platform};

const DEBIAN_GUIDE: &str = "https://docs.papermc.io/misc/java-install#ubuntudebian";
const RPM_GUIDE: &str = "https://docs.papermc.io/misc/java-install#rpm-based";

pub struct Linux {
    arch: Arch,
}

impl Linux {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

#[async_trait::async_trait]
impl Platform for Linux {
    fn os(&self) -> OsKind {
        OsKind::Linux
    }

    fn arch(&self) -> Arch {
        self.arch
    }

    fn print_warning(&self) {
        info!("Good job for using Linux!");
    }

    fn java_package_url(&self, major: u32) -> Option<String> {
        let arch = self.arch.corretto_name()?;
        Some(format!(
            "https://corretto.aws/downloads/latest/amazon-corretto-{major}-{arch}-linux-jdk.deb"
        ))
    }

    async fn download_java_package(
        &self,
        client: &HttpClient,
        major: u32,
        temp_dir: &Path,
        options: &JavaInstallOptions,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<Option<PathBuf>> {
        if !options.install_java_please {
            info!("Java will not be downloaded, please install it with your package manager");
            return Ok(None);
        }

        let url = self
            .java_package_url(major)
            .ok_or_else(|| anyhow::anyhow!("no Java package for Linux on {:?}", self.arch))?;

        super::fetch_package(client, &url, temp_dir, progress)
            .await
            .map(Some)
    }

    async fn install_java_package(
        &self,
        package: &Path,
        _temp_dir: &Path,
        options: &JavaInstallOptions,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(is_root(), "you must be root to install Java automatically");

        let mut command = Command::new("dpkg");
        command.arg("-i").arg(package);

        run_or_log(command, options.debug).await
    }

    fn print_java_guide(&self) {
        info!("Install Java following the Paper guide: {DEBIAN_GUIDE}");
        info!("On CentOS, RHEL, Fedora, openSUSE, SLES or other RPM based distributions use: {RPM_GUIDE}");
    }

    fn start_script_path(&self, server_dir: &Path) -> PathBuf {
        server_dir.join(format!("{START_SCRIPT}.sh"))
    }

    fn render_start_script(&self, heap_mib: u64) -> String {
        script::unix_script(heap_mib, SERVER_JAR)
    }

    fn installer_file_name(&self) -> &'static str {
        INSTALLER_BINARY
    }

    async fn install_executable(&self, new: &Path, current: &Path) -> anyhow::Result<PathBuf> {
        replace_executable(new, current).await
    }
}

/// Replaces the running binary. Unix keeps the old inode alive for the
/// running process, so overwriting by rename is safe.
pub(super) async fn replace_executable(new: &Path, current: &Path) -> anyhow::Result<PathBuf> {
    super::move_file(new, current).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = std::fs::Permissions::from_mode(0o755);
        if let Err(err) = tokio::fs::set_permissions(current, permissions).await {
            tracing::warn!("Failed to mark {} executable: {err}", current.display());
        }
    }

    Ok(current.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corretto_deb_url() {
        let linux = Linux::new(Arch::Arm64);

        assert_eq!(
            linux.java_package_url(21).as_deref(),
            Some("https://corretto.aws/downloads/latest/amazon-corretto-21-aarch64-linux-jdk.deb")
        );
        assert_eq!(Linux::new(Arch::Unknown).java_package_url(21), None);
    }

    #[tokio::test]
    async fn java_is_left_to_the_user_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let linux = Linux::new(Arch::X86_64);

        let package = linux
            .download_java_package(
                &HttpClient::new().unwrap(),
                21,
                dir.path(),
                &JavaInstallOptions::default(),
                &crate::downloads::NoProgress,
            )
            .await
            .unwrap();

        assert!(package.is_none());
    }

    #[test]
    fn start_script_is_a_shell_script() {
        let linux = Linux::new(Arch::X86_64);

        assert_eq!(
            linux.start_script_path(Path::new("server")),
            Path::new("server").join("start.sh")
        );
        assert!(linux.render_start_script(2048).starts_with("#!/usr/bin/env sh\n"));
    }
}
