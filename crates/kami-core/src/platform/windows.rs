use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{info, warn};

use crate::{
    consts::{INSTALLER_BINARY, SERVER_JAR, START_SCRIPT},
    server::script,
};

use super::{process::run_or_log, Arch, JavaInstallOptions, OsKind, Platform};

pub struct Windows {
    arch: Arch,
}

impl Windows {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

#[async_trait::async_trait]
impl Platform for Windows {
    fn os(&self) -> OsKind {
        OsKind::Windows
    }

    fn arch(&self) -> Arch {
        self.arch
    }

    fn print_warning(&self) {
        warn!("Windows is not the best OS for running a Minecraft server. You may experience issues with performance or stability.");
    }

    /// Corretto only ships an x64 MSI.
    fn java_package_url(&self, major: u32) -> Option<String> {
        (self.arch == Arch::X86_64).then(|| {
            format!("https://corretto.aws/downloads/latest/amazon-corretto-{major}-x64-windows-jdk.msi")
        })
    }

    async fn install_java_package(
        &self,
        package: &Path,
        temp_dir: &Path,
        options: &JavaInstallOptions,
    ) -> anyhow::Result<()> {
        let mut command = Command::new("msiexec");
        command
            .arg("/i")
            .arg(package)
            .args(["/quiet", "/qn", "/norestart", "/log"])
            .arg(temp_dir.join("java-install.log"));

        run_or_log(command, options.debug).await
    }

    fn start_script_path(&self, server_dir: &Path) -> PathBuf {
        server_dir.join(format!("{START_SCRIPT}.bat"))
    }

    fn render_start_script(&self, heap_mib: u64) -> String {
        script::windows_script(heap_mib, SERVER_JAR)
    }

    fn installer_file_name(&self) -> &'static str {
        "kami-chan-server-installer.exe"
    }

    /// A running executable cannot be overwritten, so the new one is placed
    /// next to it.
    async fn install_executable(&self, new: &Path, current: &Path) -> anyhow::Result<PathBuf> {
        let target = current.with_file_name(format!("{INSTALLER_BINARY}.new.exe"));
        super::move_file(new, &target).await?;

        info!(
            "The new version was saved as {}. Replace {} with it once this window is closed.",
            target.display(),
            current.display()
        );

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msi_only_for_x64() {
        assert_eq!(
            Windows::new(Arch::X86_64).java_package_url(21).as_deref(),
            Some("https://corretto.aws/downloads/latest/amazon-corretto-21-x64-windows-jdk.msi")
        );
        assert_eq!(Windows::new(Arch::Arm64).java_package_url(21), None);
    }

    #[test]
    fn batch_script_pauses() {
        let script = Windows::new(Arch::X86_64).render_start_script(1024);

        assert!(script.starts_with("@echo off\r\n"));
        assert!(script.trim_end().ends_with("pause"));
    }

    #[tokio::test]
    async fn new_binary_lands_next_to_current() {
        let dir = tempfile::tempdir().unwrap();
        let new = dir.path().join("download.exe");
        let current = dir.path().join("kami-chan-server-installer.exe");
        std::fs::write(&new, "new").unwrap();
        std::fs::write(&current, "old").unwrap();

        let placed = Windows::new(Arch::X86_64)
            .install_executable(&new, &current)
            .await
            .unwrap();

        assert_eq!(placed, dir.path().join("kami-chan-server-installer.new.exe"));
        assert_eq!(std::fs::read_to_string(&current).unwrap(), "old");
        assert_eq!(std::fs::read_to_string(&placed).unwrap(), "new");
    }
}
