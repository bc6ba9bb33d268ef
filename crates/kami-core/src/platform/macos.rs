use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::warn;

use crate::{
    consts::{INSTALLER_BINARY, SERVER_JAR, START_SCRIPT},
    server::script,
};

use super::{linux::replace_executable, process::run_or_log, Arch, JavaInstallOptions, OsKind, Platform};

pub struct MacOs {
    arch: Arch,
}

impl MacOs {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }
}

#[async_trait::async_trait]
impl Platform for MacOs {
    fn os(&self) -> OsKind {
        OsKind::MacOs
    }

    fn arch(&self) -> Arch {
        self.arch
    }

    fn print_warning(&self) {
        warn!("macOS is not the best OS for running a Minecraft server. You may experience issues with performance or stability.");
    }

    fn java_package_url(&self, major: u32) -> Option<String> {
        let arch = self.arch.corretto_name()?;
        Some(format!(
            "https://corretto.aws/downloads/latest/amazon-corretto-{major}-{arch}-macos-jdk.pkg"
        ))
    }

    async fn install_java_package(
        &self,
        package: &Path,
        _temp_dir: &Path,
        options: &JavaInstallOptions,
    ) -> anyhow::Result<()> {
        let mut command = Command::new("installer");
        command
            .arg("-pkg")
            .arg(package)
            .args(["-target", "CurrentUserHomeDirectory"]);

        run_or_log(command, options.debug).await
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corretto_pkg_url() {
        assert_eq!(
            MacOs::new(Arch::X86_64).java_package_url(17).as_deref(),
            Some("https://corretto.aws/downloads/latest/amazon-corretto-17-x64-macos-jdk.pkg")
        );
    }
}
