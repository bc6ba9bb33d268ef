//! Operating system specific behaviour, selected at runtime.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::info;

use crate::{
    downloads::{download_file, ProgressSink},
    http::HttpClient,
    server::script,
};

pub mod linux;
pub mod macos;
pub mod process;
pub mod windows;

pub use linux::Linux;
pub use macos::MacOs;
pub use windows::Windows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Linux,
    MacOs,
    Windows,
}

impl OsKind {
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::MacOs),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Name used in release asset names.
    pub fn release_name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOs => "Darwin",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Arm64,
    Unknown,
}

impl Arch {
    pub fn detect() -> Self {
        Self::from_name(&sysinfo::System::cpu_arch())
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Self::X86_64,
            "aarch64" | "arm64" => Self::Arm64,
            _ => Self::Unknown,
        }
    }

    /// Architecture token in Corretto download URLs.
    pub fn corretto_name(self) -> Option<&'static str> {
        match self {
            Self::X86_64 => Some("x64"),
            Self::Arm64 => Some("aarch64"),
            Self::Unknown => None,
        }
    }

    /// Architecture token in release asset names.
    pub fn release_name(self) -> Option<&'static str> {
        match self {
            Self::X86_64 => Some("x86_64"),
            Self::Arm64 => Some("arm64"),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaInstallOptions {
    /// Log install commands instead of running them.
    pub debug: bool,
    /// Lets the Linux platform install a `.deb` itself.
    pub install_java_please: bool,
}

#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    fn os(&self) -> OsKind;

    fn arch(&self) -> Arch;

    fn print_warning(&self);

    /// Corretto package for `major`, if this OS and architecture have one.
    fn java_package_url(&self, major: u32) -> Option<String>;

    /// Downloads the Java package into `temp_dir`.
    ///
    /// `None` means the user has to install Java on their own.
    async fn download_java_package(
        &self,
        client: &HttpClient,
        major: u32,
        temp_dir: &Path,
        _options: &JavaInstallOptions,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<Option<PathBuf>> {
        let url = self.java_package_url(major).with_context(|| {
            format!("no Java package for {} on {:?}", self.os(), self.arch())
        })?;

        fetch_package(client, &url, temp_dir, progress).await.map(Some)
    }

    async fn install_java_package(
        &self,
        package: &Path,
        temp_dir: &Path,
        options: &JavaInstallOptions,
    ) -> anyhow::Result<()>;

    /// Tells the user how to install Java by hand.
    fn print_java_guide(&self) {}

    fn start_script_path(&self, server_dir: &Path) -> PathBuf;

    fn render_start_script(&self, heap_mib: u64) -> String;

    async fn write_start_script(&self, server_dir: &Path, heap_mib: u64) -> anyhow::Result<PathBuf> {
        let path = self.start_script_path(server_dir);
        script::write_script(&path, &self.render_start_script(heap_mib)).await?;

        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// File name of the installer binary inside release archives.
    fn installer_file_name(&self) -> &'static str;

    /// Puts a freshly downloaded installer binary in place of `current`.
    /// Returns where it ended up.
    async fn install_executable(&self, new: &Path, current: &Path) -> anyhow::Result<PathBuf>;
}

/// Platform of the running machine.
pub fn detect() -> anyhow::Result<Box<dyn Platform>> {
    let arch = Arch::detect();

    match OsKind::current() {
        Some(OsKind::Linux) => Ok(Box::new(Linux::new(arch))),
        Some(OsKind::MacOs) => Ok(Box::new(MacOs::new(arch))),
        Some(OsKind::Windows) => Ok(Box::new(Windows::new(arch))),
        None => anyhow::bail!("{} is not supported", std::env::consts::OS),
    }
}

async fn fetch_package(
    client: &HttpClient,
    url: &str,
    temp_dir: &Path,
    progress: &dyn ProgressSink,
) -> anyhow::Result<PathBuf> {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .with_context(|| format!("{url} has no file name"))?;
    let path = temp_dir.join(file_name);

    info!("Downloading Java from {url}");
    download_file(client, url, &path, progress).await?;

    Ok(path)
}

/// Moves `from` onto `to`, copying when a rename is not possible.
pub(crate) async fn move_file(from: &Path, to: &Path) -> anyhow::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(from, to)
        .await
        .with_context(|| format!("failed to copy {} to {}", from.display(), to.display()))?;
    tokio::fs::remove_file(from).await?;

    Ok(())
}
