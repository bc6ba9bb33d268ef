use std::{io::ErrorKind, path::Path};

use anyhow::Context;
use tokio::process::Command;
use tracing::{info, warn};

use crate::{
    downloads::ProgressSink,
    http::HttpClient,
    paper::VersionRequest,
    platform::{JavaInstallOptions, Platform},
};

/// Java required by the newest Minecraft release.
pub const LATEST_JAVA: u32 = 21;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaVersion {
    pub version: String,
    pub major: u32,
    pub minor: u32,
}

impl JavaVersion {
    /// Parses the output of `java -version`, e.g. `openjdk version "21.0.3" 2024-04-16`.
    ///
    /// Legacy `1.x` versions report `x` as their major version.
    pub fn parse(output: &str) -> Option<Self> {
        let version = output.split('"').nth(1)?;

        let mut parts = version
            .split(['.', '_', '-', '+'])
            .map(str::parse::<u32>);

        let (major, minor) = match parts.next()?.ok()? {
            1 => (parts.next()?.ok()?, parts.next().and_then(Result::ok).unwrap_or(0)),
            major => (major, parts.next().and_then(Result::ok).unwrap_or(0)),
        };

        Some(Self {
            version: version.to_owned(),
            major,
            minor,
        })
    }

    /// Runs `java -version`. `None` when Java is not installed.
    pub async fn detect() -> anyhow::Result<Option<Self>> {
        let output = match Command::new("java").arg("-version").output().await {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).context("failed to run `java -version`"),
        };

        // Java prints its version to stderr.
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );

        Self::parse(&text)
            .map(Some)
            .with_context(|| format!("unexpected `java -version` output: {text}"))
    }
}

/// Java major version a Minecraft version needs to run.
pub fn required_java_major(request: &VersionRequest) -> anyhow::Result<u32> {
    let version = match request {
        VersionRequest::Latest => return Ok(LATEST_JAVA),
        VersionRequest::Exact(version) => version,
    };

    let parse = |part: Option<&str>| -> anyhow::Result<u32> {
        part.unwrap_or("0")
            .parse()
            .with_context(|| format!("invalid Minecraft version: {version}"))
    };

    let mut parts = version.split('.');
    let major = parse(parts.next())?;
    let minor = parse(parts.next())?;
    let patch = parse(parts.next())?;

    anyhow::ensure!(major == 1, "invalid Minecraft version: {version}");

    match (minor, patch) {
        (8..=16, _) => Ok(8),
        (17, _) => Ok(16),
        (18..=19, _) | (20, 0..=4) => Ok(17),
        (20.., _) => Ok(21),
        _ => anyhow::bail!("Minecraft {version} is too old to be installed"),
    }
}

/// Makes sure Java `required` or newer is installed, installing it when the
/// platform can.
pub async fn ensure_java(
    platform: &dyn Platform,
    client: &HttpClient,
    required: u32,
    temp_dir: &Path,
    options: &JavaInstallOptions,
    progress: &dyn ProgressSink,
) -> anyhow::Result<()> {
    info!("Checking for Java...");

    match JavaVersion::detect().await? {
        Some(java) if java.major >= required => {
            info!("Java version: {}", java.version);
            return Ok(());
        }
        Some(java) => info!("Java {} is too old, {required} is required", java.version),
        None => info!("Java is not installed, {required} is required"),
    }

    match platform
        .download_java_package(client, required, temp_dir, options, progress)
        .await?
    {
        Some(package) => {
            info!("Installing Java...");
            platform
                .install_java_package(&package, temp_dir, options)
                .await?;
        }
        None => platform.print_java_guide(),
    }

    if options.debug {
        warn!("Debug mode, skipping the Java version re-check");
        return Ok(());
    }

    match JavaVersion::detect().await? {
        Some(java) if java.major >= required => {
            info!("Java version: {}", java.version);
            Ok(())
        }
        _ => anyhow::bail!("Java version must be at least {required}"),
    }
}
