//! `.kami.json`, the installer's record of what it put into a server directory.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    consts::CONFIG_FILE,
    fs::{parse_json_config, write_json_config},
    paper::InstallOutcome,
};

mod build_number;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerConfig {
    #[serde(default)]
    pub minecraft_version: String,
    /// Installed Paper build.
    #[serde(default, with = "build_number")]
    pub paper_build: Option<u32>,
    /// Newest build the API listed for `minecraft_version` at the last install.
    #[serde(default, with = "build_number")]
    pub last_paper_build: Option<u32>,
}

impl InstallerConfig {
    pub fn path(server_dir: &Path) -> std::path::PathBuf {
        server_dir.join(CONFIG_FILE)
    }

    /// Loads the config of `server_dir`.
    ///
    /// The file only records past installs, so a missing, empty or unreadable
    /// one yields the default config. Only I/O failures other than "not found"
    /// are errors.
    pub async fn load(server_dir: &Path) -> anyhow::Result<Self> {
        let path = Self::path(server_dir);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        if contents.trim().is_empty() {
            debug!("No installer config in {}", server_dir.display());
            return Ok(Self::default());
        }

        match parse_json_config(&contents, &path) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!("Ignoring broken installer config: {err:#}");
                Ok(Self::default())
            }
        }
    }

    pub async fn save(&self, server_dir: &Path) -> anyhow::Result<()> {
        write_json_config(self, Self::path(server_dir)).await
    }

    pub fn record_install(&mut self, outcome: &InstallOutcome) {
        self.minecraft_version.clone_from(&outcome.version);
        self.paper_build = Some(outcome.build);
        self.last_paper_build = Some(outcome.newest_build);
    }

    pub fn minecraft_version(&self) -> Option<&str> {
        Some(self.minecraft_version.as_str()).filter(|version| !version.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_legacy_string_builds() {
        let config: InstallerConfig = serde_json::from_str(
            r#"{"minecraft_version":"1.20.4","paper_build":"496","last_paper_build":""}"#,
        )
        .unwrap();

        assert_eq!(
            config,
            InstallerConfig {
                minecraft_version: "1.20.4".into(),
                paper_build: Some(496),
                last_paper_build: None,
            }
        );
    }

    #[test]
    fn reads_numeric_builds_and_missing_fields() {
        let config: InstallerConfig = serde_json::from_str(r#"{"paper_build":12}"#).unwrap();

        assert_eq!(config.paper_build, Some(12));
        assert_eq!(config.minecraft_version(), None);
    }

    #[test]
    fn writes_builds_as_strings() {
        let config = InstallerConfig {
            minecraft_version: "1.21".into(),
            paper_build: Some(7),
            last_paper_build: None,
        };

        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"minecraft_version":"1.21","paper_build":"7","last_paper_build":""}"#
        );
    }

    #[tokio::test]
    async fn missing_or_empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            InstallerConfig::load(dir.path()).await.unwrap(),
            InstallerConfig::default()
        );

        std::fs::write(dir.path().join(".kami.json"), "").unwrap();
        assert_eq!(
            InstallerConfig::load(dir.path()).await.unwrap(),
            InstallerConfig::default()
        );
    }

    #[tokio::test]
    async fn truncated_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".kami.json"), r#"{"minecraft_version":"1.20"#).unwrap();

        let config = InstallerConfig::load(dir.path()).await.unwrap();

        assert_eq!(config, InstallerConfig::default());
    }

    #[tokio::test]
    async fn broken_file_is_replaced_on_save() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".kami.json"), "not json").unwrap();

        let mut config = InstallerConfig::load(dir.path()).await.unwrap();
        config.minecraft_version = "1.21".into();
        config.save(dir.path()).await.unwrap();

        let loaded = InstallerConfig::load(dir.path()).await.unwrap();
        assert_eq!(loaded.minecraft_version(), Some("1.21"));
    }

    #[tokio::test]
    async fn records_and_persists_install() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = InstallerConfig::default();

        config.record_install(&InstallOutcome {
            version: "1.20.4".into(),
            build: 496,
            newest_build: 497,
            downloaded: true,
        });
        config.save(dir.path()).await.unwrap();

        let loaded = InstallerConfig::load(dir.path()).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.last_paper_build, Some(497));
    }
}
