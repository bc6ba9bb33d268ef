use std::{io::ErrorKind, path::Path};

use anyhow::Context;
use tracing::debug;

use crate::fs::write_to_file;

pub const MOTD: &str = "motd";
pub const WHITE_LIST: &str = "white-list";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank line or anything that is not `key=value`.
    Verbatim(String),
    Entry { key: String, value: String },
}

/// `server.properties` that keeps comments, order and unknown keys intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    lines: Vec<Line>,
}

impl Properties {
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with('#') || trimmed.starts_with('!') {
                    return Line::Verbatim(line.to_owned());
                }

                match line.split_once(['=', ':']) {
                    Some((key, value)) if !key.trim().is_empty() => Line::Entry {
                        key: key.trim().to_owned(),
                        value: value.trim_start().to_owned(),
                    },
                    _ => Line::Verbatim(line.to_owned()),
                }
            })
            .collect();

        Self { lines }
    }

    /// Reads `path`; a missing file yields empty properties.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist, starting empty", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        write_to_file(self.to_string().as_bytes(), path).await
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replaces the value of `key` in place or appends it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();

        for line in &mut self.lines {
            if let Line::Entry { key: k, value: v } = line {
                if k == key {
                    *v = value;
                    return;
                }
            }
        }

        self.lines.push(Line::Entry {
            key: key.to_owned(),
            value,
        });
    }
}

impl std::fmt::Display for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            match line {
                Line::Verbatim(text) => writeln!(f, "{text}")?,
                Line::Entry { key, value } => writeln!(f, "{key}={value}")?,
            }
        }

        Ok(())
    }
}

/// The properties the installer manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub motd: String,
    pub whitelist: bool,
}

impl ServerSettings {
    pub fn apply(&self, properties: &mut Properties) {
        properties.set(MOTD, self.motd.as_str());
        properties.set(WHITE_LIST, self.whitelist.to_string());
    }

    /// Merges the settings into the `server.properties` at `path`.
    pub async fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let mut properties = Properties::load(path).await?;
        self.apply(&mut properties);
        properties.save(path).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EXISTING: &str = "\
#Minecraft server properties
#Sat Jan 01 00:00:00 UTC 2024
enable-jmx-monitoring=false
motd=A Minecraft Server
white-list=false
level-seed=
";

    #[test]
    fn parses_entries() {
        let properties = Properties::parse(EXISTING);

        assert_eq!(properties.get(MOTD), Some("A Minecraft Server"));
        assert_eq!(properties.get("level-seed"), Some(""));
        assert_eq!(properties.get("missing"), None);
    }

    #[test]
    fn merge_keeps_unrelated_lines() {
        let mut properties = Properties::parse(EXISTING);

        ServerSettings {
            motd: "Kami's place".into(),
            whitelist: true,
        }
        .apply(&mut properties);

        assert_eq!(
            properties.to_string(),
            "\
#Minecraft server properties
#Sat Jan 01 00:00:00 UTC 2024
enable-jmx-monitoring=false
motd=Kami's place
white-list=true
level-seed=
"
        );
    }

    #[tokio::test]
    async fn missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");

        ServerSettings {
            motd: "Hello".into(),
            whitelist: false,
        }
        .write_to(&path)
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "motd=Hello\nwhite-list=false\n"
        );
    }
}
