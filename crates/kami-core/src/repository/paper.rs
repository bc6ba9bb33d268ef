//! Responses of the PaperMC build API (`/v2`).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectsResponse {
    pub projects: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    #[serde(rename = "project_id")]
    pub id: String,
    #[serde(rename = "project_name")]
    pub name: String,
    #[serde(default)]
    pub version_groups: Vec<String>,
    /// Oldest first.
    pub versions: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    /// Oldest first.
    pub builds: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildsResponse {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    /// Oldest first.
    pub builds: Vec<Build>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildResponse {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    #[serde(flatten)]
    pub build: Build,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub build: u32,
    pub time: String,
    pub channel: Channel,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default)]
    pub changes: Vec<Change>,
    pub downloads: Downloads,
}

impl Build {
    pub fn artifact(&self) -> &Artifact {
        &self.downloads.application
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub commit: String,
    pub summary: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Downloads {
    pub application: Artifact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub sha256: String,
}

/// Release channel of a build. Unknown channels are kept verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Default,
    Experimental,
    Other(String),
}

impl Channel {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Experimental => "experimental",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "default" => Self::Default,
            "experimental" => Self::Experimental,
            _ => Self::Other(value),
        }
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        match value {
            Channel::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) const BUILDS: &str = r#"{
        "project_id": "paper",
        "project_name": "Paper",
        "version": "1.20.4",
        "builds": [
            {
                "build": 496,
                "time": "2024-04-25T10:17:00.510Z",
                "channel": "default",
                "promoted": false,
                "changes": [
                    {
                        "commit": "7ac24a1",
                        "summary": "Fix sign edit",
                        "message": "Fix sign edit\n"
                    }
                ],
                "downloads": {
                    "application": {
                        "name": "paper-1.20.4-496.jar",
                        "sha256": "4b011f5adb5f6c72007686a223174fce82f31aeb4b34faf4652abc840b47e640"
                    },
                    "mojang-mappings": {
                        "name": "paper-mojang-mappings-1.20.4-496.jar",
                        "sha256": "aa"
                    }
                }
            },
            {
                "build": 497,
                "time": "2024-04-26T10:17:00.510Z",
                "channel": "beta",
                "promoted": false,
                "changes": [],
                "downloads": {
                    "application": {
                        "name": "paper-1.20.4-497.jar",
                        "sha256": "bb"
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn builds_response_deserializes() {
        let response: BuildsResponse = serde_json::from_str(BUILDS).unwrap();

        assert_eq!(response.version, "1.20.4");
        assert_eq!(response.builds.len(), 2);

        let first = &response.builds[0];
        assert_eq!(first.build, 496);
        assert_eq!(first.channel, Channel::Default);
        assert_eq!(first.artifact().name, "paper-1.20.4-496.jar");
        assert_eq!(first.changes[0].summary, "Fix sign edit");

        assert_eq!(response.builds[1].channel, Channel::Other("beta".into()));
    }

    #[test]
    fn channel_keeps_unknown_values() {
        let channel: Channel = serde_json::from_str(r#""experimental""#).unwrap();
        assert_eq!(channel, Channel::Experimental);

        let json = serde_json::to_string(&Channel::Other("beta".into())).unwrap();
        assert_eq!(json, r#""beta""#);
    }

    #[test]
    fn single_build_response_flattens() {
        let json = r#"{
            "project_id": "paper",
            "project_name": "Paper",
            "version": "1.20.4",
            "build": 12,
            "time": "2024-01-01T00:00:00Z",
            "channel": "experimental",
            "downloads": { "application": { "name": "paper-1.20.4-12.jar", "sha256": "cc" } }
        }"#;

        let response: BuildResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.build.build, 12);
        assert!(!response.build.promoted);
        assert!(response.build.changes.is_empty());
        assert_eq!(response.build.channel, Channel::Experimental);
    }
}
