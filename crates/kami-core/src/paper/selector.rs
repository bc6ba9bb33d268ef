use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    error::{Error, Result},
    repository::paper::Build,
};

use super::ArtifactSource;

/// Minecraft version requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRequest {
    #[default]
    Latest,
    Exact(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{0}` is not a Minecraft version, expected `latest` or something like 1.20.4")]
pub struct InvalidVersion(pub String);

impl FromStr for VersionRequest {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }

        let parts = s.split('.').collect::<Vec<_>>();
        let numeric = parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));

        if (2..=3).contains(&parts.len()) && numeric {
            Ok(Self::Exact(s.to_owned()))
        } else {
            Err(InvalidVersion(s.to_owned()))
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

/// Picks the newest build the channel policy accepts.
///
/// `builds` is expected oldest first, as the API returns them. The list is
/// scanned from the end and the first match wins.
pub fn select_build(builds: &[Build], allow_experimental: bool) -> Option<&Build> {
    builds
        .iter()
        .rev()
        .find(|build| allow_experimental || build.channel.is_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBuild {
    pub version: String,
    pub build: Build,
    /// Highest build number the server lists for `version`, any channel.
    pub newest_build: u32,
}

pub struct BuildSelector<'a, S: ?Sized> {
    source: &'a S,
    project: &'a str,
}

impl<'a, S: ArtifactSource + ?Sized> BuildSelector<'a, S> {
    pub fn new(source: &'a S, project: &'a str) -> Self {
        Self { source, project }
    }

    pub async fn resolve_version(&self, request: &VersionRequest) -> Result<String> {
        match request {
            VersionRequest::Exact(version) => Ok(version.clone()),
            VersionRequest::Latest => {
                let versions = self.source.list_versions(self.project).await?;
                let latest = versions.last().ok_or_else(|| Error::NotFound {
                    resource: format!("any version of {}", self.project),
                })?;

                debug!("Latest version of {} is {latest}", self.project);
                Ok(latest.clone())
            }
        }
    }

    pub async fn resolve(
        &self,
        request: &VersionRequest,
        allow_experimental: bool,
    ) -> Result<ResolvedBuild> {
        let version = self.resolve_version(request).await?;
        let builds = self.source.list_builds(self.project, &version).await?;

        let Some(build) = select_build(&builds, allow_experimental) else {
            debug!(
                "No eligible build for {} {version} (experimental allowed: {allow_experimental})",
                self.project
            );
            return Err(Error::NoEligibleBuild { version });
        };

        debug!(
            "Selected build {} ({}) of {} {version}",
            build.build, build.channel, self.project
        );

        let newest_build = builds.last().map_or(build.build, |newest| newest.build);

        Ok(ResolvedBuild {
            build: build.clone(),
            newest_build,
            version,
        })
    }
}
