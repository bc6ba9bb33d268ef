use std::path::Path;

use crate::{downloads::ProgressSink, error::Result, repository::paper::Build};

pub mod client;
pub mod install;
pub mod selector;

pub use client::PaperClient;
pub use install::{install_paper, InstallOutcome, InstallRequest};
pub use selector::{select_build, BuildSelector, ResolvedBuild, VersionRequest};

/// Where builds and their artifacts come from.
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Versions of `project`, oldest first.
    async fn list_versions(&self, project: &str) -> Result<Vec<String>>;

    /// Builds of `project` at `version`, oldest first.
    async fn list_builds(&self, project: &str, version: &str) -> Result<Vec<Build>>;

    async fn download_artifact(
        &self,
        project: &str,
        version: &str,
        build: u32,
        file_name: &str,
        destination: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::{
        path::Path,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use crate::{
        downloads::ProgressSink,
        error::{Error, Result},
        repository::paper::{Artifact, Build, Channel, Downloads},
    };

    use super::ArtifactSource;

    pub(crate) fn build(number: u32, channel: &str, sha256: &str) -> Build {
        Build {
            build: number,
            time: "2024-01-01T00:00:00Z".into(),
            channel: Channel::from(channel.to_owned()),
            promoted: false,
            changes: Vec::new(),
            downloads: Downloads {
                application: Artifact {
                    name: format!("paper-{number}.jar"),
                    sha256: sha256.into(),
                },
            },
        }
    }

    /// In-memory artifact source serving one project.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub versions: Vec<String>,
        pub builds: Vec<(String, Vec<Build>)>,
        /// Bytes written by `download_artifact`.
        pub body: Vec<u8>,
        pub downloads: AtomicUsize,
    }

    impl FakeSource {
        pub fn with_builds(version: &str, builds: Vec<Build>) -> Self {
            Self {
                versions: vec![version.to_owned()],
                builds: vec![(version.to_owned(), builds)],
                ..Self::default()
            }
        }

        pub fn downloads(&self) -> usize {
            self.downloads.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ArtifactSource for FakeSource {
        async fn list_versions(&self, _project: &str) -> Result<Vec<String>> {
            Ok(self.versions.clone())
        }

        async fn list_builds(&self, project: &str, version: &str) -> Result<Vec<Build>> {
            self.builds
                .iter()
                .find(|(v, _)| v == version)
                .map(|(_, builds)| builds.clone())
                .ok_or_else(|| Error::NotFound {
                    resource: format!("version {version} of {project}"),
                })
        }

        async fn download_artifact(
            &self,
            _project: &str,
            _version: &str,
            _build: u32,
            _file_name: &str,
            destination: &Path,
            progress: &dyn ProgressSink,
        ) -> Result<()> {
            self.downloads.fetch_add(1, Ordering::SeqCst);

            progress.begin(Some(self.body.len() as u64));
            std::fs::write(destination, &self.body).map_err(Error::io(destination))?;
            progress.advance(self.body.len() as u64);
            progress.finish();

            Ok(())
        }
    }
}
