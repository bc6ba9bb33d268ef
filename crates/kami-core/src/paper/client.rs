use std::path::Path;

use tracing::info;

use crate::{
    consts::PAPER_API,
    downloads::{download_file, ProgressSink},
    error::Result,
    http::HttpClient,
    repository::paper::{
        Build, BuildResponse, BuildsResponse, Project, ProjectsResponse, VersionInfo,
    },
};

use super::ArtifactSource;

/// Typed client for the PaperMC build API.
#[derive(Debug, Clone)]
pub struct PaperClient {
    http: HttpClient,
    base_url: String,
}

impl PaperClient {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, PAPER_API)
    }

    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn project_url(&self, project: &str) -> String {
        format!("{}/projects/{project}", self.base_url)
    }

    fn version_url(&self, project: &str, version: &str) -> String {
        format!("{}/versions/{version}", self.project_url(project))
    }

    fn build_url(&self, project: &str, version: &str, build: u32) -> String {
        format!("{}/builds/{build}", self.version_url(project, version))
    }

    pub async fn list_projects(&self) -> Result<Vec<String>> {
        let url = format!("{}/projects", self.base_url);
        let response: ProjectsResponse = self.http.get_json(&url).await?;

        Ok(response.projects)
    }

    pub async fn get_project(&self, project: &str) -> Result<Project> {
        self.http
            .get_json(&self.project_url(project))
            .await
            .map_err(|err| err.describe_missing(format!("project {project}")))
    }

    pub async fn get_version(&self, project: &str, version: &str) -> Result<VersionInfo> {
        self.http
            .get_json(&self.version_url(project, version))
            .await
            .map_err(|err| err.describe_missing(format!("version {version} of {project}")))
    }

    pub async fn get_builds(&self, project: &str, version: &str) -> Result<BuildsResponse> {
        let url = format!("{}/builds", self.version_url(project, version));

        self.http
            .get_json(&url)
            .await
            .map_err(|err| err.describe_missing(format!("version {version} of {project}")))
    }

    pub async fn get_build(&self, project: &str, version: &str, build: u32) -> Result<Build> {
        let response: BuildResponse = self
            .http
            .get_json(&self.build_url(project, version, build))
            .await
            .map_err(|err| {
                err.describe_missing(format!("build {build} of {project} {version}"))
            })?;

        Ok(response.build)
    }
}

#[async_trait::async_trait]
impl ArtifactSource for PaperClient {
    async fn list_versions(&self, project: &str) -> Result<Vec<String>> {
        Ok(self.get_project(project).await?.versions)
    }

    async fn list_builds(&self, project: &str, version: &str) -> Result<Vec<Build>> {
        Ok(self.get_builds(project, version).await?.builds)
    }

    async fn download_artifact(
        &self,
        project: &str,
        version: &str,
        build: u32,
        file_name: &str,
        destination: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<()> {
        let url = format!(
            "{}/downloads/{file_name}",
            self.build_url(project, version, build)
        );

        info!("Downloading {file_name}");

        download_file(&self.http, &url, destination, progress)
            .await
            .map_err(|err| err.describe_missing(format!("artifact {file_name}")))?;

        Ok(())
    }
}
