use std::path::{Path, PathBuf};

use kami_core::{
    http::HttpClient,
    platform::{self, JavaInstallOptions, Platform},
    update::{ReleaseTarget, UpdateChecker},
    INSTALLER_VERSION, TEMP_DIR,
};
use tracing::{debug, info, warn};

use crate::args::{Cli, Command, SetupArgs};

pub mod self_update;
pub mod setup;
pub mod update;

/// Shared state of one installer run.
pub struct Context {
    pub http: HttpClient,
    pub platform: Box<dyn Platform>,
    pub server_dir: PathBuf,
    /// Downloads that do not belong to the server, like Java packages.
    pub temp_dir: PathBuf,
    pub java: JavaInstallOptions,
}

impl Context {
    pub fn new(args: &Cli) -> anyhow::Result<Self> {
        let current_dir = std::env::current_dir()?;

        Ok(Self {
            http: HttpClient::new()?,
            platform: platform::detect()?,
            server_dir: absolute(&current_dir, &args.server_dir),
            temp_dir: current_dir.join(TEMP_DIR),
            java: JavaInstallOptions {
                debug: args.debug,
                install_java_please: args.install_java_please,
            },
        })
    }

    pub fn update_checker(&self) -> UpdateChecker {
        UpdateChecker::new(self.http.clone(), ReleaseTarget::of(self.platform.as_ref()))
    }
}

fn absolute(current_dir: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        debug!("`{}` is not absolute. Adding to the current dir", dir.display());
        current_dir.join(dir)
    }
}

pub async fn process_args(args: Cli) -> anyhow::Result<()> {
    let context = Context::new(&args)?;

    if args.debug {
        debug!("Debug mode enabled, install commands will only be logged");
    }

    let command = args.command.unwrap_or_else(|| {
        info!("No commands given. Installing server by default...");
        Command::Setup(SetupArgs::default())
    });

    if !matches!(command, Command::SelfUpdate) {
        announce_update(&context).await;
    }

    match command {
        Command::Setup(setup) => setup::setup(&context, &setup).await,
        Command::Update {
            allow_experimental_builds,
        } => update::update(&context, allow_experimental_builds).await,
        Command::SelfUpdate => self_update::self_update(&context).await,
    }
}

/// Tells the user about a newer installer. Failures are only logged.
async fn announce_update(context: &Context) {
    match context
        .update_checker()
        .check_for_update(INSTALLER_VERSION)
        .await
    {
        Ok(check) if check.update_available => {
            let version = check.remote_version.unwrap_or_default();
            match check.asset_url {
                Some(url) => info!("An update is available ({version}). Download it from {url} or run `self-update`"),
                None => warn!("An update is available ({version}), but there is no build for this platform"),
            }
        }
        Ok(_) => {}
        Err(err) => warn!("Error checking for updates: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_server_dir_is_joined() {
        let base = std::env::temp_dir();

        assert_eq!(absolute(&base, Path::new("server")), base.join("server"));
        assert_eq!(absolute(&base, &base.join("srv")), base.join("srv"));
    }
}
