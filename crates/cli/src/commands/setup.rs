use std::path::Path;

use anyhow::Context as _;
use kami_core::{
    configs::InstallerConfig,
    java::{ensure_java, required_java_major},
    paper::{install_paper, InstallRequest, PaperClient},
    platform::OsKind,
    server::{accept_eula, script, ServerSettings},
    PAPER_PROJECT, SERVER_JAR, SERVER_PROPERTIES,
};
use tokio::process::Command;
use tracing::info;

use crate::{
    args::SetupArgs,
    progress::ProgressBarSink,
    prompts::{self, SetupOptions},
};

use super::Context;

pub async fn setup(context: &Context, args: &SetupArgs) -> anyhow::Result<()> {
    context.platform.print_warning();
    info!("Setting up the server...");

    let options = prompts::collect(args)?;
    anyhow::ensure!(
        options.accept_eula,
        "you must accept the EULA to use this server (pass --accept-eula)"
    );

    let server_dir = &context.server_dir;
    tokio::fs::create_dir_all(server_dir)
        .await
        .with_context(|| format!("failed to create {}", server_dir.display()))?;

    let mut config = InstallerConfig::load(server_dir).await?;

    let required = required_java_major(&options.version)?;
    ensure_java(
        context.platform.as_ref(),
        &context.http,
        required,
        &context.temp_dir,
        &context.java,
        &ProgressBarSink::new("Java"),
    )
    .await?;

    info!("Downloading server files...");
    let client = PaperClient::new(context.http.clone());
    let request = InstallRequest::builder()
        .project(PAPER_PROJECT)
        .version(options.version.clone())
        .allow_experimental(options.allow_experimental)
        .destination(server_dir.join(SERVER_JAR))
        .build();
    let outcome = install_paper(&client, &request, &ProgressBarSink::new("Paper")).await?;
    config.record_install(&outcome);

    accept_eula(server_dir).await?;
    write_properties(server_dir, &options).await?;

    let heap = script::heap_size_mib(script::total_memory());
    let start_script = context
        .platform
        .write_start_script(server_dir, heap)
        .await?;

    config.save(server_dir).await?;
    info!("Setup complete!");

    if options.interactive && prompts::confirm("Start the server now?", false)? {
        start_server(context.platform.os(), &start_script, server_dir).await?;
        info!("Server was successfully started!");
    }

    info!("To run the server, go into the server folder and run the start script.");
    info!("The start script is located at: {}", start_script.display());

    Ok(())
}

async fn write_properties(server_dir: &Path, options: &SetupOptions) -> anyhow::Result<()> {
    ServerSettings {
        motd: options.server_name.clone(),
        whitelist: options.whitelist,
    }
    .write_to(&server_dir.join(SERVER_PROPERTIES))
    .await
}

async fn start_server(os: OsKind, start_script: &Path, server_dir: &Path) -> anyhow::Result<()> {
    info!("Starting the server...");

    let mut command = match os {
        OsKind::Windows => {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(start_script);
            command
        }
        OsKind::Linux | OsKind::MacOs => {
            let mut command = Command::new("sh");
            command.arg(start_script);
            command
        }
    };
    // The server console stays attached to this terminal.
    let status = command
        .current_dir(server_dir)
        .status()
        .await
        .with_context(|| format!("failed to run {}", start_script.display()))?;
    anyhow::ensure!(status.success(), "the server exited with {status}");

    Ok(())
}
