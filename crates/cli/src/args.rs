use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kami_core::{paper::VersionRequest, INSTALLER_BINARY, INSTALLER_VERSION};

pub const DEFAULT_SERVER_NAME: &str = "A Minecraft Server";

#[derive(Parser, Debug)]
#[command(
    name = INSTALLER_BINARY,
    version = INSTALLER_VERSION,
    verbatim_doc_comment
)]
///   _  __               _      ___ _
///  | |/ /__ _ _ __  (_)   / __| |_  __ _ _ _
///  | ' </ _` | '  \ | |  | (__| ' \/ _` | ' \
///  |_|\_\__,_|_|_|_||_|   \___|_||_\__,_|_||_|
/// Installer for Paper servers
pub struct Cli {
    /// Log install commands instead of running them
    #[arg(long, global = true)]
    pub debug: bool,
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Server directory
    #[arg(long, global = true, default_value = "server")]
    pub server_dir: PathBuf,
    /// Install Java even on Linux
    #[arg(long, global = true)]
    pub install_java_please: bool,

    /// Defaults to `setup`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install or reinstall the server (default)
    Setup(SetupArgs),
    /// Update the server to the newest Paper build
    Update {
        /// Allow experimental builds of Paper to be used
        #[arg(long, short = 'e')]
        allow_experimental_builds: bool,
    },
    /// Update this installer
    SelfUpdate,
}

#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
    /// Skip setup prompts and use the flags as they are
    #[arg(long)]
    pub skip_prompts: bool,
    /// Accept the Minecraft EULA
    #[arg(long, short = 'a')]
    pub accept_eula: bool,
    /// Server name, used as the MOTD
    #[arg(long, short = 'n', default_value = DEFAULT_SERVER_NAME)]
    pub server_name: String,
    /// Enable the whitelist
    #[arg(long, short = 'w')]
    pub whitelist: bool,
    /// Allow experimental builds of Paper to be used
    #[arg(long, short = 'e')]
    pub allow_experimental_builds: bool,
    /// Minecraft version, e.g. 1.20.4
    #[arg(long, short = 'm', default_value = "latest")]
    pub mc_version: VersionRequest,
}

impl Default for SetupArgs {
    fn default() -> Self {
        Self {
            skip_prompts: false,
            accept_eula: false,
            server_name: DEFAULT_SERVER_NAME.to_owned(),
            whitelist: false,
            allow_experimental_builds: false,
            mc_version: VersionRequest::Latest,
        }
    }
}
