use std::time::Duration;

pub const INSTALLER_NAME: &str = "Kami Chan Server Installer";
pub const INSTALLER_BINARY: &str = "kami-chan-server-installer";

/// Version of the running installer. Release builds set `KAMI_VERSION`.
pub const INSTALLER_VERSION: &str = match option_env!("KAMI_VERSION") {
    Some(version) => version,
    None => DEV_VERSION,
};

pub const INSTALLER_COMMIT: &str = match option_env!("KAMI_COMMIT") {
    Some(commit) => commit,
    None => "none",
};

/// Version string of builds that were not produced by the release pipeline.
pub const DEV_VERSION: &str = "dev";

pub const PAPER_API: &str = "https://api.papermc.io/v2";
pub const PAPER_PROJECT: &str = "paper";

pub const RELEASE_FEED: &str =
    "https://api.github.com/repos/mja00/kami-chan-server-installer/releases/latest";

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Maximum time to wait for the next chunk of a download body.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

pub const CONFIG_FILE: &str = ".kami.json";
pub const SERVER_JAR: &str = "paper.jar";
pub const EULA_FILE: &str = "eula.txt";
pub const SERVER_PROPERTIES: &str = "server.properties";
pub const START_SCRIPT: &str = "start";
pub const TEMP_DIR: &str = "temp";

pub fn user_agent() -> String {
    format!("{INSTALLER_NAME}/{INSTALLER_VERSION}/{INSTALLER_COMMIT}")
}
