use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use kami_core::paper::VersionRequest;

use crate::args::SetupArgs;

/// Everything `setup` needs, fixed before any work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub version: VersionRequest,
    pub allow_experimental: bool,
    pub server_name: String,
    pub whitelist: bool,
    pub accept_eula: bool,
    pub interactive: bool,
}

impl SetupOptions {
    pub fn from_args(args: &SetupArgs, interactive: bool) -> Self {
        Self {
            version: args.mc_version.clone(),
            allow_experimental: args.allow_experimental_builds,
            server_name: args.server_name.clone(),
            whitelist: args.whitelist,
            accept_eula: args.accept_eula,
            interactive,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Minecraft Version: {}\nAllow Experimental Builds: {}\nServer Name: {}\nWhitelist: {}",
            self.version, self.allow_experimental, self.server_name, self.whitelist
        )
    }
}

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Builds the options from `args`, asking the user when running in a terminal.
pub fn collect(args: &SetupArgs) -> anyhow::Result<SetupOptions> {
    let interactive = !args.skip_prompts && is_interactive();
    let mut options = SetupOptions::from_args(args, interactive);

    if !interactive {
        return Ok(options);
    }

    loop {
        options = ask(&options)?;

        println!("{}", options.summary());
        if confirm("Save these settings?", true)? {
            return Ok(options);
        }
    }
}

pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn ask(current: &SetupOptions) -> anyhow::Result<SetupOptions> {
    let theme = ColorfulTheme::default();

    let version: VersionRequest = Input::with_theme(&theme)
        .with_prompt("What version of Minecraft do you want to use?")
        .default(current.version.to_string())
        .validate_with(|input: &String| input.parse::<VersionRequest>().map(drop))
        .interact_text()?
        .parse()?;

    let allow_experimental = Confirm::with_theme(&theme)
        .with_prompt("Do you want to allow experimental builds of Paper to be used?")
        .default(current.allow_experimental)
        .interact()?;

    let server_name: String = Input::with_theme(&theme)
        .with_prompt("What do you want to name your server?")
        .default(current.server_name.clone())
        .interact_text()?;

    let whitelist = Confirm::with_theme(&theme)
        .with_prompt("Do you want to enable the whitelist?")
        .default(current.whitelist)
        .interact()?;

    let accept_eula = Confirm::with_theme(&theme)
        .with_prompt("Do you accept the Minecraft EULA? (https://aka.ms/MinecraftEULA)")
        .default(current.accept_eula)
        .interact()?;

    Ok(SetupOptions {
        version,
        allow_experimental,
        server_name,
        whitelist,
        accept_eula,
        interactive: current.interactive,
    })
}
