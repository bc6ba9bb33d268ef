use std::process::Stdio;

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::info;

/// Runs `command` to completion, forwarding its output to the log line by line.
pub async fn run_logged(mut command: Command) -> anyhow::Result<()> {
    let program = format!("{:?}", command.as_std());
    info!("Running {program}");

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    let stdout = child.stdout.take().context("stdout is not piped")?;
    let stderr = child.stderr.take().context("stderr is not piped")?;

    let (stdout, stderr, status) = tokio::join!(
        forward_lines(stdout, "STDOUT"),
        forward_lines(stderr, "STDERR"),
        child.wait()
    );
    stdout?;
    stderr?;

    let status = status.with_context(|| format!("failed to wait for {program}"))?;
    anyhow::ensure!(status.success(), "{program} exited with {status}");

    Ok(())
}

/// Runs `command` or, in debug mode, only logs what would have been run.
pub async fn run_or_log(command: Command, debug: bool) -> anyhow::Result<()> {
    if debug {
        info!("Debug mode, not running {:?}", command.as_std());
        return Ok(());
    }

    run_logged(command).await
}

async fn forward_lines(reader: impl AsyncRead + Unpin, label: &str) -> std::io::Result<()> {
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        info!("[{label}] {line}");
    }

    Ok(())
}
