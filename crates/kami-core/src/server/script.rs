use std::path::Path;

use crate::fs::write_to_file;

/// Aikar's G1 flags, see <https://mcflags.emc.gs>.
pub const JVM_FLAGS: &[&str] = &[
    "-XX:+AlwaysPreTouch",
    "-XX:+DisableExplicitGC",
    "-XX:+ParallelRefProcEnabled",
    "-XX:+PerfDisableSharedMem",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1HeapRegionSize=8M",
    "-XX:G1HeapWastePercent=5",
    "-XX:G1MaxNewSizePercent=40",
    "-XX:G1MixedGCCountTarget=4",
    "-XX:G1MixedGCLiveThresholdPercent=90",
    "-XX:G1NewSizePercent=30",
    "-XX:G1RSetUpdatingPauseTimePercent=5",
    "-XX:G1ReservePercent=20",
    "-XX:InitiatingHeapOccupancyPercent=15",
    "-XX:MaxGCPauseMillis=200",
    "-XX:MaxTenuringThreshold=1",
    "-XX:SurvivorRatio=32",
    "-Dusing.aikars.flags=https://mcflags.emc.gs",
    "-Daikars.new.flags=true",
];

pub const MAX_HEAP_MIB: u64 = 10 * 1024;

/// Heap for the server: three quarters of `total_memory` bytes, at most 10 GiB.
pub fn heap_size_mib(total_memory: u64) -> u64 {
    const MIB: u64 = 1024 * 1024;

    (total_memory / 4 * 3).min(MAX_HEAP_MIB * MIB) / MIB
}

/// Total memory of this machine in bytes.
pub fn total_memory() -> u64 {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    system.total_memory()
}

pub fn java_command(heap_mib: u64, jar: &str) -> String {
    format!(
        "java -Xms{heap_mib}M -Xmx{heap_mib}M {} -jar {jar} nogui",
        JVM_FLAGS.join(" ")
    )
}

pub fn unix_script(heap_mib: u64, jar: &str) -> String {
    format!("#!/usr/bin/env sh\n{}\n", java_command(heap_mib, jar))
}

pub fn windows_script(heap_mib: u64, jar: &str) -> String {
    format!("@echo off\r\n{}\r\npause\r\n", java_command(heap_mib, jar))
}

/// Writes a start script and makes it executable.
pub async fn write_script(path: &Path, contents: &str) -> anyhow::Result<()> {
    write_to_file(contents.as_bytes(), path).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    }

    Ok(())
}
