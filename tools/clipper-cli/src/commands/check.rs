//! Check capture capabilities.

use clipper_capture_engine::{all_required_available, check_capabilities, print_capability_report};
use std::path::PathBuf;

use anyhow::Context;
use clipper_common::config::ClipperConfig;

use crate::PlatformArgs;

/// With `write_config`, the effective config is saved there after the report.
pub async fn run(
    config: &ClipperConfig,
    args: PlatformArgs,
    write_config: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Clipper Capture Check");
    println!("{}", "=".repeat(50));

    match config.transport.validate() {
        Ok(()) => println!("[OK] Transport block size: {} bytes", config.transport.block_size),
        Err(e) => println!("[WARN] {e}"),
    }
    println!(
        "[OK] Device choice keys: {} / {}",
        config.storage.camera_key, config.storage.mic_key
    );

    let platform = super::simulated_platform(&args);
    let capabilities = check_capabilities(&platform, &config.capture).await;
    println!();
    print_capability_report(&capabilities);

    println!();
    if all_required_available(&capabilities) {
        println!("All required capabilities are available. Clipper is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    if let Some(path) = write_config {
        config
            .save_to(&path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config written to {}", path.display());
    }

    Ok(())
}
