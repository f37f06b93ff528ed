use anyhow::{Context, bail};

/// Runs an example of the `featureflag` crate with `cargo run --example`.
///
/// # Errors
/// Returns an error if the example fails to build or exits with a non-zero status.
pub fn run_example(name: &str, features: Option<&str>) -> anyhow::Result<()> {
    println!("🚀 Starting example '{name}'...");

    let mut command = std::process::Command::new("cargo");
    command.args(["run", "-p", "featureflag", "--example", name]);
    if let Some(features) = features {
        command.args(["--features", features]);
    }

    let status = command.status().context("Failed to execute cargo run")?;

    if !status.success() {
        bail!("Example exited with non-zero status: {}", status.code().unwrap_or(-1));
    }

    Ok(())
}
