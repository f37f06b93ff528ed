use crate::services::utils::normalize_project_name;

/// Cargo package selection: the whole workspace for `None` or `"all"`, one crate otherwise.
fn package_args(project: Option<&str>) -> Vec<String> {
    match project {
        Some(project) if project != "all" => vec!["-p".to_owned(), normalize_project_name(project)],
        _ => vec!["--workspace".to_owned()],
    }
}

/// Runs tests in the workspace or a specific crate.
///
/// Uses `cargo nextest` when it is installed.
///
/// # Errors
/// Returns an error if the test execution fails or if cargo cannot be started.
pub fn run_tests(project: Option<&str>) -> anyhow::Result<()> {
    let package = package_args(project);
    let target_label = if package[0] == "--workspace" { "workspace" } else { "crate" };

    println!("🧪 Running {target_label} tests...");
    let has_nextest = std::process::Command::new("cargo-nextest").arg("--version").output().is_ok();

    let mut args: Vec<String> =
        if has_nextest { vec!["nextest".to_owned(), "run".to_owned()] } else { vec!["test".to_owned()] };
    args.extend(package);
    args.push("--all-features".into());

    if has_nextest {
        args.extend(
            ["--failure-output", "immediate-final", "--success-output", "never", "--status-level", "skip"]
                .into_iter()
                .map(String::from),
        );
    } else {
        args.extend(["--tests", "--lib", "--", "-q"].into_iter().map(String::from));
    }

    println!("🧪 Running tests via '{}'...", if has_nextest { "nextest" } else { "cargo test" });
    let status = std::process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("Tests failed!");
    }
    Ok(())
}

/// Runs doc tests in the workspace or a specific crate.
///
/// # Errors
/// Returns an error if the doctest execution fails or if cargo cannot be started.
pub fn run_doctests(project: Option<&str>) -> anyhow::Result<()> {
    let package = package_args(project);
    let target_label = if package[0] == "--workspace" { "workspace" } else { "crate" };

    println!("📚 Running {target_label} doc tests...");

    let mut args: Vec<String> = vec!["test".into(), "--doc".into()];
    args.extend(package);
    args.push("--all-features".into());

    let status = std::process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("Doc tests failed!");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::package_args;

    #[test]
    fn workspace_is_the_default_target() {
        assert_eq!(package_args(None), ["--workspace"]);
        assert_eq!(package_args(Some("all")), ["--workspace"]);
        assert_eq!(package_args(Some("config")), ["-p", "featureflag-config"]);
    }
}
