use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Crate name prefix shared by the workspace members.
pub const CRATE_PREFIX: &str = "featureflag";

/// Returns the root directory of the project.
///
/// # Errors
/// Returns an error if the manifest directory does not have a parent.
pub fn get_project_root() -> Result<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .context("Could not find project root from xtask manifest")
}

/// Normalizes a project crate name to the workspace naming convention.
#[must_use]
pub fn normalize_project_name(project: &str) -> String {
    if project.starts_with(CRATE_PREFIX) { project.to_owned() } else { format!("{CRATE_PREFIX}-{project}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_prefixed_once() {
        assert_eq!(normalize_project_name("config"), "featureflag-config");
        assert_eq!(normalize_project_name("test-macros"), "featureflag-test-macros");
        assert_eq!(normalize_project_name("featureflag"), "featureflag");
        assert_eq!(normalize_project_name("featureflag-test"), "featureflag-test");
    }

    #[test]
    fn project_root_contains_workspace_manifest() {
        let root = get_project_root().expect("xtask lives inside the workspace");
        assert!(root.join("Cargo.toml").is_file());
    }
}
