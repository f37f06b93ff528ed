use anyhow::{Context, bail};

use crate::models::invocation::{CargoInvocation, Step};
use crate::services::utils::get_project_root;

/// Feature sets exercised by CI, in the order they run locally.
pub const FEATURE_MATRIX: [&str; 3] = ["", "featureflag/futures", "all"];

/// Matrix value selecting `--all-features`.
pub const ALL_FEATURES: &str = "all";

/// Cargo flags selecting the features of one matrix entry.
#[must_use]
pub fn feature_flags(features: &str) -> Vec<String> {
    if features == ALL_FEATURES {
        vec!["--all-features".to_owned()]
    } else {
        vec!["--no-default-features".to_owned(), "--features".to_owned(), features.to_owned()]
    }
}

/// Commands of one CI job: build then test, both over all targets.
#[must_use]
pub fn plan(features: &str) -> [CargoInvocation; 2] {
    [Step::Build, Step::Test].map(|step| {
        let mut args = vec![step.subcommand().to_owned(), "--all-targets".to_owned()];
        args.extend(feature_flags(features));

        CargoInvocation {
            step,
            args,
            env: vec![("CARGO_TERM_COLOR", "always".to_owned()), ("FEATURES", features.to_owned())],
        }
    })
}

/// Runs the CI matrix, or a single entry of it.
///
/// # Errors
/// Returns an error naming the step and matrix entry of the first failing
/// command, or if cargo cannot be started.
pub fn run_ci(features: Option<&str>, dry_run: bool) -> anyhow::Result<()> {
    let entries: Vec<&str> = features.map_or_else(|| FEATURE_MATRIX.to_vec(), |features| vec![features]);
    let root = get_project_root()?;

    for features in entries {
        println!("🧩 CI job [features = {features:?}]");

        for invocation in plan(features) {
            println!("   {invocation}");
            if dry_run {
                continue;
            }

            let status = invocation
                .to_command()
                .current_dir(&root)
                .status()
                .with_context(|| format!("Failed to execute cargo {}", invocation.step))?;

            if !status.success() {
                bail!("CI step '{}' failed for features {features:?}", invocation.step);
            }
        }
    }

    if !dry_run {
        println!("✅ CI matrix passed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_branch_per_matrix_entry() {
        for features in FEATURE_MATRIX {
            let flags = feature_flags(features);
            let all = flags.iter().any(|flag| flag == "--all-features");
            let explicit = flags.iter().any(|flag| flag == "--no-default-features");

            assert_ne!(all, explicit, "entry {features:?}");
            assert_eq!(all, features == "all", "entry {features:?}");
        }
    }

    #[test]
    fn explicit_branch_passes_features_verbatim() {
        assert_eq!(feature_flags(""), ["--no-default-features", "--features", ""]);
        assert_eq!(feature_flags("featureflag/futures"), ["--no-default-features", "--features", "featureflag/futures"]);
        assert_eq!(feature_flags("ALL"), ["--no-default-features", "--features", "ALL"]);
    }

    #[test]
    fn build_runs_before_test() {
        for features in FEATURE_MATRIX {
            let [build, test] = plan(features);

            assert_eq!(build.step, Step::Build);
            assert_eq!(test.step, Step::Test);
            assert_eq!(build.args[..2], ["build", "--all-targets"]);
            assert_eq!(test.args[..2], ["test", "--all-targets"]);
            assert_eq!(build.args[2..], test.args[2..]);
        }
    }

    #[test]
    fn jobs_carry_color_and_feature_environment() {
        let [build, _] = plan("featureflag/futures");

        assert_eq!(
            build.env,
            [("CARGO_TERM_COLOR", "always".to_owned()), ("FEATURES", "featureflag/futures".to_owned())]
        );
        assert_eq!(
            build.to_string(),
            r#"CARGO_TERM_COLOR="always" FEATURES="featureflag/futures" cargo build --all-targets --no-default-features --features featureflag/futures"#
        );
    }

    #[test]
    fn empty_feature_list_is_quoted_in_display() {
        let [_, test] = plan("");
        assert!(test.to_string().ends_with(r#"cargo test --all-targets --no-default-features --features """#));
    }
}
