use featureflag_test::with_features;

#[with_features(enabled, "disabled" = false)]
fn check() {
    assert!(featureflag::is_enabled!("enabled", false));
    assert!(!featureflag::is_enabled!("disabled", true));
}

fn main() {
    check();
    assert!(!featureflag::is_enabled!("enabled", false));
}
