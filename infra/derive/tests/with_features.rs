#[test]
fn with_features_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/with_features_pass.rs");
    t.compile_fail("tests/ui/with_features_on_struct.rs");
    t.compile_fail("tests/ui/with_features_bad_name.rs");
}
