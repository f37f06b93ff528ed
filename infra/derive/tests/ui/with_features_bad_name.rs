use featureflag_test::with_features;

#[with_features(42 = true)]
fn check() {}

fn main() {}
