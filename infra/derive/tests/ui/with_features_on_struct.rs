use featureflag_test::with_features;

#[with_features(enabled)]
struct NotATest;

fn main() {}
