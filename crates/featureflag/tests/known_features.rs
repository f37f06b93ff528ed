use std::collections::HashSet;

use featureflag::Feature;
use featureflag::feature::known_features;

#[allow(dead_code)]
fn never_called() {
    featureflag::feature!("a", false);
    featureflag::feature!("b", true);
    featureflag::is_enabled!("c", false);
    featureflag::is_enabled!("d", true);

    Feature::new("dynamic1", false).is_enabled();
}

#[test]
fn macro_features_are_registered_at_link_time() {
    Feature::new("dynamic2", false).is_enabled();

    let expected: HashSet<_> = ["a", "b", "c", "d"].into_iter().collect();

    assert_eq!(known_features(), &expected);
}
