use std::sync::{Arc, OnceLock};

use featureflag::context;
use featureflag_config::model::{FeatureRules, FeatureSetting, Rule, RuleValue};
use featureflag_config::{ConfigEvaluator, FeatureConfig};
use serial_test::serial;

fn dark_mode(enabled_for: &str) -> FeatureConfig {
    let mut config = FeatureConfig::default();
    config.features.insert(
        "dark-mode".to_owned(),
        FeatureSetting::Rules(FeatureRules {
            default: None,
            rules: vec![Rule {
                field: "tenant".to_owned(),
                equals: RuleValue::Str(enabled_for.to_owned()),
                enabled: true,
            }],
        }),
    );
    config
}

fn global() -> &'static Arc<ConfigEvaluator> {
    static GLOBAL: OnceLock<Arc<ConfigEvaluator>> = OnceLock::new();
    GLOBAL.get_or_init(|| {
        let evaluator = Arc::new(ConfigEvaluator::new(dark_mode("acme")));
        featureflag::set_global_default(evaluator.clone());
        evaluator
    })
}

#[test]
#[serial]
fn global_evaluator_uses_context_fields() {
    global().reload(dark_mode("acme"));

    context!(tenant = "acme").in_scope(|| assert!(featureflag::is_enabled!("dark-mode", false)));
    context!(tenant = "globex").in_scope(|| assert!(!featureflag::is_enabled!("dark-mode", false)));
    assert!(featureflag::is_enabled!("dark-mode", true));
}

#[test]
#[serial]
fn reload_applies_to_existing_contexts() {
    let evaluator = global();
    evaluator.reload(dark_mode("acme"));
    let globex = context!(tenant = "globex");

    assert!(!featureflag::is_enabled!(context: globex, "dark-mode", false));
    evaluator.reload(dark_mode("globex"));
    assert!(featureflag::is_enabled!(context: globex, "dark-mode", false));
}
