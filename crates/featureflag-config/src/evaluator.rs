use std::sync::Arc;

use featureflag::context::ContextRef;
use featureflag::fields::{Fields, OwnedFields};
use featureflag::{Context, Evaluator};
use parking_lot::RwLock;
use tracing::{info, trace};

use crate::model::{FeatureConfig, FeatureRules, FeatureSetting};

/// Evaluates features from a [`FeatureConfig`].
///
/// The configuration can be swapped at runtime with [`reload`](Self::reload);
/// evaluations already in progress finish with the previous one.
#[derive(Debug, Default)]
pub struct ConfigEvaluator {
    config: RwLock<Arc<FeatureConfig>>,
}

/// Fields recorded for each context created under a [`ConfigEvaluator`].
#[derive(Debug)]
struct ConfigFields(OwnedFields);

impl ConfigEvaluator {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config: RwLock::new(Arc::new(config)) }
    }

    /// Replaces the configuration for all later evaluations.
    pub fn reload(&self, config: FeatureConfig) {
        let features = config.features.len();
        *self.config.write() = Arc::new(config);
        info!(features, "feature configuration reloaded");
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<FeatureConfig> {
        self.config.read().clone()
    }
}

impl Evaluator for ConfigEvaluator {
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool> {
        let config = self.config();
        match config.get(feature)? {
            FeatureSetting::Fixed(enabled) => Some(*enabled),
            FeatureSetting::Rules(rules) => evaluate_rules(feature, rules, context),
        }
    }

    fn on_new_context(&self, mut context: ContextRef<'_>, fields: Fields<'_>) {
        if !fields.is_empty() {
            context.extensions_mut().insert(ConfigFields(fields.to_owned_fields()));
        }
    }
}

fn evaluate_rules(feature: &str, rules: &FeatureRules, context: &Context) -> Option<bool> {
    for (index, rule) in rules.rules.iter().enumerate() {
        let value = context
            .iter()
            .find_map(|c| c.extensions().get::<ConfigFields>().and_then(|fields| fields.0.get(&rule.field)));

        if value.is_some_and(|value| rule.equals.matches(value)) {
            trace!(feature, rule = index, field = %rule.field, "feature rule matched");
            return Some(rule.enabled);
        }
    }

    rules.default
}

#[cfg(test)]
mod tests {
    use featureflag::context;
    use featureflag::evaluator::with_default;

    use super::*;
    use crate::model::{Rule, RuleValue};

    fn rule(field: &str, equals: RuleValue, enabled: bool) -> Rule {
        Rule { field: field.to_owned(), equals, enabled }
    }

    fn config() -> FeatureConfig {
        let mut config = FeatureConfig::default();
        config.features.insert("fixed-on".to_owned(), FeatureSetting::Fixed(true));
        config.features.insert("fixed-off".to_owned(), FeatureSetting::Fixed(false));
        config.features.insert(
            "by-tenant".to_owned(),
            FeatureSetting::Rules(FeatureRules {
                default: Some(false),
                rules: vec![
                    rule("tenant", RuleValue::Str("blocked".to_owned()), false),
                    rule("beta", RuleValue::Bool(true), true),
                    rule("tenant", RuleValue::Str("acme".to_owned()), true),
                ],
            }),
        );
        config.features.insert(
            "no-default".to_owned(),
            FeatureSetting::Rules(FeatureRules { default: None, rules: vec![rule("tier", RuleValue::Int(3), true)] }),
        );
        config
    }

    #[test]
    fn fixed_and_unknown_features() {
        let evaluator = ConfigEvaluator::new(config());
        let root = Context::root();

        assert_eq!(evaluator.is_enabled("fixed-on", &root), Some(true));
        assert_eq!(evaluator.is_enabled("fixed-off", &root), Some(false));
        assert_eq!(evaluator.is_enabled("unknown", &root), None);
    }

    #[test]
    fn rules_fall_back_to_table_default() {
        let evaluator = ConfigEvaluator::new(config());
        let root = Context::root();

        assert_eq!(evaluator.is_enabled("by-tenant", &root), Some(false));
        assert_eq!(evaluator.is_enabled("no-default", &root), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        with_default(ConfigEvaluator::new(config()), || {
            let acme = context!(tenant = "acme");
            let blocked_beta = context!(tenant = "blocked", beta = true);
            let tier = context!(tier = 3_u8);

            assert!(featureflag::Feature::new("by-tenant", false).is_enabled_in(Some(&acme)));
            assert!(!featureflag::Feature::new("by-tenant", true).is_enabled_in(Some(&blocked_beta)));
            assert!(featureflag::Feature::new("no-default", false).is_enabled_in(Some(&tier)));
        });
    }

    #[test]
    fn innermost_context_defining_the_field_is_used() {
        with_default(ConfigEvaluator::new(config()), || {
            let outer = context!(tenant = "acme");
            let inner = context!(parent: outer, tenant = "other");
            let unrelated = context!(parent: outer, region = "eu");

            assert!(!featureflag::Feature::new("by-tenant", true).is_enabled_in(Some(&inner)));
            assert!(featureflag::Feature::new("by-tenant", false).is_enabled_in(Some(&unrelated)));
        });
    }

    #[test]
    fn reload_replaces_configuration() {
        let evaluator = ConfigEvaluator::new(config());
        let before = evaluator.config();

        let mut next = FeatureConfig::default();
        next.features.insert("fixed-on".to_owned(), FeatureSetting::Fixed(false));
        evaluator.reload(next);

        assert_eq!(evaluator.is_enabled("fixed-on", &Context::root()), Some(false));
        assert_eq!(evaluator.is_enabled("by-tenant", &Context::root()), None);
        assert_eq!(before.get("fixed-on"), Some(&FeatureSetting::Fixed(true)));
    }
}
