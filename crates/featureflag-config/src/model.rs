//! Serde model of the feature configuration.
//!
//! ```toml
//! [features]
//! new-checkout = true
//!
//! [features.dark-mode]
//! default = false
//! rules = [
//!     { field = "tenant", equals = "acme", enabled = true },
//!     { field = "beta", equals = true, enabled = true },
//! ]
//! ```

use featureflag::value::Value;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Feature settings keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub features: FxHashMap<String, FeatureSetting>,
}

impl FeatureConfig {
    pub fn get(&self, feature: &str) -> Option<&FeatureSetting> {
        self.features.get(feature)
    }
}

/// Either a fixed state or a set of rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSetting {
    Fixed(bool),
    Rules(FeatureRules),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureRules {
    /// State when no rule matches. `None` defers to the default at the call site.
    pub default: Option<bool>,
    /// Checked in order; the first match decides.
    pub rules: Vec<Rule>,
}

/// Enables or disables a feature when a context field has a given value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub field: String,
    pub equals: RuleValue,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl RuleValue {
    /// Compares with a context field. Integers match across signedness.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match self {
            Self::Bool(expected) => value.as_bool() == Some(*expected),
            Self::Int(expected) => {
                value.as_i64() == Some(*expected)
                    || value.as_u64().is_some_and(|actual| i64::try_from(actual) == Ok(*expected))
            }
            Self::Str(expected) => value.as_str() == Some(expected.as_str()),
        }
    }
}
