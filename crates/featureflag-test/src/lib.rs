//! # Featureflag test support
//!
//! [`TestEvaluator`] is an evaluator whose features are set from test code, and
//! [`with_features`] installs one for the body of a test function.
//!
//! ```rust
//! use featureflag::evaluator::with_default;
//! use featureflag_test::TestEvaluator;
//!
//! let evaluator = TestEvaluator::new();
//! evaluator.set_feature("new-checkout", true);
//!
//! with_default(evaluator, || {
//!     assert!(featureflag::is_enabled!("new-checkout", false));
//! });
//! ```

use std::fmt;
use std::ops::Deref;

use featureflag::Context;
use featureflag::context::ContextRef;
use featureflag::evaluator::{DefaultGuard, Evaluator, set_default};
use featureflag::fields::{Fields, OwnedFields};
use fxhash::FxHashMap;
use parking_lot::RwLock;

pub use featureflag_test_macros::with_features;

/// An evaluator with features set explicitly by tests.
///
/// Features that were never set evaluate to `None`, so the default given at the
/// call site applies. Every context created while this evaluator is the default
/// records its fields; see [`TestContextExt::test_fields`].
#[derive(Default)]
pub struct TestEvaluator {
    features: RwLock<FxHashMap<String, Box<dyn TestFeature>>>,
}

impl TestEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state of `feature`, replacing any previous state.
    ///
    /// `enabled` is anything implementing [`TestFeature`]: a `bool`, an
    /// `Option` of one, or a function of the [`Context`] returning one.
    pub fn set_feature<T: TestFeature>(&self, feature: &str, enabled: T) {
        self.features.write().insert(feature.to_owned(), Box::new(enabled));
    }

    pub fn clear_feature(&self, feature: &str) {
        self.features.write().remove(feature);
    }

    /// Installs the evaluator as the scoped default until the guard is dropped.
    pub fn install(self) -> DefaultGuard {
        set_default(self)
    }
}

impl Evaluator for TestEvaluator {
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool> {
        self.features.read().get(feature)?.is_enabled(context)
    }

    fn on_new_context(&self, mut context: ContextRef<'_>, fields: Fields<'_>) {
        context.extensions_mut().insert(TestFields(fields.to_owned_fields()));
    }
}

impl fmt::Debug for TestEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features = self.features.read();
        let mut names: Vec<_> = features.keys().collect();
        names.sort_unstable();
        f.debug_struct("TestEvaluator").field("features", &names).finish()
    }
}

/// State of a feature in a [`TestEvaluator`].
pub trait TestFeature: Send + Sync + 'static {
    fn is_enabled(&self, context: &Context) -> Option<bool>;
}

impl TestFeature for bool {
    fn is_enabled(&self, _context: &Context) -> Option<bool> {
        Some(*self)
    }
}

impl<T: TestFeature> TestFeature for Option<T> {
    fn is_enabled(&self, context: &Context) -> Option<bool> {
        self.as_ref()?.is_enabled(context)
    }
}

impl<F, O> TestFeature for F
where
    F: Fn(&Context) -> O + Send + Sync + 'static,
    O: TestFeature,
{
    fn is_enabled(&self, context: &Context) -> Option<bool> {
        self(context).is_enabled(context)
    }
}

/// Fields a context was created with, recorded by [`TestEvaluator`].
#[derive(Clone, Debug, PartialEq)]
pub struct TestFields(OwnedFields);

impl Deref for TestFields {
    type Target = OwnedFields;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Access to the fields recorded by [`TestEvaluator`].
pub trait TestContextExt {
    /// Fields of this context, or `None` if it was not created under a
    /// [`TestEvaluator`] (the root never has any).
    fn test_fields(&self) -> Option<&TestFields>;
}

impl TestContextExt for Context {
    fn test_fields(&self) -> Option<&TestFields> {
        self.extensions().get::<TestFields>()
    }
}
