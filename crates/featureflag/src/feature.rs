//! Feature handles and the `feature!` / `is_enabled!` macros.

#[cfg(feature = "feature-registry")]
use std::collections::HashSet;
#[cfg(feature = "feature-registry")]
use std::sync::LazyLock;

use tracing::trace;

use crate::context::{Context, ROOT};
use crate::evaluator::Evaluator;

/// A named feature together with the default used when no evaluator decides.
///
/// Usually created with [`feature!`](crate::feature!), or implicitly by
/// [`is_enabled!`](crate::is_enabled!).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Feature<'a, D = fn() -> bool> {
    name: &'a str,
    default_fn: D,
}

impl<'a> Feature<'a> {
    /// Creates a feature with a fixed default.
    ///
    /// Features created this way are not part of [`known_features`].
    pub const fn new(name: &'a str, default: bool) -> Self {
        Self { name, default_fn: if default { || true } else { || false } }
    }
}

impl<'a, D: Fn() -> bool> Feature<'a, D> {
    /// Creates a feature whose default is computed lazily, only when no
    /// evaluator has an opinion.
    pub const fn new_with_default_fn(name: &'a str, default_fn: D) -> Self {
        Self { name, default_fn }
    }

    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Asks the evaluator of `context` (the root when `None`) for the state of
    /// this feature, without applying the default.
    pub fn get_state_in(&self, context: Option<&Context>) -> Option<bool> {
        let context = context.unwrap_or(&ROOT);
        let state = context.evaluator()?.is_enabled(self.name, context);
        trace!(feature = self.name, state = ?state, "feature evaluated");
        state
    }

    #[inline]
    pub fn get_state(&self) -> Option<bool> {
        self.get_state_in(Context::current().as_ref())
    }

    /// Returns whether the feature is enabled in the current context.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled_in(Context::current().as_ref())
    }

    #[inline]
    pub fn is_enabled_in(&self, context: Option<&Context>) -> bool {
        self.get_state_in(context).unwrap_or_else(|| (self.default_fn)())
    }
}

#[cfg(feature = "feature-registry")]
#[macro_export]
#[doc(hidden)]
macro_rules! __register_feature {
    ($name:literal) => {
        $crate::__reexport::inventory::submit! {
            $crate::feature::RegisteredFeature($name)
        }
    };
}

#[cfg(not(feature = "feature-registry"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __register_feature {
    ($name:literal) => {};
}

/// Creates a [`Feature`] from a literal name and a default expression.
///
/// The default expression is only evaluated when no evaluator decides. With the
/// `feature-registry` feature the name is added to [`known_features`].
///
/// ```rust
/// let search = featureflag::feature!("fuzzy-search", false);
///
/// assert_eq!(search.name(), "fuzzy-search");
/// assert!(!search.is_enabled());
/// ```
///
/// Leaving out the default is an error:
///
/// ```compile_fail
/// let search = featureflag::feature!("fuzzy-search");
/// ```
#[macro_export]
macro_rules! feature {
    ($name:literal, $default:expr $(,)?) => {{
        $crate::__register_feature!($name);
        $crate::feature::Feature::new_with_default_fn($name, || $default)
    }};

    ($name:literal $(,)?) => {{
        compile_error!("missing default value for feature");
        $crate::feature!($name, false)
    }};
}

/// Checks a feature, falling back to `default` when no evaluator decides.
///
/// Uses the current context unless one is given with `context: <expr>`, which
/// accepts the same forms as the `parent:` argument of [`context!`](crate::context!).
///
/// ```rust
/// use featureflag::{context, is_enabled};
///
/// let request = context!(user = "alice");
///
/// assert!(is_enabled!("dark-mode", true));
/// assert!(!is_enabled!(context: request, "dark-mode", false));
/// ```
#[macro_export]
macro_rules! is_enabled {
    (context: $context:expr, $feature:literal $(, $default:expr)? $(,)?) => {
        $crate::feature!($feature $(, $default)?).is_enabled_in(
            $crate::context::AsContextParam::as_context_param(&$context),
        )
    };

    ($feature:literal $(, $default:expr)? $(,)?) => {
        $crate::feature!($feature $(, $default)?).is_enabled()
    };
}

/// Every feature name used with [`feature!`](crate::feature!) or
/// [`is_enabled!`](crate::is_enabled!) in the linked program.
///
/// Names are collected at link time, so features in code that never runs are
/// included too.
#[cfg(feature = "feature-registry")]
#[cfg_attr(docsrs, doc(cfg(feature = "feature-registry")))]
pub fn known_features() -> &'static HashSet<&'static str> {
    static CACHED: LazyLock<HashSet<&'static str>> =
        LazyLock::new(|| inventory::iter::<RegisteredFeature>().map(|feature| feature.0).collect());
    &CACHED
}

#[cfg(feature = "feature-registry")]
#[doc(hidden)]
pub struct RegisteredFeature(pub &'static str);

#[cfg(feature = "feature-registry")]
inventory::collect!(RegisteredFeature);
