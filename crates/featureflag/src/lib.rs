//! # Featureflag
//!
//! A feature flagging facade.
//!
//! Application code asks whether a feature is enabled and supplies a default;
//! an installed [`Evaluator`] decides. Evaluators are pluggable and can be
//! installed for the whole process, for one thread, or for a single scope.
//!
//! * [`is_enabled!`] is the primary entry point. It takes a literal feature name
//!   and a default, and returns a `bool`.
//! * [`feature!`] builds a [`Feature`] that can live in a variable or `const`.
//!   [`Feature::new`] and [`Feature::new_with_default_fn`] build features at runtime.
//! * [`context!`] and [`Context`] carry contextual data (user id, tenant, ...)
//!   that evaluators can inspect.
//!
//! ## Cargo features
//!
//! * `feature-registry` (default): collects every feature name used through the
//!   macros at link time, see [`feature::known_features`].
//! * `futures`: `Stream` support for [`utils::WrapContext`] and [`utils::WrapEvaluator`].
//!
//! ## Example
//!
//! ```rust
//! use featureflag::{Context, Evaluator, context, evaluator::with_default};
//!
//! struct Enabled;
//!
//! impl Evaluator for Enabled {
//!     fn is_enabled(&self, feature: &str, _context: &Context) -> Option<bool> {
//!         (feature == "new-checkout").then_some(true)
//!     }
//! }
//!
//! with_default(Enabled, || {
//!     assert!(featureflag::is_enabled!("new-checkout", false));
//!     assert!(!featureflag::is_enabled!("legacy-search", false));
//!
//!     context!(user = "alice").in_scope(|| {
//!         assert!(featureflag::is_enabled!("new-checkout", false));
//!     });
//! });
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod context;
mod error;
pub mod evaluator;
pub mod extensions;
pub mod feature;
pub mod fields;
pub mod utils;
pub mod value;

pub use crate::{
    context::Context,
    error::SetDefaultError,
    evaluator::{Evaluator, set_global_default, try_set_global_default},
    feature::Feature,
};

#[doc(hidden)]
pub mod __reexport {
    #[cfg(feature = "feature-registry")]
    pub use inventory;
}
