#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Test macros
//!
//! Procedural macros for testing code that uses `featureflag`.
//! Use them through the re-exports of the `featureflag-test` crate:
//! ```toml
//! [dev-dependencies]
//! featureflag-test = { path = "../featureflag-test" }
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{Item, parse_macro_input};

use crate::macros::with_features::FeatureArgs;

/// Enables features for the body of a test.
///
/// A fresh `featureflag_test::TestEvaluator` is created with the listed
/// features and installed as the scoped default evaluator for the rest of the
/// function body. Other threads and other tests are not affected.
///
/// Names are identifiers or string literals. A name without a value is set to
/// `true`; any other value must implement `featureflag_test::TestFeature`.
///
/// # Errors
/// Emits a compile-time error when applied to anything but a function or method.
///
/// # Example
///
/// ```rust,ignore
/// use featureflag_test::with_features;
///
/// #[test]
/// #[with_features(new_checkout, "legacy-search" = false)]
/// fn checkout_uses_new_flow() {
///     assert!(featureflag::is_enabled!("new_checkout", false));
///     assert!(!featureflag::is_enabled!("legacy-search", true));
/// }
/// ```
#[proc_macro_attribute]
pub fn with_features(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as FeatureArgs);
    let input = parse_macro_input!(item as Item);
    macros::with_features::expand_with_features(args, input).into()
}
