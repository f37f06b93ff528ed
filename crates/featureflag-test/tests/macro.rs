#![allow(clippy::needless_lifetimes, clippy::extra_unused_lifetimes, dead_code)]

use std::marker::PhantomData;

use featureflag::{Context, context};
use featureflag_test::{TestContextExt, with_features};

fn custom(context: &Context) -> Option<bool> {
    context.iter().filter_map(|c| c.test_fields()).find_map(|f| f.get("foo")).and_then(|v| v.as_bool())
}

fn assert_features() {
    assert!(featureflag::is_enabled!("enabled", false));
    assert!(featureflag::is_enabled!("enabled", true));

    assert!(!featureflag::is_enabled!("disabled", false));
    assert!(!featureflag::is_enabled!("disabled", true));

    assert!(featureflag::is_enabled!("implicit", false));

    assert!(!featureflag::is_enabled!("unknown", false));
    assert!(featureflag::is_enabled!("unknown", true));

    assert!(!featureflag::is_enabled!("custom", false));
    assert!(featureflag::is_enabled!("custom", true));

    context!(foo = true).in_scope(|| {
        assert!(featureflag::is_enabled!("custom", false));

        context!(foo = false).in_scope(|| {
            assert!(!featureflag::is_enabled!("custom", true));
        });
    });
}

#[test]
#[with_features(enabled = true, disabled = false, custom = custom, implicit)]
fn idents() {
    assert_features();
}

#[test]
#[with_features("enabled" = true, "disabled" = false, "custom" = custom, "implicit")]
fn string_literals() {
    assert_features();
}

#[test]
#[with_features(r#type, "kebab-case")]
fn raw_idents_and_non_ident_names() {
    assert!(featureflag::is_enabled!("type", false));
    assert!(featureflag::is_enabled!("kebab-case", false));
}

#[test]
fn features_do_not_leak_out_of_the_function() {
    #[with_features(leaky)]
    fn inner() -> bool {
        featureflag::is_enabled!("leaky", false)
    }

    assert!(inner());
    assert!(!featureflag::is_enabled!("leaky", false));
}

#[test]
#[with_features(enabled)]
fn other_threads_are_not_affected() {
    let seen = std::thread::spawn(|| featureflag::is_enabled!("enabled", false)).join().expect("thread panicked");

    assert!(!seen);
    assert!(featureflag::is_enabled!("enabled", false));
}

// The attribute must also work on methods of generic impl blocks.
struct Foo<'a, T, const N: usize> {
    _phantom: PhantomData<&'a T>,
}

fn foo<'a, 'b, T, U, const N: usize, const M: usize>() {}

impl<'a, T, const N: usize> Foo<'a, T, N> {
    #[with_features("enabled" = true, "disabled" = false, "custom" = custom, "implicit")]
    fn in_impl<'b, U, const M: usize>() {
        foo::<T, U, N, M>();
        assert_features();
    }
}

#[test]
fn method_in_generic_impl() {
    Foo::<'static, u8, 1>::in_impl::<u16, 2>();
}
