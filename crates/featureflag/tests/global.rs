use std::sync::Once;

use featureflag::evaluator::{set_thread_default, try_set_thread_default, with_default};
use featureflag::{SetDefaultError, try_set_global_default};
use featureflag_test::TestEvaluator;
use serial_test::serial;

static GLOBAL: Once = Once::new();

fn install_global() {
    GLOBAL.call_once(|| {
        let evaluator = TestEvaluator::new();
        evaluator.set_feature("layer", false);
        evaluator.set_feature("global-only", true);
        featureflag::set_global_default(evaluator);
    });
}

fn layered(value: bool) -> TestEvaluator {
    let evaluator = TestEvaluator::new();
    evaluator.set_feature("layer", value);
    evaluator
}

#[test]
#[serial]
fn global_default_is_set_once() {
    install_global();

    assert_eq!(try_set_global_default(TestEvaluator::new()), Err(SetDefaultError::GlobalAlreadySet));
    assert!(featureflag::is_enabled!("global-only", false));
}

#[test]
#[serial]
#[should_panic(expected = "global evaluator already set")]
fn set_global_default_panics_when_already_set() {
    install_global();
    featureflag::set_global_default(TestEvaluator::new());
}

#[test]
#[serial]
fn precedence_is_scoped_then_thread_then_global() {
    install_global();

    std::thread::spawn(|| {
        assert!(!featureflag::is_enabled!("layer", true));

        set_thread_default(layered(true));
        assert!(featureflag::is_enabled!("layer", false));
        assert_eq!(try_set_thread_default(layered(false)), Err(SetDefaultError::ThreadAlreadySet));

        with_default(layered(false), || assert!(!featureflag::is_enabled!("layer", true)));
        assert!(featureflag::is_enabled!("layer", false));

        // The thread evaluator does not know this one and the global is not consulted.
        assert!(!featureflag::is_enabled!("global-only", false));
    })
    .join()
    .expect("thread assertions failed");

    assert!(!featureflag::is_enabled!("layer", true));
}
