use featureflag::evaluator::with_default;
use featureflag::utils::AnyExt;
use featureflag::{Context, Evaluator, context};
use featureflag_test::{TestContextExt, TestEvaluator};

fn tier_evaluator() -> TestEvaluator {
    let evaluator = TestEvaluator::new();
    evaluator.set_feature("gold-only", |context: &Context| {
        context.iter().find_map(|c| c.test_fields()?.get("tier")?.as_str().map(|tier| tier == "gold"))
    });
    evaluator
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawned_task_keeps_context_and_evaluator() {
    let handle = with_default(tier_evaluator(), || {
        let ctx = context!(tier = "gold");
        tokio::spawn(async { featureflag::is_enabled!("gold-only", false) }.wrap_context(ctx).inherit_evaluator())
    });

    assert!(handle.await.expect("task panicked"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unwrapped_task_sees_nothing() {
    let handle = with_default(tier_evaluator(), || {
        context!(tier = "gold").in_scope(|| {
            tokio::spawn(async { featureflag::is_enabled!("gold-only", false) })
        })
    });

    assert!(!handle.await.expect("task panicked"));
}

#[tokio::test]
async fn context_is_current_across_await_points() {
    let evaluator = tier_evaluator().into_ref();

    let task = async {
        let before = featureflag::is_enabled!("gold-only", false);
        tokio::task::yield_now().await;
        let after = featureflag::is_enabled!("gold-only", false);
        (before, after)
    };

    let ctx = with_default(evaluator.clone(), || context!(tier = "gold"));
    let result = task.wrap_context(ctx).wrap_evaluator(evaluator).await;

    assert_eq!(result, (true, true));
    assert!(Context::current().is_none());
}
