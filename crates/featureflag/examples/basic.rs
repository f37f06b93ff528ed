use featureflag::context::ContextRef;
use featureflag::fields::Fields;
use featureflag::{Context, Evaluator, context, set_global_default};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

struct Beta(bool);

struct DemoEvaluator;

impl Evaluator for DemoEvaluator {
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool> {
        match feature {
            "enabled" => Some(true),
            "disabled" => Some(false),
            "conditional" => context.iter().find_map(|context| context.extensions().get::<Beta>()).map(|beta| beta.0),
            _ => None,
        }
    }

    fn on_new_context(&self, mut context: ContextRef<'_>, fields: Fields<'_>) {
        if let Some(beta) = fields.get("beta").and_then(|value| value.as_bool()) {
            context.extensions_mut().insert(Beta(beta));
        }
    }
}

fn report(feature: &'static str, state: bool, place: &str) {
    info!(feature, enabled = state, "{place}");
}

fn main() {
    let filter = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    set_global_default(DemoEvaluator);

    report("enabled", featureflag::is_enabled!("enabled", false), "top level");
    report("disabled", featureflag::is_enabled!("disabled", true), "top level");
    report("unknown", featureflag::is_enabled!("unknown", false), "top level");
    report("conditional", featureflag::is_enabled!("conditional", false), "outside any context");

    context!(beta = false).in_scope(|| {
        report("conditional", featureflag::is_enabled!("conditional", false), "non-beta context");
    });

    context!(beta = true).in_scope(|| {
        report("conditional", featureflag::is_enabled!("conditional", false), "beta context");

        context!().in_scope(|| {
            report("conditional", featureflag::is_enabled!("conditional", false), "nested context");
        });

        context!(beta = false).in_scope(|| {
            report("conditional", featureflag::is_enabled!("conditional", false), "nested non-beta context");
        });
    });
}
