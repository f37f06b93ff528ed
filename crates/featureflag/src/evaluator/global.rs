use std::cell::{OnceCell, RefCell};
use std::marker::PhantomData;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::SetDefaultError;
use crate::evaluator::{Evaluator, EvaluatorRef};

static GLOBAL_EVALUATOR: OnceLock<EvaluatorRef> = OnceLock::new();

thread_local! {
    static THREAD_EVALUATOR: OnceCell<EvaluatorRef> = const { OnceCell::new() };
    static SCOPED_EVALUATOR: RefCell<Option<EvaluatorRef>> = const { RefCell::new(None) };
}

/// Installs the process-wide evaluator.
///
/// # Panics
/// Panics if a global evaluator is already installed; see [`try_set_global_default`].
#[track_caller]
pub fn set_global_default<E: Evaluator + 'static>(evaluator: E) {
    if let Err(err) = try_set_global_default(evaluator) {
        panic!("failed to set global default: {err}");
    }
}

/// Installs the process-wide evaluator.
///
/// # Errors
/// Returns [`SetDefaultError::GlobalAlreadySet`] if one is already installed.
/// The rejected evaluator is dropped without being registered.
pub fn try_set_global_default<E: Evaluator + 'static>(evaluator: E) -> Result<(), SetDefaultError> {
    let mut installed = false;
    let current = GLOBAL_EVALUATOR.get_or_init(|| {
        installed = true;
        evaluator.into_ref()
    });

    if !installed {
        return Err(SetDefaultError::GlobalAlreadySet);
    }

    current.on_registration();
    debug!("global feature flag evaluator installed");
    Ok(())
}

/// Installs the evaluator for the current thread, overriding the global one.
///
/// # Panics
/// Panics if this thread already has an evaluator; see [`try_set_thread_default`].
#[track_caller]
pub fn set_thread_default<E: Evaluator + 'static>(evaluator: E) {
    if let Err(err) = try_set_thread_default(evaluator) {
        panic!("failed to set thread default: {err}");
    }
}

/// Installs the evaluator for the current thread, overriding the global one.
///
/// # Errors
/// Returns [`SetDefaultError::ThreadAlreadySet`] if this thread already has one.
pub fn try_set_thread_default<E: Evaluator + 'static>(evaluator: E) -> Result<(), SetDefaultError> {
    let evaluator = THREAD_EVALUATOR.with(|cell| {
        let mut installed = false;
        let current = cell.get_or_init(|| {
            installed = true;
            evaluator.into_ref()
        });
        installed.then(|| current.clone())
    });

    let Some(evaluator) = evaluator else {
        return Err(SetDefaultError::ThreadAlreadySet);
    };

    evaluator.on_registration();
    debug!("thread feature flag evaluator installed");
    Ok(())
}

/// Runs `f` with `evaluator` as the scoped default.
///
/// The previous scoped evaluator is restored when `f` returns or unwinds.
pub fn with_default<E: Evaluator + 'static, F: FnOnce() -> R, R>(evaluator: E, f: F) -> R {
    let _guard = set_default(evaluator);
    f()
}

/// Makes `evaluator` the scoped default until the returned guard is dropped.
///
/// Guards must be dropped in reverse order of creation; each one restores the
/// scoped evaluator that was active when it was created.
pub fn set_default<E: Evaluator + 'static>(evaluator: E) -> DefaultGuard {
    let evaluator = evaluator.into_ref();
    evaluator.on_registration();
    debug!("scoped feature flag evaluator installed");
    set_default_unregistered(evaluator)
}

pub(crate) fn set_default_unregistered(evaluator: EvaluatorRef) -> DefaultGuard {
    let previous = SCOPED_EVALUATOR.replace(Some(evaluator));
    DefaultGuard { previous, _not_send: PhantomData }
}

/// Restores the previous scoped evaluator on drop. See [`set_default`].
#[must_use = "dropping the guard immediately restores the previous evaluator"]
#[derive(Debug)]
pub struct DefaultGuard {
    previous: Option<EvaluatorRef>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for DefaultGuard {
    fn drop(&mut self) {
        let replaced = SCOPED_EVALUATOR.replace(self.previous.take());
        drop(replaced);
    }
}

/// Calls `f` with the default evaluator currently in effect.
///
/// Resolution order: scoped, then thread, then global. `f` receives `None`
/// when no evaluator is installed at all.
pub fn get_default<F: FnOnce(Option<&EvaluatorRef>) -> R, R>(f: F) -> R {
    if let Some(evaluator) = SCOPED_EVALUATOR.with_borrow(Clone::clone) {
        return f(Some(&evaluator));
    }
    if let Some(evaluator) = THREAD_EVALUATOR.with(|cell| cell.get().cloned()) {
        return f(Some(&evaluator));
    }
    f(GLOBAL_EVALUATOR.get())
}
