//! Evaluators decide whether features are enabled.
//!
//! The [`Evaluator`] trait is the extension point of this crate. This module also
//! provides [`NoEvaluator`], the shared handles [`EvaluatorRef`] and
//! [`WeakEvaluatorRef`], and the combinators of [`EvaluatorExt`].
//!
//! # Default evaluator
//!
//! Feature checks use the default evaluator currently in effect, resolved in
//! this order:
//!
//! 1. the scoped evaluator installed by [`with_default`], [`set_default`] or
//!    [`AnyExt::wrap_evaluator`](crate::utils::AnyExt::wrap_evaluator),
//! 2. the thread evaluator installed by [`set_thread_default`],
//! 3. the process evaluator installed by [`set_global_default`].
//!
//! [`get_default`] gives access to the resolved evaluator.

mod global;

use std::fmt;
use std::sync::{Arc, LazyLock, Weak};

use crate::context::{Context, ContextRef};
use crate::fields::Fields;

pub use self::global::*;
pub(crate) use self::global::set_default_unregistered;

/// Decides the state of feature flags at runtime.
pub trait Evaluator: Send + Sync {
    /// Returns the state of `feature` in `context`.
    ///
    /// * `Some(true)` enables the feature,
    /// * `Some(false)` disables it,
    /// * `None` defers to the default given at the call site.
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool>;

    /// Called when the evaluator is installed as a default.
    ///
    /// Installing the same evaluator more than once calls this more than once.
    fn on_registration(&self) {}

    /// Called while a new context is being created.
    ///
    /// `fields` are not kept by the context; store whatever is needed for later
    /// evaluations in [`ContextRef::extensions_mut`].
    fn on_new_context(&self, context: ContextRef<'_>, fields: Fields<'_>) {
        let _ = (context, fields);
    }

    /// Called after the last handle to a context created under this evaluator
    /// has been dropped.
    fn on_close_context(&self, context: ContextRef<'_>) {
        let _ = context;
    }

    /// Converts the evaluator into a shared [`EvaluatorRef`].
    ///
    /// Override only when a cheaper conversion than `Arc::new(self)` exists.
    fn into_ref(self) -> EvaluatorRef
    where
        Self: Sized + 'static,
    {
        EvaluatorRef::from_arc(Arc::new(self))
    }
}

macro_rules! delegate_evaluator {
    ($this:ident => $inner:expr) => {
        fn is_enabled(&$this, feature: &str, context: &Context) -> Option<bool> {
            $inner.is_enabled(feature, context)
        }

        fn on_registration(&$this) {
            $inner.on_registration();
        }

        fn on_new_context(&$this, context: ContextRef<'_>, fields: Fields<'_>) {
            $inner.on_new_context(context, fields);
        }

        fn on_close_context(&$this, context: ContextRef<'_>) {
            $inner.on_close_context(context);
        }
    };
}

impl<E: Evaluator + 'static> Evaluator for Arc<E> {
    delegate_evaluator!(self => (**self));

    fn into_ref(self) -> EvaluatorRef {
        EvaluatorRef::from_arc(self)
    }
}

impl Evaluator for Arc<dyn Evaluator> {
    delegate_evaluator!(self => (**self));

    fn into_ref(self) -> EvaluatorRef {
        EvaluatorRef::from_arc(self)
    }
}

/// Evaluator that has no opinion on any feature.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEvaluator;

impl Evaluator for NoEvaluator {
    fn is_enabled(&self, _feature: &str, _context: &Context) -> Option<bool> {
        None
    }

    fn into_ref(self) -> EvaluatorRef {
        static SHARED: LazyLock<Arc<NoEvaluator>> = LazyLock::new(|| Arc::new(NoEvaluator));
        EvaluatorRef::from_arc(SHARED.clone())
    }
}

/// Shared, type-erased handle to an [`Evaluator`].
#[derive(Clone)]
pub struct EvaluatorRef {
    arc: Arc<dyn Evaluator>,
}

impl EvaluatorRef {
    pub fn from_arc(arc: Arc<dyn Evaluator>) -> Self {
        Self { arc }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakEvaluatorRef {
        WeakEvaluatorRef { weak: Arc::downgrade(&self.arc) }
    }

    /// Returns `true` if both handles point to the same evaluator.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arc, &other.arc)
    }
}

impl Evaluator for EvaluatorRef {
    delegate_evaluator!(self => (*self.arc));

    fn into_ref(self) -> EvaluatorRef {
        self
    }
}

impl fmt::Debug for EvaluatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorRef").finish_non_exhaustive()
    }
}

/// Weak counterpart of [`EvaluatorRef`].
///
/// Contexts hold their evaluator weakly so that replacing a scoped evaluator
/// is not prevented by contexts that are still alive.
#[derive(Clone)]
pub struct WeakEvaluatorRef {
    weak: Weak<dyn Evaluator>,
}

impl WeakEvaluatorRef {
    /// Creates a handle that is not attached to any evaluator.
    pub const fn new() -> Self {
        Self { weak: Weak::<NoEvaluator>::new() }
    }

    pub fn upgrade(&self) -> Option<EvaluatorRef> {
        self.weak.upgrade().map(EvaluatorRef::from_arc)
    }
}

impl Default for WeakEvaluatorRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WeakEvaluatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEvaluatorRef")
            .field("attached", &(self.weak.strong_count() > 0))
            .finish()
    }
}

/// Combinators available on every [`Evaluator`].
pub trait EvaluatorExt: Evaluator {
    /// Only asks `self` about features accepted by `filter_fn`.
    ///
    /// Rejected features evaluate to `None`. Lifecycle hooks are always forwarded.
    fn filter<F>(self, filter_fn: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Filter { evaluator: self, filter_fn }
    }

    /// Asks `self` first and falls back to `other` when `self` returns `None`.
    ///
    /// Lifecycle hooks run on both evaluators, `self` first.
    fn chain<U>(self, other: U) -> Chain<Self, U>
    where
        Self: Sized,
        U: Evaluator,
    {
        Chain(self, other)
    }
}

impl<E: ?Sized + Evaluator> EvaluatorExt for E {}

/// See [`EvaluatorExt::filter`].
pub struct Filter<E, F> {
    evaluator: E,
    filter_fn: F,
}

impl<E, F> Evaluator for Filter<E, F>
where
    E: Evaluator,
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool> {
        if (self.filter_fn)(feature) { self.evaluator.is_enabled(feature, context) } else { None }
    }

    fn on_registration(&self) {
        self.evaluator.on_registration();
    }

    fn on_new_context(&self, context: ContextRef<'_>, fields: Fields<'_>) {
        self.evaluator.on_new_context(context, fields);
    }

    fn on_close_context(&self, context: ContextRef<'_>) {
        self.evaluator.on_close_context(context);
    }
}

impl<E: fmt::Debug, F> fmt::Debug for Filter<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("evaluator", &self.evaluator).finish_non_exhaustive()
    }
}

/// See [`EvaluatorExt::chain`].
#[derive(Debug)]
pub struct Chain<T, U>(T, U);

impl<T: Evaluator, U: Evaluator> Evaluator for Chain<T, U> {
    fn is_enabled(&self, feature: &str, context: &Context) -> Option<bool> {
        self.0.is_enabled(feature, context).or_else(|| self.1.is_enabled(feature, context))
    }

    fn on_registration(&self) {
        self.0.on_registration();
        self.1.on_registration();
    }

    fn on_new_context(&self, mut context: ContextRef<'_>, fields: Fields<'_>) {
        self.0.on_new_context(context.by_mut(), fields);
        self.1.on_new_context(context, fields);
    }

    fn on_close_context(&self, mut context: ContextRef<'_>) {
        self.0.on_close_context(context.by_mut());
        self.1.on_close_context(context);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug)]
    struct Fixed(&'static str, bool);

    impl Evaluator for Fixed {
        fn is_enabled(&self, feature: &str, _context: &Context) -> Option<bool> {
            (feature == self.0).then_some(self.1)
        }
    }

    #[derive(Debug, Default)]
    struct Counting(AtomicUsize);

    impl Evaluator for Counting {
        fn is_enabled(&self, _feature: &str, _context: &Context) -> Option<bool> {
            None
        }

        fn on_registration(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn chain_prefers_first_answer() {
        let root = Context::root();
        let chain = Fixed("a", false).chain(Fixed("a", true)).chain(Fixed("b", true));

        assert_eq!(chain.is_enabled("a", &root), Some(false));
        assert_eq!(chain.is_enabled("b", &root), Some(true));
        assert_eq!(chain.is_enabled("c", &root), None);
    }

    #[test]
    fn filter_hides_rejected_features() {
        let root = Context::root();
        let filtered = Fixed("beta.search", true).filter(|name| !name.starts_with("beta."));

        assert_eq!(filtered.is_enabled("beta.search", &root), None);
    }

    #[test]
    fn hooks_reach_both_sides_of_chain() {
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());

        first.clone().chain(second.clone()).on_registration();

        assert_eq!(first.0.load(Ordering::SeqCst), 1);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_into_ref_reuses_allocation() {
        let arc: Arc<dyn Evaluator> = Arc::new(NoEvaluator);
        let a = arc.clone().into_ref();
        let b = arc.into_ref();
        assert!(a.ptr_eq(&b));
        assert!(NoEvaluator.into_ref().ptr_eq(&NoEvaluator.into_ref()));
    }

    #[test]
    fn weak_ref_detaches_when_evaluator_drops() {
        assert!(WeakEvaluatorRef::new().upgrade().is_none());

        let strong = Fixed("a", true).into_ref();
        let weak = strong.downgrade();
        assert!(weak.upgrade().is_some());

        drop(strong);
        assert!(weak.upgrade().is_none());
    }
}
