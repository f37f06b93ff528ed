//! Contexts carry request-scoped data that evaluators can use.
//!
//! Contexts form a tree: each one has a parent, ending at the [root](Context::root).
//! The *current* context is tracked per thread and changed with
//! [`Context::in_scope`] or [`AnyExt::wrap_context`](crate::utils::AnyExt::wrap_context).

mod stack;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::evaluator::{Evaluator, EvaluatorRef, WeakEvaluatorRef, get_default};
use crate::extensions::Extensions;
use crate::fields::Fields;

pub(crate) static ROOT: Context = Context::root();
static NO_EXTENSIONS: Extensions = Extensions::new();

/// A node in the context tree.
///
/// Cloning is cheap; clones refer to the same node. When the context is created
/// the default evaluator in effect is recorded (weakly) and given the chance to
/// store data in the context's [`Extensions`].
#[derive(Clone)]
pub struct Context {
    data: Option<Arc<Data>>,
}

struct Data {
    evaluator: WeakEvaluatorRef,
    parent: Option<Context>,
    extensions: Extensions,
}

impl Context {
    /// Creates a child of the current context.
    ///
    /// Prefer the [`context!`] macro.
    pub fn new(fields: Fields<'_>) -> Self {
        Self::new_with_parent(Self::current().as_ref(), fields)
    }

    /// Creates a child of `parent`, or a top-level context when `parent` is `None`.
    ///
    /// Prefer the [`context!`] macro.
    pub fn new_with_parent(parent: Option<&Self>, fields: Fields<'_>) -> Self {
        let parent = parent.filter(|parent| !parent.is_root()).cloned();

        let data = get_default(|evaluator| {
            let mut data = Data {
                evaluator: evaluator.map(EvaluatorRef::downgrade).unwrap_or_default(),
                parent,
                extensions: Extensions::new(),
            };

            if let Some(evaluator) = evaluator {
                evaluator.on_new_context(ContextRef { data: &mut data }, fields);
            }

            data
        });

        trace!(fields = ?fields, extensions = data.extensions.len(), "context created");
        Self { data: Some(Arc::new(data)) }
    }

    /// The root of every context tree.
    ///
    /// The root carries no data and evaluates with whichever default evaluator
    /// is in effect at evaluation time.
    pub const fn root() -> Self {
        Self { data: None }
    }

    pub const fn is_root(&self) -> bool {
        self.data.is_none()
    }

    /// The context made current by the innermost [`in_scope`](Self::in_scope) on this thread.
    pub fn current() -> Option<Self> {
        stack::current()
    }

    pub fn current_or_root() -> Self {
        Self::current().unwrap_or_else(Self::root)
    }

    /// Returns the parent context.
    ///
    /// Only the root has no parent; top-level contexts return the root.
    pub fn parent(&self) -> Option<&Self> {
        let data = self.data.as_ref()?;
        Some(data.parent.as_ref().unwrap_or(&ROOT))
    }

    pub fn extensions(&self) -> &Extensions {
        self.data.as_ref().map_or(&NO_EXTENSIONS, |data| &data.extensions)
    }

    /// Iterates over this context and its ancestors, ending with the root.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |context| context.parent())
    }

    /// Runs `f` with this context as the current context.
    pub fn in_scope<F: FnOnce() -> R, R>(&self, f: F) -> R {
        let _guard = stack::enter(self);
        f()
    }

    /// Evaluator used for checks made in this context.
    pub(crate) fn evaluator(&self) -> Option<EvaluatorRef> {
        match &self.data {
            Some(data) => data.evaluator.upgrade(),
            None => get_default(|evaluator| evaluator.cloned()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.is_root())
            .field("extensions", self.extensions())
            .finish_non_exhaustive()
    }
}

impl Drop for Data {
    fn drop(&mut self) {
        if let Some(evaluator) = self.evaluator.upgrade() {
            evaluator.on_close_context(ContextRef { data: self });
            trace!("context closed");
        }
    }
}

/// Mutable access to a context while it is being created or closed.
pub struct ContextRef<'a> {
    data: &'a mut Data,
}

impl ContextRef<'_> {
    /// The parent context, or `None` for top-level contexts.
    pub fn parent(&self) -> Option<&Context> {
        self.data.parent.as_ref()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.data.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.data.extensions
    }

    /// Iterates over the ancestors of this context.
    ///
    /// The context itself is not included: it does not exist yet during
    /// creation and no longer exists during close.
    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.data.parent.iter().flat_map(Context::iter)
    }

    /// Reborrows, so that the same context can be handed to several evaluators.
    pub fn by_mut(&mut self) -> ContextRef<'_> {
        ContextRef { data: self.data }
    }
}

impl fmt::Debug for ContextRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextRef")
            .field("extensions", self.extensions())
            .finish_non_exhaustive()
    }
}

/// Creates a [`Context`].
///
/// Fields use the syntax of [`fields!`](crate::fields). The parent defaults to
/// the current context and can be set with `parent: <expr>`, where the
/// expression is a [`Context`], an `Option<Context>`, or `()` for none.
///
/// ```rust
/// use featureflag::context;
///
/// let request = context!(user_id = 7_u64, region = "eu");
/// let job = context!(parent: request, job = "export");
/// let detached = context!(parent: (), tenant = "acme");
///
/// assert!(job.parent().is_some_and(|parent| !parent.is_root()));
/// assert!(detached.parent().is_some_and(|parent| parent.is_root()));
/// ```
#[macro_export]
macro_rules! context {
    (parent: $parent:expr $(, $($fields:tt)*)?) => {
        $crate::context::Context::new_with_parent(
            $crate::context::AsContextParam::as_context_param(&$parent),
            $crate::fields!($($($fields)*)?),
        )
    };
    ($($fields:tt)*) => {
        $crate::context::Context::new($crate::fields!($($fields)*))
    };
}

#[allow(unused_imports)]
use crate::context;

/// Accepted forms of the `parent:` argument of [`context!`].
#[doc(hidden)]
pub trait AsContextParam {
    fn as_context_param(&self) -> Option<&Context>;
}

impl AsContextParam for Context {
    fn as_context_param(&self) -> Option<&Context> {
        Some(self)
    }
}

impl AsContextParam for Option<Context> {
    fn as_context_param(&self) -> Option<&Context> {
        self.as_ref()
    }
}

impl AsContextParam for () {
    fn as_context_param(&self) -> Option<&Context> {
        None
    }
}

impl<T: AsContextParam + ?Sized> AsContextParam for &T {
    fn as_context_param(&self) -> Option<&Context> {
        (**self).as_context_param()
    }
}
