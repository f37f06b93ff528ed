//! Wrappers that carry a [`Context`] or an [`Evaluator`] into futures and streams.

use std::fmt;
use std::pin::Pin;
use std::task::{self, Poll};

use pin_project_lite::pin_project;

use crate::context::Context;
use crate::evaluator::{DefaultGuard, Evaluator, EvaluatorRef, NoEvaluator, get_default, set_default_unregistered};

/// Extension trait for all types.
pub trait AnyExt {
    /// Wraps the value with a [`Context`].
    ///
    /// A wrapped future (or stream, with the `futures` feature) is polled with
    /// `context` as the current context.
    fn wrap_context(self, context: Context) -> WrapContext<Self>
    where
        Self: Sized,
    {
        WrapContext { context, inner: self }
    }

    /// Wraps the value with the current context, or the root if there is none.
    fn inherit_context(self) -> WrapContext<Self>
    where
        Self: Sized,
    {
        self.wrap_context(Context::current_or_root())
    }

    /// Wraps the value with an [`Evaluator`].
    ///
    /// A wrapped future (or stream, with the `futures` feature) is polled with
    /// `evaluator` as the scoped default, as if inside
    /// [`with_default`](crate::evaluator::with_default). The evaluator's
    /// `on_registration` hook runs on the first poll.
    fn wrap_evaluator(self, evaluator: EvaluatorRef) -> WrapEvaluator<Self>
    where
        Self: Sized,
    {
        WrapEvaluator { evaluator, registered: false, inner: self }
    }

    /// Wraps the value with the default evaluator currently in effect.
    ///
    /// The evaluator is already registered, so no hook runs on first poll. Falls
    /// back to [`NoEvaluator`] when no default is installed.
    fn inherit_evaluator(self) -> WrapEvaluator<Self>
    where
        Self: Sized,
    {
        let evaluator = get_default(|evaluator| evaluator.cloned()).unwrap_or_else(|| NoEvaluator.into_ref());
        WrapEvaluator { evaluator, registered: true, inner: self }
    }
}

impl<T: ?Sized> AnyExt for T {}

pin_project! {
    /// See [`AnyExt::wrap_context`].
    #[must_use = "futures and streams do nothing unless polled"]
    pub struct WrapContext<T> {
        context: Context,
        #[pin]
        inner: T,
    }
}

impl<T> WrapContext<T> {
    pub const fn context(&self) -> &Context {
        &self.context
    }
}

impl<Fut: Future> Future for WrapContext<Fut> {
    type Output = Fut::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        this.context.in_scope(|| this.inner.poll(cx))
    }
}

#[cfg(feature = "futures")]
impl<S: futures::Stream> futures::Stream for WrapContext<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.context.in_scope(|| this.inner.poll_next(cx))
    }
}

impl<T> fmt::Debug for WrapContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapContext").field("context", &self.context).finish_non_exhaustive()
    }
}

pin_project! {
    /// See [`AnyExt::wrap_evaluator`].
    #[must_use = "futures and streams do nothing unless polled"]
    pub struct WrapEvaluator<T> {
        evaluator: EvaluatorRef,
        registered: bool,
        #[pin]
        inner: T,
    }
}

impl<T> WrapEvaluator<T> {
    pub const fn evaluator(&self) -> &EvaluatorRef {
        &self.evaluator
    }

    /// Registers the evaluator once and installs it as the scoped default for one poll.
    fn enter(self: Pin<&mut Self>) -> (DefaultGuard, Pin<&mut T>) {
        let this = self.project();
        if !*this.registered {
            this.evaluator.on_registration();
            *this.registered = true;
        }
        (set_default_unregistered(this.evaluator.clone()), this.inner)
    }
}

impl<Fut: Future> Future for WrapEvaluator<Fut> {
    type Output = Fut::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let (_guard, inner) = self.enter();
        inner.poll(cx)
    }
}

#[cfg(feature = "futures")]
impl<S: futures::Stream> futures::Stream for WrapEvaluator<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Option<Self::Item>> {
        let (_guard, inner) = self.enter();
        inner.poll_next(cx)
    }
}

impl<T> fmt::Debug for WrapEvaluator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapEvaluator")
            .field("evaluator", &self.evaluator)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}
