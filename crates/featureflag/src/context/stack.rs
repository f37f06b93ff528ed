use std::cell::RefCell;
use std::marker::PhantomData;

use crate::context::Context;

thread_local! {
    static CURRENT_CONTEXT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

pub(crate) fn current() -> Option<Context> {
    CURRENT_CONTEXT.with_borrow(Clone::clone)
}

/// Makes `context` current until the guard drops.
pub(crate) fn enter(context: &Context) -> ScopeGuard {
    let previous = CURRENT_CONTEXT.replace(Some(context.clone()));
    ScopeGuard { previous, _not_send: PhantomData }
}

pub(crate) struct ScopeGuard {
    previous: Option<Context>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // The replaced context may run evaluator hooks when dropped, so release
        // the thread-local borrow before dropping it.
        let replaced = CURRENT_CONTEXT.replace(self.previous.take());
        drop(replaced);
    }
}
