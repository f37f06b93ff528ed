/// Errors returned when installing a default evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SetDefaultError {
    /// A process-wide evaluator was already installed with
    /// [`set_global_default`](crate::evaluator::set_global_default).
    #[error("global evaluator already set")]
    GlobalAlreadySet,

    /// The current thread already has an evaluator installed with
    /// [`set_thread_default`](crate::evaluator::set_thread_default).
    #[error("thread evaluator already set")]
    ThreadAlreadySet,
}
