//! Captured continuations: the rest of a function body as a multi-shot value.

use tracing::trace;

use crate::backend::callable::{Body, Callable, CallableKind, Frame, Signature};
use crate::backend::errors::RuntimeResult;
use crate::backend::models::{Kwargs, Values};
use crate::backend::trampoline::Step;

/// The remainder of a body plus the parent continuation of the frame that
/// captured it.
///
/// Only control state lives here. Whatever the remainder reads from shared
/// state is read afresh on every invocation.
pub(crate) struct CapturedContinuation {
    parent: Option<Callable>,
    remainder: Box<Body>,
}

impl CapturedContinuation {
    pub(crate) fn callable<F>(
        name: String,
        signature: Signature,
        parent: Option<Callable>,
        remainder: F,
    ) -> Callable
    where
        F: Fn(Frame) -> RuntimeResult<Step> + 'static,
    {
        let k = CapturedContinuation {
            parent,
            remainder: Box::new(remainder),
        };
        Callable::from_kind(name, signature, CallableKind::Captured(k))
    }

    /// Run the remainder once. With no explicit `cc` the remainder returns to
    /// the captured parent; with one, to the parent first and then `cc`.
    pub(crate) fn resume(
        &self,
        me: &Callable,
        args: Values,
        kwargs: Kwargs,
        cc: Option<Callable>,
    ) -> RuntimeResult<Step> {
        let explicit = cc.unwrap_or_else(Callable::identity);
        let effective = Callable::chain(self.parent.as_ref(), explicit);
        trace!(
            target: "contrail::capture",
            continuation = me.name(),
            values = args.len(),
            returns_to = effective.name(),
            "resuming captured continuation"
        );
        (self.remainder)(Frame::enter(me.clone(), args, kwargs, effective))
    }

    pub(crate) fn parent(&self) -> Option<&Callable> {
        self.parent.as_ref()
    }
}
