//! Activation records handed to participating bodies.

use tracing::trace;

use super::{Callable, Signature};
use crate::backend::continuation::CapturedContinuation;
use crate::backend::errors::{RuntimeError, RuntimeResult};
use crate::backend::models::{Kwargs, Value, Values, CC};
use crate::backend::trampoline::{Jump, Step};

/// One live activation of a participating callable.
///
/// Besides the arguments, a frame records two continuations:
/// - `cc`: where values returned from this frame go;
/// - `parent`: the continuation that was live when the frame was entered
///   (absent when that was the identity). Continuations captured inside this
///   frame fall back to it when their remainder finishes.
///
/// For a function frame both are the same value. For the frame of a captured
/// continuation invoked with an explicit `cc`, `cc` is the chain
/// "captured parent, then explicit cc" and the parent is recorded as that chain.
pub struct Frame {
    callee: Callable,
    args: Values,
    kwargs: Kwargs,
    cc: Callable,
    parent: Option<Callable>,
}

impl Frame {
    pub(crate) fn enter(callee: Callable, args: Values, kwargs: Kwargs, cc: Callable) -> Self {
        let parent = if cc.is_identity() {
            None
        } else {
            Some(cc.clone())
        };
        Frame {
            callee,
            args,
            kwargs,
            cc,
            parent,
        }
    }

    pub fn callee(&self) -> &Callable {
        &self.callee
    }

    /// Positional arguments as received (thunks unforced)
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_args(self) -> Values {
        self.args
    }

    /// Positional argument `index`, forced if it is a thunk
    pub fn arg(&self, index: usize) -> RuntimeResult<Value> {
        self.args
            .get(index)
            .cloned()
            .ok_or_else(|| RuntimeError::MissingArgument {
                target: self.callee.name().to_string(),
                index,
            })?
            .force()
    }

    /// Keyword argument `name`, forced if it is a thunk
    pub fn kwarg(&self, name: &str) -> RuntimeResult<Option<Value>> {
        self.kwargs.get(name).cloned().map(Value::force).transpose()
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// The current continuation
    pub fn cc(&self) -> &Callable {
        &self.cc
    }

    /// The continuation in scope when this frame was entered
    pub fn parent(&self) -> Option<&Callable> {
        self.parent.as_ref()
    }

    /// Return one value through the current continuation
    pub fn ret(&self, value: impl Into<Value>) -> Step {
        self.ret_values([value.into()])
    }

    /// Return several values through the current continuation
    pub fn ret_values(&self, values: impl IntoIterator<Item = Value>) -> Step {
        Step::Jump(Jump::new(self.cc.clone(), values.into_iter().collect(), Kwargs::new()))
    }

    /// Tail-call `target`, forwarding the current continuation
    pub fn tail_call(&self, target: &Callable, args: impl IntoIterator<Item = Value>) -> Step {
        self.tail_call_kw(target, args, Kwargs::new())
    }

    /// Tail-call with keywords. An explicit `cc` keyword overrides forwarding;
    /// callables outside the convention get no continuation at all.
    pub fn tail_call_kw(
        &self,
        target: &Callable,
        args: impl IntoIterator<Item = Value>,
        mut kwargs: Kwargs,
    ) -> Step {
        if target.takes_cc() && !kwargs.contains(CC) && !self.cc.is_identity() {
            kwargs.insert(CC, self.cc.clone());
        }
        Step::Jump(Jump::new(target.clone(), args.into_iter().collect(), kwargs))
    }

    /// Capture the rest of this body as a continuation and tail-call `target`
    /// with it as `cc`.
    ///
    /// `remainder` is the rest of the body. It runs each time the captured
    /// continuation is invoked; the values it was invoked with are the
    /// remainder frame's positional arguments. Must be the body's result.
    pub fn capture<F>(
        &self,
        target: &Callable,
        args: impl IntoIterator<Item = Value>,
        remainder: F,
    ) -> Step
    where
        F: Fn(Frame) -> RuntimeResult<Step> + 'static,
    {
        self.capture_with(target, args, Kwargs::new(), Signature::variadic(), remainder)
    }

    /// [`Frame::capture`] with keywords for `target` and a declared signature
    /// for the values the remainder binds.
    pub fn capture_with<F>(
        &self,
        target: &Callable,
        args: impl IntoIterator<Item = Value>,
        mut kwargs: Kwargs,
        signature: Signature,
        remainder: F,
    ) -> Step
    where
        F: Fn(Frame) -> RuntimeResult<Step> + 'static,
    {
        // Captures made inside a remainder keep the enclosing function's name.
        let name = if self.callee.is_captured() {
            self.callee.name().to_string()
        } else {
            format!("{}_cont", self.callee.name())
        };
        trace!(
            target: "contrail::capture",
            site = self.callee.name(),
            callee = target.name(),
            has_parent = self.parent.is_some(),
            "capturing continuation"
        );
        let k = CapturedContinuation::callable(name, signature, self.parent.clone(), remainder);
        kwargs.insert(CC, k);
        Step::Jump(Jump::new(target.clone(), args.into_iter().collect(), kwargs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn probe() -> Callable {
        Callable::function("probe", Signature::variadic(), |_frame| Ok(Step::Done(Value::Nil)))
    }

    #[test]
    fn test_identity_entry_has_no_parent() {
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), Callable::identity());
        assert!(frame.parent().is_none());
        assert!(frame.cc().is_identity());
    }

    #[test]
    fn test_explicit_entry_continuation_is_recorded_as_parent() {
        let k = probe();
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), k.clone());
        assert!(frame.parent().is_some_and(|p| p.ptr_eq(&k)));
    }

    #[test]
    fn test_missing_argument_names_callee() {
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), Callable::identity());
        assert!(matches!(
            frame.arg(2),
            Err(RuntimeError::MissingArgument { ref target, index: 2 }) if target == "probe"
        ));
    }

    #[test]
    fn test_tail_call_forwards_cc_only_into_the_convention() {
        let k = probe();
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), k.clone());

        let Step::Jump(jump) = frame.tail_call(&probe(), [Value::Long(1)]) else {
            panic!("Expected a jump");
        };
        assert!(matches!(jump.kwargs().get(CC), Some(Value::Callable(c)) if c.ptr_eq(&k)));

        let plain = Callable::plain("plain", Signature::variadic(), |_, _| Ok(Value::Nil));
        let Step::Jump(jump) = frame.tail_call(&plain, []) else {
            panic!("Expected a jump");
        };
        assert!(!jump.kwargs().contains(CC));
    }

    #[test]
    fn test_explicit_cc_overrides_forwarding() {
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), probe());
        let other = probe();
        let Step::Jump(jump) =
            frame.tail_call_kw(&probe(), [], Kwargs::new().with(CC, other.clone()))
        else {
            panic!("Expected a jump");
        };
        assert!(matches!(jump.kwargs().get(CC), Some(Value::Callable(c)) if c.ptr_eq(&other)));
    }

    #[test]
    fn test_capture_passes_captured_continuation_as_cc() {
        let frame = Frame::enter(probe(), smallvec![], Kwargs::new(), Callable::identity());
        let Step::Jump(jump) = frame.capture(&probe(), [Value::Long(3)], |k| Ok(k.ret(Value::Nil)))
        else {
            panic!("Expected a jump");
        };
        assert_eq!(jump.target().name(), "probe");
        assert_eq!(jump.args(), &[Value::Long(3)]);
        match jump.kwargs().get(CC) {
            Some(Value::Callable(k)) => {
                assert!(k.is_captured());
                assert_eq!(k.name(), "probe_cont");
            }
            other => panic!("Expected captured continuation, got {:?}", other),
        }
    }
}
