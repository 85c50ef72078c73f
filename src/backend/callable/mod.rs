//! Invocable values.
//!
//! A [`Callable`] is a named, reference-counted invocation target with a
//! declared [`Signature`]. Kinds:
//!
//! - **function**: takes part in the continuation convention. Its body receives
//!   a [`Frame`] and returns a [`Step`]: a final value or a tail [`Jump`].
//! - **plain**: an ordinary host function; its return value ends the chain.
//! - **identity**, **captured**, **chained**, **escape**: the continuation
//!   variants (see [`crate::backend::continuation`]).
//!
//! Every invocation performed by the driver goes through [`Callable::invoke`],
//! which is where argument count and keyword shape are checked.

mod frame;
mod signature;

pub use frame::Frame;
pub use signature::{Arity, Signature};

use std::fmt;
use std::rc::Rc;

use crate::backend::continuation::{CapturedContinuation, EscapeHandle};
use crate::backend::errors::{RuntimeError, RuntimeResult};
use crate::backend::models::{collapse, Kwargs, Value, Values, CC};
use crate::backend::trampoline::{Jump, Step, Trampoline};

/// Body of a participating function
pub type Body = dyn Fn(Frame) -> RuntimeResult<Step>;

/// Body of an ordinary (non-participating) function
pub type PlainBody = dyn Fn(&[Value], &Kwargs) -> RuntimeResult<Value>;

pub(crate) enum CallableKind {
    Function(Box<Body>),
    Plain(Box<PlainBody>),
    Identity,
    Captured(CapturedContinuation),
    /// Run `first`, then continue with `then`
    Chained { first: Callable, then: Callable },
    Escape(EscapeHandle),
}

struct CallableInner {
    name: String,
    signature: Signature,
    kind: CallableKind,
}

#[derive(Clone)]
pub struct Callable(Rc<CallableInner>);

impl Callable {
    pub(crate) fn from_kind(
        name: impl Into<String>,
        signature: Signature,
        kind: CallableKind,
    ) -> Self {
        Callable(Rc::new(CallableInner {
            name: name.into(),
            signature,
            kind,
        }))
    }

    /// A function following the continuation convention
    pub fn function<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(Frame) -> RuntimeResult<Step> + 'static,
    {
        Self::from_kind(name, signature, CallableKind::Function(Box::new(body)))
    }

    /// An ordinary function. Reached through a jump, its result ends the chain.
    pub fn plain<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value], &Kwargs) -> RuntimeResult<Value> + 'static,
    {
        Self::from_kind(name, signature, CallableKind::Plain(Box::new(body)))
    }

    /// The default continuation: returns its arguments, a single one bare
    pub fn identity() -> Self {
        thread_local! {
            static IDENTITY: Callable =
                Callable::from_kind("identity", Signature::variadic(), CallableKind::Identity);
        }
        IDENTITY.with(Callable::clone)
    }

    /// Compose a frame's parent continuation with an explicitly supplied one.
    ///
    /// Chains nest to the right: the head of a chained continuation is never
    /// itself a chain, so `then` is always reached through a `cc` or a jump.
    pub(crate) fn chain(first: Option<&Callable>, then: Callable) -> Callable {
        match first {
            None => then,
            Some(first) if then.is_identity() => first.clone(),
            Some(first) => match &first.0.kind {
                CallableKind::Chained { first: head, then: rest } => {
                    Self::link(head.clone(), Self::chain(Some(rest), then))
                }
                _ => Self::link(first.clone(), then),
            },
        }
    }

    fn link(first: Callable, then: Callable) -> Callable {
        Self::from_kind(
            format!("{}>{}", first.name(), then.name()),
            Signature::variadic(),
            CallableKind::Chained { first, then },
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn signature(&self) -> &Signature {
        &self.0.signature
    }

    /// Whether this callable accepts the `cc` keyword
    pub fn takes_cc(&self) -> bool {
        matches!(
            self.0.kind,
            CallableKind::Function(_) | CallableKind::Captured(_)
        )
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.0.kind, CallableKind::Identity)
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.0.kind, CallableKind::Captured(_))
    }

    /// Parent continuation recorded when this continuation was captured
    pub fn captured_parent(&self) -> Option<&Callable> {
        match &self.0.kind {
            CallableKind::Captured(k) => k.parent(),
            _ => None,
        }
    }

    pub fn as_escape(&self) -> Option<&EscapeHandle> {
        match &self.0.kind {
            CallableKind::Escape(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Perform one hop: check the call shape, then run the target once.
    pub fn invoke(&self, args: Values, mut kwargs: Kwargs) -> RuntimeResult<Step> {
        let cc = if self.takes_cc() {
            match kwargs.remove(CC) {
                Some(Value::Callable(cc)) => Some(cc),
                Some(other) => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "callable continuation",
                        found: format!("{} {}", other.type_name(), other),
                    })
                }
                None => None,
            }
        } else {
            None
        };
        self.0.signature.check(self.name(), args.len(), &kwargs)?;

        match &self.0.kind {
            CallableKind::Function(body) => {
                let cc = cc.unwrap_or_else(Callable::identity);
                body(Frame::enter(self.clone(), args, kwargs, cc))
            }
            CallableKind::Captured(k) => k.resume(self, args, kwargs, cc),
            CallableKind::Plain(body) => body(&args, &kwargs).map(Step::Done),
            CallableKind::Identity => Ok(Step::Done(collapse(args))),
            CallableKind::Chained { first, then } => {
                if first.takes_cc() {
                    kwargs.insert(CC, then.clone());
                    Ok(Step::Jump(Jump::new(first.clone(), args, kwargs)))
                } else {
                    // Outside the convention: apply as an ordinary call and
                    // hand its result on.
                    match first.invoke(args, kwargs)? {
                        Step::Done(value) => Ok(Step::Jump(Jump::new(
                            then.clone(),
                            Values::from_elem(value, 1),
                            Kwargs::new(),
                        ))),
                        step => Ok(step),
                    }
                }
            }
            CallableKind::Escape(handle) => handle.invoke(args),
        }
    }

    /// Drive this callable to completion from host code (the "trampolined
    /// function" entry point).
    pub fn call(&self, args: impl IntoIterator<Item = Value>) -> RuntimeResult<Value> {
        Trampoline::default().run(self, args, Kwargs::new())
    }

    pub fn call_kw(
        &self,
        args: impl IntoIterator<Item = Value>,
        kwargs: Kwargs,
    ) -> RuntimeResult<Value> {
        Trampoline::default().run(self, args, kwargs)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.0.kind {
            CallableKind::Function(_) => "function",
            CallableKind::Plain(_) => "plain",
            CallableKind::Identity => "identity",
            CallableKind::Captured(_) => "captured",
            CallableKind::Chained { .. } => "chained",
            CallableKind::Escape(_) => "escape",
        };
        write!(f, "Callable({} {})", kind, self.0.name)
    }
}
