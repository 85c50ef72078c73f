//! Escape continuations: single-shot, upward-only exits bound to one dynamic
//! extent.
//!
//! An escape is a [`RuntimeError::Escape`] carrying an [`EscapeSignal`]. It
//! unwinds through `?` like any other error until an [`EscapePoint`] that
//! matches it turns the signal back into a value.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::backend::callable::{Callable, CallableKind, Signature};
use crate::backend::errors::{RuntimeError, RuntimeResult};
use crate::backend::models::{collapse, Value, Values};

static NEXT_EXTENT: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of an [`EscapeHandle`]. A handle is armed from the moment it is
/// handed to its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeState {
    Armed,
    Fired,
    Expired,
}

impl fmt::Display for EscapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EscapeState::Armed => "armed",
            EscapeState::Fired => "fired",
            EscapeState::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Label routing an escape to a particular catch point
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EscapeTag {
    /// User-chosen label
    Name(String),
    /// The extent of one `make_escape` call
    Extent(u64),
}

impl From<&str> for EscapeTag {
    fn from(s: &str) -> Self {
        EscapeTag::Name(s.to_string())
    }
}

impl From<String> for EscapeTag {
    fn from(s: String) -> Self {
        EscapeTag::Name(s)
    }
}

impl fmt::Display for EscapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeTag::Name(name) => write!(f, "'{}'", name),
            EscapeTag::Extent(id) => write!(f, "extent #{}", id),
        }
    }
}

/// Values on their way to a catch point
#[derive(Debug, Clone)]
pub struct EscapeSignal {
    values: Values,
    tag: Option<EscapeTag>,
    allow_catchall: bool,
}

impl EscapeSignal {
    /// Untagged escape of a single value
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_values([value.into()])
    }

    pub fn with_values(values: impl IntoIterator<Item = Value>) -> Self {
        EscapeSignal {
            values: values.into_iter().collect(),
            tag: None,
            allow_catchall: true,
        }
    }

    pub fn tagged(mut self, tag: impl Into<EscapeTag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Refuse catch points that have no tags
    pub fn without_catchall(mut self) -> Self {
        self.allow_catchall = false;
        self
    }

    pub fn tag(&self) -> Option<&EscapeTag> {
        self.tag.as_ref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Start unwinding. Use as `return signal.raise()` or `signal.raise()?`.
    pub fn raise<T>(self) -> RuntimeResult<T> {
        Err(RuntimeError::Escape(self))
    }

    /// The value a catch point produces for this signal
    pub fn into_value(self) -> Value {
        collapse(self.values)
    }
}

impl fmt::Display for EscapeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "tag {}", tag)?,
            None => f.write_str("untagged")?,
        }
        write!(f, ", values [{}]", self.values.iter().join(", "))
    }
}

/// Catch point for escapes
#[derive(Debug, Clone)]
pub struct EscapePoint {
    tags: Option<Vec<EscapeTag>>,
    catch_untagged: bool,
}

impl EscapePoint {
    /// Catches untagged escapes and every tagged escape that allows catch-all
    pub fn catch_all() -> Self {
        EscapePoint {
            tags: None,
            catch_untagged: true,
        }
    }

    /// Catches escapes carrying one of `tags`, plus untagged ones
    pub fn tagged<T: Into<EscapeTag>>(tags: impl IntoIterator<Item = T>) -> Self {
        EscapePoint {
            tags: Some(tags.into_iter().map(Into::into).collect()),
            catch_untagged: true,
        }
    }

    pub fn catch_untagged(mut self, catch: bool) -> Self {
        self.catch_untagged = catch;
        self
    }

    pub fn catches(&self, signal: &EscapeSignal) -> bool {
        match (&self.tags, &signal.tag) {
            (None, _) if signal.allow_catchall => true,
            (_, None) => self.catch_untagged,
            (Some(tags), Some(tag)) => tags.contains(tag),
            (None, Some(_)) => false,
        }
    }

    /// Run `body`; a matching escape becomes its result, anything else passes
    /// through unchanged.
    pub fn run<F>(&self, body: F) -> RuntimeResult<Value>
    where
        F: FnOnce() -> RuntimeResult<Value>,
    {
        match body() {
            Err(RuntimeError::Escape(signal)) if self.catches(&signal) => {
                trace!(target: "contrail::escape", signal = %signal, "escape caught");
                Ok(signal.into_value())
            }
            other => other,
        }
    }
}

struct HandleInner {
    id: u64,
    state: Cell<EscapeState>,
}

/// Capability to exit one dynamic extent. Single-shot.
#[derive(Clone)]
pub struct EscapeHandle(Rc<HandleInner>);

impl EscapeHandle {
    fn arm() -> Self {
        EscapeHandle(Rc::new(HandleInner {
            id: NEXT_EXTENT.fetch_add(1, Ordering::Relaxed),
            state: Cell::new(EscapeState::Armed),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn state(&self) -> EscapeState {
        self.0.state.get()
    }

    pub fn name(&self) -> String {
        format!("ec#{}", self.0.id)
    }

    /// The handle as a callable, usable as `cc` or as a jump target
    pub fn callable(&self) -> Callable {
        Callable::from_kind(
            self.name(),
            Signature::variadic(),
            CallableKind::Escape(self.clone()),
        )
    }

    /// Exit the extent with `values`. Never returns `Ok`.
    pub fn invoke<T>(&self, values: Values) -> RuntimeResult<T> {
        match self.state() {
            EscapeState::Armed => {
                self.0.state.set(EscapeState::Fired);
                trace!(
                    target: "contrail::escape",
                    handle = %self.name(),
                    values = values.len(),
                    "escape fired"
                );
                EscapeSignal::with_values(values)
                    .tagged(EscapeTag::Extent(self.0.id))
                    .without_catchall()
                    .raise()
            }
            state => {
                debug!(
                    target: "contrail::escape",
                    handle = %self.name(),
                    %state,
                    "stale escape handle invoked"
                );
                Err(RuntimeError::StaleEscapeUse {
                    handle: self.name(),
                    state,
                })
            }
        }
    }

    /// Exit the extent with a single value
    pub fn escape<T>(&self, value: impl Into<Value>) -> RuntimeResult<T> {
        self.invoke(Values::from_elem(value.into(), 1))
    }

    fn close(&self) {
        self.0.state.set(EscapeState::Expired);
        trace!(target: "contrail::escape", handle = %self.name(), "extent closed");
    }
}

impl fmt::Debug for EscapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscapeHandle")
            .field("id", &self.0.id)
            .field("state", &self.state())
            .finish()
    }
}

struct ExtentGuard<'a>(&'a EscapeHandle);

impl Drop for ExtentGuard<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Run `scope` with a fresh escape handle. Invoking the handle inside the
/// scope makes its values the result; the handle expires when this returns,
/// normally, by escape, or by error.
pub fn make_escape<F>(scope: F) -> RuntimeResult<Value>
where
    F: FnOnce(&EscapeHandle) -> RuntimeResult<Value>,
{
    let handle = EscapeHandle::arm();
    let _guard = ExtentGuard(&handle);
    EscapePoint::tagged([EscapeTag::Extent(handle.id())])
        .catch_untagged(false)
        .run(|| scope(&handle))
}
