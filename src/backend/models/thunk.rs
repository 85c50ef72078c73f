//! Lazily-forced argument values.
//!
//! A thunk evaluates its computation at most once. Its outcome, success or
//! failure, is memoized, so every later force observes the same result.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::backend::errors::{RuntimeError, RuntimeResult};

type Computation = Box<dyn FnOnce() -> RuntimeResult<Value>>;

enum ThunkState {
    Pending(Computation),
    Forcing,
    Done(RuntimeResult<Value>),
}

#[derive(Clone)]
pub struct Thunk(Rc<RefCell<ThunkState>>);

impl Thunk {
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> RuntimeResult<Value> + 'static,
    {
        Thunk(Rc::new(RefCell::new(ThunkState::Pending(Box::new(computation)))))
    }

    /// A thunk that is already evaluated
    pub fn ready(value: Value) -> Self {
        Thunk(Rc::new(RefCell::new(ThunkState::Done(Ok(value)))))
    }

    pub fn is_forced(&self) -> bool {
        matches!(&*self.0.borrow(), ThunkState::Done(_))
    }

    pub fn force(&self) -> RuntimeResult<Value> {
        let state = std::mem::replace(&mut *self.0.borrow_mut(), ThunkState::Forcing);
        match state {
            ThunkState::Done(result) => {
                *self.0.borrow_mut() = ThunkState::Done(result.clone());
                result
            }
            ThunkState::Forcing => Err(RuntimeError::ReentrantThunk),
            ThunkState::Pending(computation) => {
                // The borrow is released while the computation runs, so it may
                // force other thunks (or detect itself as re-entrant).
                let result = computation().and_then(Value::force);
                *self.0.borrow_mut() = ThunkState::Done(result.clone());
                result
            }
        }
    }

    pub fn ptr_eq(&self, other: &Thunk) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Thunk {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.borrow() {
            ThunkState::Pending(_) => write!(f, "Thunk(<pending>)"),
            ThunkState::Forcing => write!(f, "Thunk(<forcing>)"),
            ThunkState::Done(Ok(v)) => write!(f, "Thunk({:?})", v),
            ThunkState::Done(Err(e)) => write!(f, "Thunk(<failed: {}>)", e),
        }
    }
}

impl fmt::Display for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.borrow() {
            ThunkState::Done(Ok(v)) => write!(f, "{}", v),
            _ => write!(f, "<thunk>"),
        }
    }
}
