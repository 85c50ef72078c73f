//! Trampoline Types
//!
//! These types let callable bodies hand the next call back to the driver
//! instead of performing it on the host stack.

use crate::backend::callable::Callable;
use crate::backend::errors::RuntimeResult;
use crate::backend::models::{Kwargs, Value, Values, CC};

/// Deferred invocation: target plus the arguments to call it with
#[derive(Debug, Clone)]
#[must_use = "a jump does nothing unless it is returned to the trampoline"]
pub struct Jump {
    target: Callable,
    args: Values,
    kwargs: Kwargs,
}

impl Jump {
    pub fn new(target: Callable, args: Values, kwargs: Kwargs) -> Self {
        Jump {
            target,
            args,
            kwargs,
        }
    }

    pub fn target(&self) -> &Callable {
        &self.target
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn into_parts(self) -> (Callable, Values, Kwargs) {
        (self.target, self.args, self.kwargs)
    }

    /// Force every thunk argument except the continuation (eager mode)
    pub(crate) fn force_arguments(&mut self) -> RuntimeResult<()> {
        for arg in self.args.iter_mut() {
            if matches!(arg, Value::Thunk(_)) {
                *arg = std::mem::replace(arg, Value::Nil).force()?;
            }
        }
        for (name, arg) in self.kwargs.values_mut() {
            if name != CC && matches!(arg, Value::Thunk(_)) {
                *arg = std::mem::replace(arg, Value::Nil).force()?;
            }
        }
        Ok(())
    }
}

/// Outcome of one hop
#[derive(Debug, Clone)]
#[must_use = "a step must be returned to the trampoline"]
pub enum Step {
    /// Final value of the whole run
    Done(Value),
    /// Tail call for the driver to perform next
    Jump(Jump),
}

impl Step {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
}
