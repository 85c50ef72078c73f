//! Trampoline Engine
//!
//! The driver loop: invoke the current jump's target, and if the outcome is
//! another jump, perform that one next. Host stack usage is constant in the
//! number of hops.

use smallvec::smallvec;
use tracing::{debug, trace};

use super::types::{Jump, Step};
use crate::backend::callable::Callable;
use crate::backend::config::{ArgumentMode, RuntimeConfig};
use crate::backend::continuation::make_escape;
use crate::backend::errors::{RuntimeError, RuntimeResult};
use crate::backend::models::{Kwargs, Value, Values};

/// A configured driver. The argument mode holds for the whole extent of each
/// [`Trampoline::run`] call.
#[derive(Debug, Clone, Default)]
pub struct Trampoline {
    config: RuntimeConfig,
}

impl Trampoline {
    pub fn new(config: RuntimeConfig) -> Self {
        Trampoline { config }
    }

    /// Driver that passes thunk arguments through unforced
    pub fn deferred() -> Self {
        Self::new(RuntimeConfig {
            argument_mode: ArgumentMode::Deferred,
            ..RuntimeConfig::default()
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run `entry` and every jump it produces until a final value appears.
    pub fn run(
        &self,
        entry: &Callable,
        args: impl IntoIterator<Item = Value>,
        kwargs: Kwargs,
    ) -> RuntimeResult<Value> {
        let mode = self.config.argument_mode;
        let interval = self.config.hop_log_interval;
        let mut jump = Jump::new(entry.clone(), args.into_iter().collect(), kwargs);
        let mut hops: u64 = 0;

        loop {
            if mode == ArgumentMode::Eager {
                jump.force_arguments()?;
            }
            trace!(
                target: "contrail::trampoline",
                callee = jump.target().name(),
                args = jump.args().len(),
                hops,
                "hop"
            );
            if interval > 0 && hops > 0 && hops % interval == 0 {
                debug!(
                    target: "contrail::trampoline",
                    entry = entry.name(),
                    current = jump.target().name(),
                    hops,
                    "trampoline progress"
                );
            }

            let (target, args, kwargs) = jump.into_parts();
            match target.invoke(args, kwargs) {
                Ok(Step::Done(value)) => {
                    debug!(
                        target: "contrail::trampoline",
                        entry = entry.name(),
                        hops,
                        "trampoline settled"
                    );
                    return Ok(value);
                }
                Ok(Step::Jump(next)) => {
                    jump = next;
                    hops += 1;
                }
                Err(err) => {
                    if !matches!(err, RuntimeError::Escape(_)) {
                        debug!(
                            target: "contrail::trampoline",
                            entry = entry.name(),
                            failed = target.name(),
                            hops,
                            error = %err,
                            "trampoline aborted"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Call/ec: run `f` with a fresh escape handle prepended to `args`.
    /// Firing the handle makes its values the result of this call.
    pub fn call_with_escape(
        &self,
        f: &Callable,
        args: impl IntoIterator<Item = Value>,
    ) -> RuntimeResult<Value> {
        make_escape(|ec| {
            let mut all: Values = smallvec![Value::Callable(ec.callable())];
            all.extend(args);
            self.run(f, all, Kwargs::new())
        })
    }
}

/// Drive `entry` with the default configuration.
pub fn run_trampoline(
    entry: &Callable,
    args: impl IntoIterator<Item = Value>,
    kwargs: Kwargs,
) -> RuntimeResult<Value> {
    Trampoline::default().run(entry, args, kwargs)
}

/// Build a deferred call for the driver to perform.
pub fn make_jump(target: &Callable, args: impl IntoIterator<Item = Value>, kwargs: Kwargs) -> Jump {
    Jump::new(target.clone(), args.into_iter().collect(), kwargs)
}
