// Runtime for trampolined tail calls and delimited continuations
//
// - `trampoline`: the driver loop and the `Jump`/`Step` protocol
// - `callable`: invocation targets, signatures and activation frames
// - `continuation`: captured (multi-shot) and escape (single-shot) continuations
// - `nondeterminism`: amb/fail backtracking over captured continuations

pub mod callable;
pub mod config;
pub mod continuation;
pub mod environment;
pub mod errors;
pub mod models;
pub mod nondeterminism;
pub mod trampoline;

pub use callable::{Arity, Callable, Frame, Signature};
pub use config::{ArgumentMode, ConfigError, RuntimeConfig};
pub use continuation::{
    make_escape, EscapeHandle, EscapePoint, EscapeSignal, EscapeState, EscapeTag,
};
pub use environment::Environment;
pub use errors::{RuntimeError, RuntimeResult};
pub use models::*;
pub use nondeterminism::ChoiceStack;
pub use trampoline::{make_jump, run_trampoline, Jump, Step, Trampoline};
