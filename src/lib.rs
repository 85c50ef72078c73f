//! Contrail - trampolined tail calls and delimited continuations
//!
//! Functions that opt into the continuation convention receive a [`Frame`]
//! and return a [`Step`]: either a final value or a [`Jump`] describing the
//! next call. The driver performs jumps in a loop, so arbitrarily long chains
//! of tail calls run in constant host stack.
//!
//! # Architecture
//!
//! 1. **Driver** (`backend::trampoline`)
//!    - Performs one call per hop until a non-jump value appears
//!    - Forces thunk arguments first unless configured as deferred
//!
//! 2. **Continuation convention** (`backend::callable`)
//!    - Every participating function takes a trailing `cc` keyword
//!    - Returning a value means jumping to `cc`
//!    - Tail calls forward `cc` to targets that accept it
//!
//! 3. **Continuations** (`backend::continuation`)
//!    - `Frame::capture`: the rest of a body as a multi-shot callable
//!    - `make_escape`: a single-shot exit from one dynamic extent
//!
//! # Example
//!
//! ```rust
//! use contrail::backend::*;
//!
//! let even = Callable::function("even", Signature::exact(1), |frame| {
//!     let n = frame.arg(0)?.as_long()?;
//!     if n == 0 {
//!         return Ok(frame.ret(true));
//!     }
//!     let odd = Callable::function("odd", Signature::exact(1), |frame| {
//!         let n = frame.arg(0)?.as_long()?;
//!         Ok(frame.ret(n % 2 == 1))
//!     });
//!     Ok(frame.tail_call(&odd, [Value::Long(n - 1)]))
//! });
//!
//! assert_eq!(even.call([Value::Long(7)]).unwrap(), Value::Bool(false));
//! ```
//!
//! # Escapes
//!
//! ```rust
//! use contrail::backend::*;
//!
//! let result = make_escape(|ec| {
//!     ec.escape::<Value>(42i64)?;
//!     Ok(Value::Nil)
//! });
//! assert_eq!(result.unwrap(), Value::Long(42));
//! ```

pub mod backend;
pub mod logging;

pub use backend::{
    make_escape, make_jump, run_trampoline, Callable, ChoiceStack, Environment, Frame, Jump,
    RuntimeConfig, RuntimeError, RuntimeResult, Signature, Step, Trampoline, Value,
};
