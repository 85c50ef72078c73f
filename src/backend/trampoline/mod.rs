//! Trampoline-based Tail Calls
//!
//! A chain of tail calls is expressed as a sequence of [`Jump`] values that the
//! driver loop performs one at a time, so the host stack never grows with the
//! length of the chain.

mod engine;
mod types;

pub use engine::{make_jump, run_trampoline, Trampoline};
pub use types::{Jump, Step};
