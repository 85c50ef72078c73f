//! Continuation values injected into the jump protocol.
//!
//! - [`capture`](crate::backend::callable::Frame::capture): multi-shot
//!   continuations holding the rest of a function body;
//! - [`make_escape`]: single-shot exits bound to one dynamic extent.
//!
//! A captured continuation remembers the parent continuation of the frame that
//! created it. When its remainder finishes it returns to that parent, and if
//! it was invoked with an explicit `cc`, to that `cc` afterwards.

mod capture;
mod escape;

pub(crate) use capture::CapturedContinuation;
pub use escape::{make_escape, EscapeHandle, EscapePoint, EscapeSignal, EscapeState, EscapeTag};
