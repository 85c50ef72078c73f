//! Nondeterministic choice over captured continuations.
//!
//! `amb` returns its first candidate and records the rest, together with its
//! own continuation, on a [`ChoiceStack`]. `fail` pops the most recent record
//! and resumes that continuation with the next candidate. Because stored
//! continuations are multi-shot, `fail` can be called after the search has
//! returned, from a fresh driver run, to produce the next solution.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::callable::{Callable, Frame, Signature};
use super::errors::{RuntimeError, RuntimeResult};
use super::models::{Kwargs, Value};
use super::trampoline::{Jump, Step};

/// Candidates not yet tried at one choice point
struct Alternative {
    remaining: VecDeque<Value>,
    cc: Callable,
}

type Alternatives = RefCell<Vec<Alternative>>;

/// Explicit backtracking stack shared by one `amb`/`fail` pair.
///
/// The callables hold the stack weakly, so continuations stored on it do not
/// keep it alive through a reference cycle.
#[derive(Default)]
pub struct ChoiceStack {
    alternatives: Rc<Alternatives>,
}

impl ChoiceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of choice points with candidates left
    pub fn len(&self) -> usize {
        self.alternatives.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.borrow().is_empty()
    }

    /// Drop every pending choice point
    pub fn cut(&self) {
        let dropped = std::mem::take(&mut *self.alternatives.borrow_mut());
        trace!(target: "contrail::choice", choice_points = dropped.len(), "cut");
    }

    /// The `amb` operator bound to this stack. Takes candidates positionally.
    pub fn amb(&self) -> Callable {
        let stack = Rc::downgrade(&self.alternatives);
        Callable::function("amb", Signature::variadic(), move |frame| {
            let stack = upgrade(&stack, "amb")?;
            let mut remaining = (0..frame.args().len())
                .map(|i| frame.arg(i))
                .collect::<RuntimeResult<VecDeque<Value>>>()?;
            let Some(first) = remaining.pop_front() else {
                trace!(target: "contrail::choice", "amb without candidates");
                return Ok(backtrack(&stack, &frame));
            };
            trace!(
                target: "contrail::choice",
                candidate = %first,
                remaining = remaining.len(),
                "amb"
            );
            if !remaining.is_empty() {
                stack.borrow_mut().push(Alternative {
                    remaining,
                    cc: frame.cc().clone(),
                });
            }
            Ok(frame.ret(first))
        })
    }

    /// The `fail` operator bound to this stack
    pub fn fail(&self) -> Callable {
        let stack = Rc::downgrade(&self.alternatives);
        Callable::function("fail", Signature::exact(0), move |frame| {
            let stack = upgrade(&stack, "fail")?;
            Ok(backtrack(&stack, &frame))
        })
    }
}

fn upgrade(stack: &Weak<Alternatives>, holder: &'static str) -> RuntimeResult<Rc<Alternatives>> {
    stack
        .upgrade()
        .ok_or(RuntimeError::ChoiceStackDropped(holder))
}

/// Resume the most recent choice point with its next candidate, or return
/// nil through the caller's continuation when none is left.
fn backtrack(stack: &Alternatives, frame: &Frame) -> Step {
    let mut alternatives = stack.borrow_mut();
    let Some(mut alt) = alternatives.pop() else {
        trace!(target: "contrail::choice", "choice stack exhausted");
        return frame.ret(Value::Nil);
    };
    // Only choice points with candidates left are ever pushed.
    let next = alt.remaining.pop_front().unwrap_or(Value::Nil);
    trace!(
        target: "contrail::choice",
        candidate = %next,
        remaining = alt.remaining.len(),
        depth = alternatives.len(),
        "backtrack"
    );
    let cc = alt.cc.clone();
    if !alt.remaining.is_empty() {
        alternatives.push(alt);
    }
    Step::Jump(Jump::new(cc, std::iter::once(next).collect(), Kwargs::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // c1 = amb(1, 2, 3); c2 = amb(10, 20); c1 + c2
    fn sums(choices: &ChoiceStack) -> Callable {
        let amb = choices.amb();
        Callable::function("sums", Signature::exact(0), move |frame| {
            let inner = amb.clone();
            Ok(frame.capture(&amb, [Value::Long(1), Value::Long(2), Value::Long(3)], move |k| {
                let c1 = k.arg(0)?.as_long()?;
                Ok(k.capture(&inner, [Value::Long(10), Value::Long(20)], move |k2| {
                    let c2 = k2.arg(0)?.as_long()?;
                    Ok(k2.ret(c1 + c2))
                }))
            }))
        })
    }

    #[test]
    fn test_fail_outside_the_search_yields_next_solution() {
        let choices = ChoiceStack::new();
        let fail = choices.fail();
        assert_eq!(sums(&choices).call([]).unwrap(), Value::Long(11));
        for expected in [21, 12, 22, 13, 23] {
            assert_eq!(fail.call([]).unwrap(), Value::Long(expected));
        }
        assert!(choices.is_empty());
        assert_eq!(fail.call([]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_single_candidate_leaves_no_choice_point() {
        let choices = ChoiceStack::new();
        assert_eq!(choices.amb().call([Value::Long(5)]).unwrap(), Value::Long(5));
        assert!(choices.is_empty());
        assert_eq!(choices.amb().call([Value::Long(5), Value::Long(6)]).unwrap(), Value::Long(5));
        assert_eq!(choices.len(), 1);
    }

    #[test]
    fn test_amb_without_candidates_fails() {
        let choices = ChoiceStack::new();
        assert_eq!(choices.amb().call([]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_cut_discards_alternatives() {
        let choices = ChoiceStack::new();
        assert_eq!(sums(&choices).call([]).unwrap(), Value::Long(11));
        assert_eq!(choices.len(), 2);
        choices.cut();
        assert_eq!(choices.fail().call([]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_dropped_stack_is_reported() {
        let choices = ChoiceStack::new();
        let fail = choices.fail();
        drop(choices);
        assert!(matches!(
            fail.call([]),
            Err(RuntimeError::ChoiceStackDropped("fail"))
        ));
    }
}
