//! Shared builders for the integration suites
//!
//! - mutually recursive functions bound through an [`Environment`]
//! - the amb/fail Pythagorean triple search in two loop orders
//! - helpers for draining a search with `fail`

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

pub use contrail::backend::*;

pub fn init() {
    contrail::logging::init_tracing();
}

/// `even` and `odd`, each finding the other through `env` at call time
pub fn even_odd(env: &Environment) -> (Callable, Callable) {
    let lookup = env.clone();
    let even = Callable::function("even", Signature::exact(1), move |frame| {
        let n = frame.arg(0)?.as_long()?;
        if n == 0 {
            return Ok(frame.ret(true));
        }
        let odd = lookup.require("odd")?;
        Ok(frame.tail_call(odd.as_callable()?, [Value::Long(n - 1)]))
    });
    let lookup = env.clone();
    let odd = Callable::function("odd", Signature::exact(1), move |frame| {
        let n = frame.arg(0)?.as_long()?;
        if n == 0 {
            return Ok(frame.ret(false));
        }
        let even = lookup.require("even")?;
        Ok(frame.tail_call(even.as_callable()?, [Value::Long(n - 1)]))
    });
    env.set("even", even.clone());
    env.set("odd", odd.clone());
    (even, odd)
}

/// Loop nesting for the triple search
#[derive(Debug, Clone, Copy)]
pub enum SearchOrder {
    /// x outermost: x in 1..=n, y in x..=n, z in y..=n
    XMajor,
    /// z outermost: z in 1..=n, y in 1..=z, x in 1..=y
    ZMajor,
}

fn range(lo: i64, hi: i64) -> Vec<Value> {
    (lo..=hi).map(Value::Long).collect()
}

/// Search for x² + y² = z² with amb, failing on every non-solution.
/// `tested` counts the combinations that reached the check.
pub fn pythagorean(
    choices: &ChoiceStack,
    max: i64,
    order: SearchOrder,
    tested: Rc<Cell<usize>>,
) -> Callable {
    let amb = choices.amb();
    let fail = choices.fail();
    Callable::function("pt", Signature::exact(0), move |frame| {
        let (amb1, fail1, tested1) = (amb.clone(), fail.clone(), tested.clone());
        Ok(frame.capture(&amb, range(1, max), move |k| {
            let a = k.arg(0)?.as_long()?;
            let (amb2, fail2, tested2) = (amb1.clone(), fail1.clone(), tested1.clone());
            let second = match order {
                SearchOrder::XMajor => range(a, max),
                SearchOrder::ZMajor => range(1, a),
            };
            Ok(k.capture(&amb1, second, move |k| {
                let b = k.arg(0)?.as_long()?;
                let (fail3, tested3) = (fail2.clone(), tested2.clone());
                let third = match order {
                    SearchOrder::XMajor => range(b, max),
                    SearchOrder::ZMajor => range(1, b),
                };
                Ok(k.capture(&amb2, third, move |k| {
                    let c = k.arg(0)?.as_long()?;
                    tested3.set(tested3.get() + 1);
                    let (x, y, z) = match order {
                        SearchOrder::XMajor => (a, b, c),
                        SearchOrder::ZMajor => (c, b, a),
                    };
                    if x * x + y * y != z * z {
                        return Ok(k.tail_call(&fail3, []));
                    }
                    Ok(k.ret(Value::tuple([x, y, z])))
                }))
            }))
        }))
    })
}

/// Run `search`, then call `fail` until it yields nil
pub fn drain(search: &Callable, fail: &Callable) -> RuntimeResult<Vec<Value>> {
    let mut out = Vec::new();
    let mut next = search.call([])?;
    while !next.is_nil() {
        out.push(next);
        next = fail.call([])?;
    }
    Ok(out)
}

/// Reference triples from plain nested loops, z outermost
pub fn reference_triples(max: i64) -> Vec<Value> {
    let mut out = Vec::new();
    for z in 1..=max {
        for y in 1..=z {
            for x in 1..=y {
                if x * x + y * y == z * z {
                    out.push(Value::tuple([x, y, z]));
                }
            }
        }
    }
    out
}

pub fn triple(x: i64, y: i64, z: i64) -> Value {
    Value::tuple([x, y, z])
}
