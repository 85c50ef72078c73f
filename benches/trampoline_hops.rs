//! Driver throughput benchmarks
//!
//! Targets: tail-call hops, capture round trips, amb/fail backtracking
//!
//! Run with:
//!   cargo bench --bench trampoline_hops

use std::time::Duration;

use contrail::backend::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn countdown() -> Callable {
    Callable::function("countdown", Signature::exact(1), |frame| {
        let n = frame.arg(0)?.as_long()?;
        if n == 0 {
            return Ok(frame.ret(Value::Nil));
        }
        Ok(frame.tail_call(frame.callee(), [Value::Long(n - 1)]))
    })
}

fn bench_tail_hops(c: &mut Criterion) {
    let mut group = c.benchmark_group("tail_hops");
    let f = countdown();
    for depth in [1_000i64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| f.call([Value::Long(black_box(depth))]))
        });
    }
    group.finish();
}

fn bench_capture_round_trip(c: &mut Criterion) {
    let answer = Callable::function("answer", Signature::exact(0), |frame| Ok(frame.ret(1i64)));
    let f = Callable::function("f", Signature::exact(0), move |frame| {
        Ok(frame.capture(&answer, [], |k| {
            let v = k.arg(0)?;
            Ok(k.ret(v))
        }))
    });
    c.bench_function("capture_round_trip", |b| b.iter(|| f.call([])));
}

fn bench_escape(c: &mut Criterion) {
    let walk = Callable::function("walk", Signature::exact(2), |frame| {
        let ec = frame.arg(0)?;
        let n = frame.arg(1)?.as_long()?;
        if n == 0 {
            return Ok(frame.tail_call(ec.as_callable()?, [Value::Long(n)]));
        }
        Ok(frame.tail_call(frame.callee(), [ec, Value::Long(n - 1)]))
    });
    let tramp = Trampoline::default();
    c.bench_function("escape_after_1000_hops", |b| {
        b.iter(|| tramp.call_with_escape(&walk, [Value::Long(black_box(1000))]))
    });
}

fn bench_backtracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("amb_fail");
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("pairs_summing_to_target", |b| {
        b.iter(|| {
            let choices = ChoiceStack::new();
            let (amb, fail) = (choices.amb(), choices.fail());
            let candidates: Vec<Value> = (1..=50).map(Value::Long).collect();
            let search = Callable::function("search", Signature::exact(0), move |frame| {
                let (amb2, fail2, inner) = (amb.clone(), fail.clone(), candidates.clone());
                Ok(frame.capture(&amb, candidates.clone(), move |k| {
                    let a = k.arg(0)?.as_long()?;
                    let fail3 = fail2.clone();
                    Ok(k.capture(&amb2, inner.clone(), move |k| {
                        let b = k.arg(0)?.as_long()?;
                        if a + b != 99 {
                            return Ok(k.tail_call(&fail3, []));
                        }
                        Ok(k.ret(Value::tuple([a, b])))
                    }))
                }))
            });
            search.call([])
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_tail_hops,
    bench_capture_round_trip,
    bench_escape,
    bench_backtracking
);
criterion_main!(benches);
