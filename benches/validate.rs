use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ordo::operation::feature_rule_operations;
use ordo::validate::{percent_ranges, validate_percent_ranges, validate_rule};
use ordo::{free_arg, Rule};

/// A flat compound rule with `n` distinct conditions cycling through the
/// common operations.
fn build_rule(n: usize) -> Rule {
    let mut rule = Rule::when(free_arg("model").is("MODEL-0"));
    for i in 1..n {
        let arg = free_arg(&format!("arg{i}"));
        let condition = match i % 4 {
            0 => arg.is(format!("V{i}")),
            1 => arg.like(&format!("^V{i}.*")),
            2 => arg.in_list(&format!("list-{i}")),
            _ => arg.one_of(vec!["A", "B", "C"]),
        };
        rule = if i % 2 == 0 {
            rule.and(condition)
        } else {
            rule.or(condition)
        };
    }
    rule
}

/// `n` adjacent ranges partitioning 0-100.
fn build_range_rule(n: usize) -> Rule {
    let step = 100.0 / n as f64;
    let range = |i: usize| format!("{}-{}", step * i as f64, step * (i + 1) as f64);
    let mut rule = Rule::when(free_arg("eStbMac").range(&range(0)));
    for i in 1..n {
        rule = rule.or(free_arg("eStbMac").range(&range(i)));
    }
    rule
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for &n in &[5_usize, 20, 50] {
        let rule = build_rule(n);
        group.bench_function(&format!("{n}_conditions"), |b| {
            b.iter(|| validate_rule(black_box(&rule), feature_rule_operations()));
        });

        let ranges = build_range_rule(n);
        group.bench_function(&format!("{n}_percent_ranges"), |b| {
            b.iter(|| {
                let parsed = percent_ranges(black_box(&ranges))?;
                validate_percent_ranges(&parsed)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
