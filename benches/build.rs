use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use policy_chart::simplify::simplify;
use policy_chart::tree::build;
use policy_chart::{
    ChartOptions, Policy, PolicySetBuilder, check, decision_chart, policies_expression,
    policy_flow_chart,
};

/// `n` role-gated policies sharing the same ban, ownership and membership
/// checks, behind a bypass for admins.
fn build_policies(n: usize) -> Vec<Policy> {
    let mut builder =
        PolicySetBuilder::new().bypass(|p| p.condition(check("admin")).authorize_if(check("always")));
    for i in 0..n {
        builder = builder.policy(move |p| {
            p.condition(check("role").param("name", format!("r{i}")))
                .forbid_if(check("banned"))
                .authorize_if(check("owner"))
                .authorize_if(check("member"))
        });
    }
    builder.build()
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");

    for &n in &[4, 16, 64] {
        let expr = policies_expression(&build_policies(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &expr, |b, expr| {
            b.iter(|| simplify(black_box(expr)));
        });
    }

    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision_tree");

    for &n in &[4, 8, 16] {
        let expr = simplify(&policies_expression(&build_policies(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &expr, |b, expr| {
            b.iter(|| build(black_box(expr)));
        });
    }

    group.finish();
}

fn bench_charts(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");
    let options = ChartOptions::default();

    for &n in &[4, 8, 16] {
        let policies = build_policies(n);
        group.bench_function(format!("{n}_policies_decision"), |b| {
            b.iter(|| decision_chart(black_box(&policies), &options).to_string());
        });
        group.bench_function(format!("{n}_policies_flow"), |b| {
            b.iter(|| policy_flow_chart(black_box(&policies), &options).to_string());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simplify, bench_tree, bench_charts);
criterion_main!(benches);
