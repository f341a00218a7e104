use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use schemsim::*;

/// One source followed by `size` resistors wired head to tail
fn resistor_chain(size: usize) -> Schematic {
    let mut schematic = Schematic::new();
    let mut previous = schematic.add_component(ComponentKind::VoltageSource, 0, 0).id;

    for i in 0..size {
        let x = ((i % 20) as i32 + 1) * 120;
        let y = (i / 20) as i32 * 120;
        let resistor = schematic.add_component(ComponentKind::Resistor, x, y).id;
        schematic.add_connection(previous, 1, resistor, 0).unwrap();
        previous = resistor;
    }
    schematic
}

fn bench_simple_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_circuit");
    let schematic = resistor_chain(3);

    group.bench_function("build_netlist", |b| {
        b.iter(|| schematic.build_netlist());
    });

    group.bench_function("simulate", |b| {
        b.iter(|| schematic.simulate());
    });

    group.finish();
}

fn bench_chain_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("resistor_chain");

    for size in [10, 50, 100, 200].iter() {
        let schematic = resistor_chain(*size);
        group.bench_with_input(BenchmarkId::new("simulate", size), size, |b, _| {
            b.iter(|| schematic.simulate());
        });
    }

    group.finish();
}

fn bench_hit_testing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_testing");
    let schematic = resistor_chain(200);

    group.bench_function("find_terminal_at_miss", |b| {
        b.iter(|| schematic.find_terminal_at(Point::new(-500, -500), None));
    });

    group.bench_function("find_component_at_bottom", |b| {
        b.iter(|| schematic.find_component_at(Point::new(0, 0)));
    });

    group.finish();
}

criterion_group!(benches, bench_simple_circuit, bench_chain_sizes, bench_hit_testing);
criterion_main!(benches);
