// Criterion benchmarks for the filter evaluator

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use carquery::core::filters::{evaluate, matches_filters};
use carquery::models::{FilterSet, VehicleListing, VehicleQuery};

fn create_listing(id: usize) -> VehicleListing {
    let bodies = ["SUV", "Sedan", "Truck", "Coupe"];
    let makes = ["Toyota", "Honda", "Tesla", "Ford", "BMW", "Hyundai"];

    VehicleListing {
        id: id.to_string(),
        make: makes[id % makes.len()].to_string(),
        model: format!("Model {}", id),
        year: 2012 + (id % 12) as i32,
        price: 12000.0 + (id % 50) as f64 * 900.0,
        mileage: (id % 40) as f64 * 2500.0,
        fuel_type: "Gasoline".to_string(),
        body_type: bodies[id % bodies.len()].to_string(),
        color: "Silver".to_string(),
        location: "Seattle, WA".to_string(),
        image: format!("https://example.com/{}.jpg", id),
    }
}

fn create_filters() -> FilterSet {
    FilterSet {
        body_types: ["SUV".to_string(), "Truck".to_string()].into_iter().collect(),
        min_year: Some(2018),
        max_price: Some(40000.0),
        max_mileage: Some(60000.0),
        ..Default::default()
    }
}

fn bench_matches_filters(c: &mut Criterion) {
    let listing = create_listing(7);
    let filters = create_filters();

    c.bench_function("matches_filters", |b| {
        b.iter(|| matches_filters(black_box(&listing), black_box(&filters)));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let filters = create_filters();

    let mut group = c.benchmark_group("evaluate");

    for candidate_count in [10, 100, 1000, 10000].iter() {
        let candidates: Vec<VehicleListing> = (0..*candidate_count).map(create_listing).collect();

        group.bench_with_input(
            BenchmarkId::new("filtered", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| evaluate(black_box(candidates.clone()), black_box(&filters)));
            },
        );
    }

    group.finish();
}

fn bench_results_path(c: &mut Criterion) {
    let query = VehicleQuery::new("reliable family SUV under $35,000", create_filters());

    c.bench_function("results_path", |b| {
        b.iter(|| black_box(&query).results_path());
    });
}

criterion_group!(
    benches,
    bench_matches_filters,
    bench_evaluate,
    bench_results_path
);

criterion_main!(benches);
