use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazy_mock_server::mock::{
    find_matching_route, render, CompiledRoute, MockRequest, Route, RouteStore,
};

fn create_test_route(id: usize, wildcard: bool) -> Route {
    let path = if wildcard {
        format!("/api/v*/endpoint{id}/*")
    } else {
        format!("/api/v1/endpoint{id}")
    };
    Route::new("GET", path)
        .with_status(200)
        .with_content_type("application/json")
        .with_response(r#"{"id": "{path}"}"#)
}

fn compile_routes(count: usize, wildcard: bool) -> Vec<CompiledRoute> {
    (0..count)
        .map(|i| CompiledRoute::compile(create_test_route(i, wildcard)))
        .collect()
}

fn bench_route_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_matching");

    for route_count in [10, 100, 1000].iter() {
        let routes = compile_routes(*route_count, false);
        let first = MockRequest::new("GET", "/api/v1/endpoint0", None);
        let last = MockRequest::new(
            "GET",
            &format!("/api/v1/endpoint{}", route_count - 1),
            None,
        );
        let none = MockRequest::new("GET", "/not/found", None);

        group.throughput(Throughput::Elements(1));
        let cases = [
            ("match_first", &first),
            ("match_last", &last),
            ("match_none", &none),
        ];
        for (name, request) in cases {
            group.bench_with_input(BenchmarkId::new(name, route_count), route_count, |b, _| {
                b.iter(|| find_matching_route(black_box(&routes), black_box(request)));
            });
        }
    }

    group.finish();
}

fn bench_wildcard_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("wildcard_matching");

    for route_count in [10, 100].iter() {
        let routes = compile_routes(*route_count, true);
        let request = MockRequest::new(
            "GET",
            &format!("/api/v2/endpoint{}/items/7", route_count / 2),
            None,
        );

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("wildcard_match", route_count),
            route_count,
            |b, _| {
                b.iter(|| find_matching_route(black_box(&routes), black_box(&request)));
            },
        );
    }

    group.finish();
}

fn bench_store_lookup_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_lookup_and_render");

    let routes: Vec<Route> = (0..100).map(|i| create_test_route(i, false)).collect();
    let store = RouteStore::with_routes(routes).unwrap();
    let request = MockRequest::from_uri("GET", "/api/v1/endpoint50?page=2");

    group.throughput(Throughput::Elements(1));
    group.bench_function("find_and_render", |b| {
        b.iter(|| {
            let (route, _) = store.find_matching_route(black_box(&request)).unwrap();
            render(&route, black_box(&request))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_route_matching,
    bench_wildcard_matching,
    bench_store_lookup_and_render
);
criterion_main!(benches);
