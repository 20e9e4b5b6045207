use colmap::{MatchingCache, Record, StatementConfig, Statements, values};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

#[derive(Debug, Default, Record)]
pub struct Enclosure {
    #[colmap(",readonly")]
    pub id: i64,
    pub habitat_name: String,
    pub area_sq_m: f64,
    pub keeper_id: Option<i64>,
    pub has_water_feature: bool,
    pub climate_zone: String,
    pub capacity: i32,
    #[colmap("opened_on,readonly")]
    pub opened: String,
}

fn enclosure() -> Enclosure {
    Enclosure {
        habitat_name: "savanna".into(),
        area_sq_m: 1200.0,
        keeper_id: Some(4),
        capacity: 12,
        ..Enclosure::default()
    }
}

fn bench_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("statements/cached");
    let stmts = Statements::new(StatementConfig::new().numbered_placeholders(true));
    let record = enclosure();

    group.bench_function("select", |b| {
        b.iter(|| black_box(stmts.select::<Enclosure>("enclosure")));
    });
    group.bench_function("insert", |b| {
        b.iter(|| black_box(stmts.insert::<Enclosure>("enclosure")));
    });
    group.bench_function("update", |b| {
        b.iter(|| black_box(stmts.update("enclosure", &record).map(|q| q.params().len())));
    });
    group.bench_function("values", |b| {
        b.iter(|| black_box(values(&record).map(|v| v.len())));
    });

    group.finish();
}

fn bench_cold_matching(c: &mut Criterion) {
    c.bench_function("statements/cold_matching", |b| {
        b.iter(|| {
            let cache = MatchingCache::new();
            black_box(cache.resolve::<Enclosure>().map(|m| m.columns().len()))
        });
    });
}

criterion_group!(benches, bench_cached, bench_cold_matching);
criterion_main!(benches);
