use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pooling::Pool;

const BUFFER_LEN: usize = 1024 * 1024;

fn rent_return(c: &mut Criterion) {
    c.bench_function("pool_rent_drop", |b| {
        let pool = Pool::with_clearer(
            || Vec::<u8>::with_capacity(BUFFER_LEN),
            |v: &mut Vec<u8>| v.clear(),
            64,
        );
        b.iter(|| {
            let obj = black_box(pool.rent().unwrap());
            black_box(obj.capacity())
        })
    });
    c.bench_function("pool_rent_detached", |b| {
        let pool = Pool::new(|| Vec::<u8>::with_capacity(BUFFER_LEN), 64);
        b.iter(|| {
            let obj = black_box(pool.rent_detached().unwrap());
            pool.return_item(obj).unwrap();
        })
    });
    c.bench_function("system", |b| {
        b.iter(|| {
            let obj = black_box(Vec::<u8>::with_capacity(BUFFER_LEN));
            black_box(obj.capacity())
        })
    });
}

criterion_group!(benches, rent_return);
criterion_main!(benches);
