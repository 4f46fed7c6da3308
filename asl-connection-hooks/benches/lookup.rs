use asl_connection_hooks::NodeDirectory;
use criterion::{criterion_group, criterion_main, Criterion};
use std::io::Write;

fn bench_lookup(c: &mut Criterion) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "; generated directory").unwrap();
    for node in 2000..62000u32 {
        writeln!(file, "{}|N{}ABC|Op {}|Town {}, ST", node, node % 10, node, node).unwrap();
    }
    file.flush().unwrap();
    let dir = NodeDirectory::new(file.path());

    c.bench_function("lookup_first_row", |b| b.iter(|| dir.lookup(2000)));

    c.bench_function("lookup_last_row", |b| b.iter(|| dir.lookup(61999)));

    c.bench_function("lookup_miss_60k_rows", |b| b.iter(|| dir.lookup(1)));
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
