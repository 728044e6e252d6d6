//! Performance benchmarks for the listing pipeline.
//!
//! These benchmarks measure the hot paths of a listing request:
//! - Wildcard pattern matching
//! - Filtering, sorting and pagination of scanned entries
//! - A full scan of a populated directory

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use explorer::files::patterns::{PatternLists, PatternSet};
use explorer::files::pipeline::{self, ListingQuery, SortMode};
use explorer::files::Entry;
use explorer::protocol::messages::ListingRequest;
use explorer::FileExplorer;
use tempfile::TempDir;

fn synthetic_entries(count: usize) -> Vec<Entry> {
    let extensions = ["txt", "log", "md", "ipk", "tar.gz"];
    (0..count)
        .map(|i| {
            let name = format!("entry{:05}.{}", i, extensions[i % extensions.len()]);
            let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + i as u64);
            if i % 7 == 0 {
                Entry::directory(
                    name.clone(),
                    name.clone(),
                    false,
                    PathBuf::from("/bench").join(&name),
                    name,
                )
                .with_modified(modified)
            } else {
                Entry::file(name.clone(), PathBuf::from("/bench").join(&name), name)
                    .with_modified(modified)
            }
        })
        .collect()
}

/// Benchmark ignore/allow decisions.
fn bench_pattern_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_matching");

    let lists = PatternLists {
        ignore_dirs: vec!["assets".into(), "config".into(), "node_modules".into(), ".*".into()],
        ignore_files: vec!["*.css".into(), "index.php".into(), "*.js".into(), "*.ipk".into()],
        allow_dirs: vec!["deploy".into()],
        allow_files: vec!["firmware*".into()],
    };
    let patterns = PatternSet::new(&lists).unwrap();
    let names: Vec<String> = synthetic_entries(1000).into_iter().map(|e| e.name).collect();

    group.throughput(Throughput::Elements(names.len() as u64));
    group.bench_function("should_ignore_1000", |b| {
        b.iter(|| {
            names
                .iter()
                .filter(|name| !patterns.should_ignore(black_box(name), false))
                .count()
        });
    });

    group.finish();
}

/// Benchmark filter, sort and paginate over in-memory entries.
fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");

    for count in [100usize, 1_000, 10_000] {
        let entries = synthetic_entries(count);
        group.throughput(Throughput::Elements(count as u64));

        for sort in [SortMode::NameAsc, SortMode::ExtDesc, SortMode::DateAsc] {
            let query = ListingQuery {
                filter: "entry".to_string(),
                sort,
                page: 2,
                page_size: 50,
            };
            group.bench_with_input(
                BenchmarkId::new(sort.as_str(), count),
                &entries,
                |b, entries| {
                    b.iter(|| pipeline::process(black_box(entries.clone()), &query));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark a complete request against a real directory.
fn bench_list_directory(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..500 {
        if i % 10 == 0 {
            let dir = temp_dir.path().join(format!("dir{:03}", i));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("child.txt"), "x").unwrap();
        } else {
            fs::write(temp_dir.path().join(format!("file{:03}.txt", i)), "x").unwrap();
        }
    }
    let explorer = FileExplorer::new(temp_dir.path()).unwrap();

    let mut group = c.benchmark_group("list_directory");
    group.throughput(Throughput::Elements(500));
    group.bench_function("root_500", |b| {
        b.iter(|| explorer.list(black_box(&ListingRequest::default())).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_matching,
    bench_process,
    bench_list_directory
);
criterion_main!(benches);
