//! Benchmark for `TJA` file interpreting and rendering.

use criterion::{Criterion, Throughput};
use tja2osu::{decode::decode, osu::beatmap::render_beatmaps, tja::parse_tja};

struct TjaFile {
    name: String,
    source: String,
}

fn scan_tja_files() -> Vec<TjaFile> {
    let dir = "tests/files";

    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.to_string_lossy().ends_with(".tja"))
        .filter_map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(String::from)?;

            let bytes = std::fs::read(&path).expect("Failed to load test file");
            let source = decode(&bytes).text.into_owned();

            Some(TjaFile { name, source })
        })
        .collect()
}

fn bench_parse_tja(c: &mut Criterion) {
    let files = scan_tja_files();
    let mut group = c.benchmark_group("parse_tja");

    for file in &files {
        group.throughput(Throughput::Bytes(file.source.len() as u64));
        group.bench_function(&file.name, |b| {
            b.iter(|| parse_tja(std::hint::black_box(&file.source)));
        });
    }

    group.finish();
}

fn bench_render_beatmaps(c: &mut Criterion) {
    let files = scan_tja_files();
    let mut group = c.benchmark_group("render_beatmaps");

    for file in &files {
        let Ok(output) = parse_tja(&file.source) else {
            continue;
        };
        group.bench_function(&file.name, |b| {
            b.iter(|| render_beatmaps(std::hint::black_box(&output.chart)));
        });
    }

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_parse_tja(&mut criterion);
    bench_render_beatmaps(&mut criterion);
}
