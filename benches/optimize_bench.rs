use criterion::{criterion_group, criterion_main, Criterion};
use shoco_tablegen::{Corpus, Generator, GeneratorConfig};

fn corpus() -> Corpus {
    let words = [
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "shoco", "compresses",
        "short", "strings", "with", "successor", "tables", "learned", "from", "text",
    ];
    let lines: Vec<String> = (0..2000)
        .map(|i| {
            (0..8)
                .map(|j| words[(i * 7 + j * 3) % words.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Corpus::from_bytes(lines.join("\n"))
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let corpus = corpus();

    let defaults = Generator::new(GeneratorConfig::default()).unwrap();
    group.bench_function("default_encodings", |b| {
        b.iter(|| defaults.generate(&corpus).unwrap())
    });

    let optimizer = Generator::new(GeneratorConfig {
        optimize: true,
        ..Default::default()
    })
    .unwrap();
    group.bench_function("optimize_encodings", |b| {
        b.iter(|| optimizer.generate(&corpus).unwrap())
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
