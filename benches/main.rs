use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use sharptree::{ParseOptions, SyntaxTree, TextChange, TextSize};

/// A file of `classes` classes with a few methods each.
fn source(classes: usize) -> String {
    let mut text = String::from("using System;\n\nnamespace Bench\n{\n");
    for i in 0..classes {
        text.push_str(&format!(
            "    public class C{i} : Base\n    {{\n        private int count{i} = {i};\n\n        public int \
             Next(int step)\n        {{\n            if (step > 0) {{ count{i} += step; }} else {{ count{i}--; }}\n            \
             return count{i} * 2 + step;\n        }}\n\n        public string Describe() {{ return $\"C{i}: \
             {{count{i}}}\"; }}\n    }}\n\n"
        ));
    }
    text.push_str("}\n");
    text
}

pub fn parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let text = source(200);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("full", |b| {
        b.iter(|| SyntaxTree::parse(black_box(text.as_str()), ParseOptions::default()))
    });

    let tree = SyntaxTree::parse_str(&text);
    let middle = text.find("count100 += step").unwrap_or(text.len() / 2);
    let change = TextChange::insert(TextSize::from(middle as u32), "total + ");
    group.bench_function("incremental", |b| {
        b.iter(|| tree.with_changes(black_box(std::slice::from_ref(&change))).unwrap())
    });

    let no_reuse = SyntaxTree::parse(text.as_str(), ParseOptions::default().with_node_reuse(false));
    group.bench_function("incremental without node reuse", |b| {
        b.iter(|| no_reuse.with_changes(black_box(std::slice::from_ref(&change))).unwrap())
    });

    group.finish();
}

pub fn navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigate");
    let text = source(50);
    group.bench_function("descendants of a fresh tree", |b| {
        b.iter_batched(
            || SyntaxTree::parse_str(&text),
            |tree| tree.root().descendants_with_tokens().count(),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    let text = source(50);
    let tree = SyntaxTree::parse_str(&text);
    let middle = text.find("count25 += step").unwrap_or(text.len() / 2);
    let edited = tree
        .with_changes(&[TextChange::insert(TextSize::from(middle as u32), "total + ")])
        .unwrap();
    group.bench_function("single edit", |b| b.iter(|| tree.changes(black_box(&edited))));
    group.finish();
}

criterion_group!(benches, parse, navigate, diff);
criterion_main!(benches);
