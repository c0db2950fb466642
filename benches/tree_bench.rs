use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docsort_model::selection::Selection;
use docsort_model::tree::{build_tree, filter_tree};
use docsort_model::types::{FileMetadata, MetadataMap};

/// `folders` top-level folders, each with `subdirs` sub-folders of `files` PDFs.
fn synthetic_paths(folders: usize, subdirs: usize, files: usize) -> (Vec<String>, MetadataMap) {
    let mut paths = Vec::with_capacity(folders * subdirs * files);
    let mut meta = MetadataMap::new();
    let mut doc_id = 0;
    for f in 0..folders {
        for s in 0..subdirs {
            for i in 0..files {
                let p = format!("folder_{}/sub_{}/doc_{}.pdf", f, s, i);
                doc_id += 1;
                meta.insert(p.clone(), FileMetadata { doc_id: Some(doc_id), ..FileMetadata::default() });
                paths.push(p);
            }
        }
        paths.push(format!("folder_{}/empty/.folder_placeholder", f));
    }
    (paths, meta)
}

fn benchmark_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    for &(folders, subdirs, files) in &[(5, 5, 10), (20, 10, 25), (50, 20, 20)] {
        let (paths, meta) = synthetic_paths(folders, subdirs, files);
        group.bench_with_input(BenchmarkId::from_parameter(paths.len()), &paths, |b, paths| {
            b.iter(|| black_box(build_tree(paths, &meta)))
        });
    }
    group.finish();
}

fn benchmark_folder_toggle(c: &mut Criterion) {
    let (paths, meta) = synthetic_paths(20, 10, 25);
    let forest = build_tree(&paths, &meta);
    c.bench_function("toggle_top_folder_twice", |b| {
        b.iter(|| {
            let mut sel = Selection::with_folder_tracking();
            sel.toggle_folder(&forest[0]);
            sel.toggle_folder(&forest[0]);
            black_box(sel.selected_count())
        })
    });
}

fn benchmark_filter(c: &mut Criterion) {
    let (paths, meta) = synthetic_paths(20, 10, 25);
    let forest = build_tree(&paths, &meta);
    c.bench_function("filter_tree_doc_1", |b| b.iter(|| black_box(filter_tree(&forest, "doc_1"))));
}

criterion_group!(benches, benchmark_build_tree, benchmark_folder_toggle, benchmark_filter);
criterion_main!(benches);
