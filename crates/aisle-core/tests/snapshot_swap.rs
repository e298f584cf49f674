//! Concurrent readers never observe a catalog whose length differs from its
//! vector count.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use aisle_core::{CatalogStore, Embedding, Product};

fn catalog(size: usize) -> (Vec<Product>, Vec<Embedding>) {
    let products = (0..size)
        .map(|i| Product::new(i as u64, format!("item {i}"), i as f64))
        .collect();
    let vectors = (0..size).map(|i| vec![i as f32; 4]).collect();
    (products, vectors)
}

#[test]
fn readers_see_whole_snapshots_during_swaps() {
    let store = Arc::new(CatalogStore::new());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0usize;
                loop {
                    let snap = store.snapshot();
                    if let Some(vectors) = snap.embeddings() {
                        assert_eq!(snap.len(), vectors.len());
                    }
                    // Sizes installed by the writer are 3 or 7 (or the initial 0).
                    assert!(matches!(snap.len(), 0 | 3 | 7), "mixed size {}", snap.len());
                    observed += 1;
                    if done.load(Ordering::Relaxed) {
                        break;
                    }
                }
                observed
            })
        })
        .collect();

    for round in 0..500 {
        let size = if round % 2 == 0 { 3 } else { 7 };
        let (products, vectors) = catalog(size);
        store.install(products, vectors).unwrap();
        if round % 5 == 0 {
            let (products, _) = catalog(size);
            store.load(products);
        }
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}

#[test]
fn all_and_by_id_agree_with_one_snapshot() {
    let store = CatalogStore::new();
    let (products, vectors) = catalog(5);
    store.install(products, vectors).unwrap();

    let all = store.all();
    assert_eq!(all.len(), 5);
    for product in &all {
        assert_eq!(store.by_id(product.id).unwrap().name, product.name);
    }
}
