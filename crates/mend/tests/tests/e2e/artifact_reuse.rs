//! E2E: unchanged units are compiled once and reused by later variants.

use crate::common::{self, A_PATH};
use mend_ast::SourcePath;
use mend_build::SimulatedCompiler;
use mend_ga::{Base, Gene, HistoricalElement, Operation, VariantRequest, VariantStore};
use std::sync::Arc;

fn delete(ast: &mend_ast::AstSet, index: usize) -> VariantRequest {
    let path = SourcePath::product(A_PATH);
    let target = ast
        .locations()
        .into_iter()
        .filter(|l| l.path == path)
        .nth(index)
        .unwrap();
    VariantRequest::new(
        Gene::empty().append(Base::new(target, Operation::Delete)),
        HistoricalElement::Original,
    )
}

#[tokio::test]
async fn only_changed_units_reach_the_compiler() {
    let compiler = Arc::new(SimulatedCompiler::new());
    let original = common::original();
    let mut strategies = common::strategies(&original, Arc::clone(&compiler));
    strategies.skip_duplicate_sources = false;
    let mut store = VariantStore::new(original, strategies).await;

    assert_eq!(compiler.invocations(), 1);
    let stats = store.cache_stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.hits, 0);

    let original = Arc::clone(store.original());
    let first = store.create_variant(delete(&original, 0)).await.unwrap();
    assert!(first.is_build_success());
    assert_eq!(compiler.invocations(), 2);
    let stats = store.cache_stats();
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.hits, 1);

    // Deleting either increment renders the same text, so both units are cached.
    let second = store.create_variant(delete(&original, 1)).await.unwrap();
    assert!(second.is_build_success());
    assert_eq!(compiler.invocations(), 2);
    assert_eq!(store.cache_stats().hits, 3);
    assert_eq!(first.fingerprint, second.fingerprint);
}

#[tokio::test]
async fn duplicate_programs_are_not_evaluated_twice() {
    let compiler = Arc::new(SimulatedCompiler::new());
    let original = common::original();
    let strategies = common::strategies(&original, Arc::clone(&compiler));
    let mut store = VariantStore::new(original, strategies).await;

    let original = Arc::clone(store.original());
    let variants = store
        .create_variants(vec![delete(&original, 0), delete(&original, 1)])
        .await;
    assert_eq!(variants.len(), 1);
    assert_eq!(store.stats().duplicates, 1);
    assert_eq!(store.stats().evaluated, 2);
    assert_eq!(compiler.invocations(), 2);
}
