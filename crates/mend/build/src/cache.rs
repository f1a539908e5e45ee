//! Content-addressed cache of compiled units.
//!
//! Shared by every concurrently evaluating program version for one run.

use dashmap::DashMap;
use mend_ast::ContentHash;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::CompiledUnit;

/// Compiled units keyed by the fingerprint of their source text.
pub struct ArtifactCache {
    entries: DashMap<ContentHash, CompiledUnit>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up the unit compiled from exactly this source.
    pub fn get(&self, fingerprint: &ContentHash) -> Option<CompiledUnit> {
        match self.entries.get(fingerprint) {
            Some(unit) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(unit.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert if absent. Entries for one fingerprint are content-identical,
    /// so a concurrent insert losing the race changes nothing.
    pub fn publish(&self, unit: CompiledUnit) {
        self.entries
            .entry(unit.source_fingerprint)
            .or_insert(unit);
    }

    pub fn contains(&self, fingerprint: &ContentHash) -> bool {
        self.entries.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ArtifactCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassFile;
    use mend_ast::FullyQualifiedName;
    use std::sync::Arc;

    fn unit(text: &str) -> CompiledUnit {
        CompiledUnit {
            fqn: FullyQualifiedName::target("example.Calc"),
            source_fingerprint: ContentHash::hash(text.as_bytes()),
            class_files: vec![ClassFile {
                name: "example/Calc.class".into(),
                bytes: text.as_bytes().to_vec(),
            }],
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = ArtifactCache::new();
        let u = unit("class Calc {}");
        assert!(cache.get(&u.source_fingerprint).is_none());
        cache.publish(u.clone());
        assert_eq!(cache.get(&u.source_fingerprint), Some(u));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn different_content_never_collides() {
        let cache = ArtifactCache::new();
        cache.publish(unit("class Calc { int a; }"));
        assert!(cache.get(&ContentHash::hash(b"class Calc { int b; }")).is_none());
    }

    #[test]
    fn publish_keeps_first_entry() {
        let cache = ArtifactCache::new();
        let first = unit("class Calc {}");
        let mut second = first.clone();
        second.class_files.clear();
        cache.publish(first.clone());
        cache.publish(second);
        assert_eq!(cache.get(&first.source_fingerprint), Some(first));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_publish_and_lookup() {
        let cache = Arc::new(ArtifactCache::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let u = unit(&format!("class C{} {{}}", i % 4));
                cache.publish(u.clone());
                cache.get(&u.source_fingerprint).is_some()
            }));
        }
        for h in handles {
            assert!(h.await.unwrap());
        }
        assert_eq!(cache.len(), 4);
    }
}
