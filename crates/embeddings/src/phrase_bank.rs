//! Canonical phrase-set cache
//!
//! Reference sentences are embedded once per (set id, version) and shared
//! read-only by every scorer and every evaluation afterwards.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use call_eval_core::{Embedder, Result};

/// A fixed, versioned list of reference sentences
#[derive(Debug, Clone, Copy)]
pub struct PhraseSet {
    pub id: &'static str,
    pub version: u32,
    pub phrases: &'static [&'static str],
}

impl PhraseSet {
    pub const fn new(id: &'static str, version: u32, phrases: &'static [&'static str]) -> Self {
        Self {
            id,
            version,
            phrases,
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Cache statistics
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

type SetKey = (&'static str, u32);

/// Embedder plus the embeddings of every phrase set requested so far
pub struct PhraseBank {
    embedder: Arc<dyn Embedder>,
    sets: RwLock<HashMap<SetKey, Arc<Vec<Vec<f32>>>>>,
    /// Cache statistics
    pub stats: CacheStats,
}

impl PhraseBank {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            sets: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    /// The underlying embedder
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed free text (turns, windows); never cached
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embed(text)
    }

    /// Embeddings of a phrase set, computed on first use
    pub fn embeddings(&self, set: &PhraseSet) -> Result<Arc<Vec<Vec<f32>>>> {
        let key = (set.id, set.version);

        if let Some(cached) = self.sets.read().get(&key) {
            self.stats.record_hit();
            return Ok(Arc::clone(cached));
        }

        self.stats.record_miss();
        let vectors = Arc::new(self.embedder.embed_batch(set.phrases)?);

        let mut sets = self.sets.write();
        // another task may have filled the slot meanwhile; keep the first
        let entry = sets.entry(key).or_insert_with(|| Arc::clone(&vectors));
        tracing::debug!(set = set.id, version = set.version, phrases = set.len(), "Embedded phrase set");
        Ok(Arc::clone(entry))
    }

    /// Compute the given sets up front
    pub fn warm(&self, sets: &[&PhraseSet]) -> Result<()> {
        for set in sets {
            self.embeddings(set)?;
        }
        Ok(())
    }

    /// Number of cached sets
    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }
}

impl std::fmt::Debug for PhraseBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseBank")
            .field("dim", &self.embedder.dim())
            .field("sets", &self.len())
            .finish()
    }
}
