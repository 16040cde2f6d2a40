//! Catalog service
//!
//! Owns the process-wide, read-only tariff catalog (forest plus chapter index)
//! and answers chapter lookups against it.

use std::sync::{Arc, RwLock};

use tracing::{debug, info, instrument, warn};

use crate::domain::{
    leveled_rows, Candidate, ChapterIndex, ChapterRecord, DomainResult, HsTree, RawRow, RowPolicy,
    TreeBuilder,
};

/// Forest and chapter index derived from the same table.
#[derive(Debug, Default)]
pub struct Catalog {
    tree: HsTree,
    chapters: ChapterIndex,
}

/// Matched chapter and the candidate pool below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub chapter: ChapterRecord,
    pub candidates: Vec<Candidate>,
}

/// One line of a ranking, detached from the catalog it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChapter {
    pub score: f64,
    pub code: String,
    pub local_text: String,
}

impl Catalog {
    /// Build both structures from one row sequence so they agree on chapter boundaries.
    #[instrument(level = "debug", skip(raw), fields(rows = raw.len()))]
    pub fn build(raw: &[RawRow], policy: RowPolicy) -> DomainResult<Self> {
        let rows = leveled_rows(raw, policy)?;
        let catalog = Self {
            tree: TreeBuilder::build_from_rows(&rows),
            chapters: ChapterIndex::from_rows(&rows),
        };
        info!(
            "catalog built: {} nodes, {} chapters",
            catalog.tree.len(),
            catalog.chapters.len()
        );
        Ok(catalog)
    }

    /// Combine a chapter index built from `raw` with an already built forest.
    pub fn with_tree(raw: &[RawRow], tree: HsTree, policy: RowPolicy) -> DomainResult<Self> {
        let chapters = ChapterIndex::build(raw, policy)?;
        for chapter in chapters.chapters() {
            if tree.find_by_code(&chapter.code).is_none() {
                warn!("chapter {} has no node in the forest", chapter.code);
            }
        }
        Ok(Self { tree, chapters })
    }

    pub fn tree(&self) -> &HsTree {
        &self.tree
    }

    pub fn chapters(&self) -> &ChapterIndex {
        &self.chapters
    }

    /// Best chapter for `query` and its flattened descendants.
    pub fn lookup(&self, query: &str) -> Option<Lookup> {
        let chapter = self.chapters.search(query)?;
        let candidates = self.tree.flatten_descendants(&chapter.code);
        debug!(
            "query {:?} matched chapter {} with {} candidates",
            query,
            chapter.code,
            candidates.len()
        );
        Some(Lookup {
            chapter: chapter.clone(),
            candidates,
        })
    }
}

/// Holds the current catalog; readers take cheap snapshots, a rebuild swaps
/// the whole catalog at once.
#[derive(Debug)]
pub struct CatalogService {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Current catalog. Stays valid even if it is replaced meanwhile.
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a freshly built catalog, returning the previous one.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        info!("replacing catalog");
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }

    pub fn lookup(&self, query: &str) -> Option<Lookup> {
        self.snapshot().lookup(query)
    }

    /// Scored chapters for `query`, best first, at most `top`.
    pub fn rank(&self, query: &str, top: usize) -> Vec<RankedChapter> {
        let catalog = self.snapshot();
        let ranked = catalog
            .chapters()
            .rank(query)
            .into_iter()
            .take(top)
            .map(|s| RankedChapter {
                score: s.score,
                code: s.chapter.code.clone(),
                local_text: s.chapter.local_text.clone(),
            })
            .collect();
        ranked
    }
}
