//! Service container for dependency injection
//!
//! Wires up the catalog and classification services with their I/O boundaries.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::application::services::{Catalog, CatalogService, ClassificationService};
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::domain::{HsNode, HsTree};
use crate::infrastructure::traits::{
    Classifier, CsvRowSource, RowSource, TokenOverlapClassifier,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings and I/O boundaries, building services on demand.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Tariff table reader
    pub rows: Arc<dyn RowSource>,

    /// Final-code narrowing step
    pub classifier: Arc<dyn Classifier>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(CsvRowSource),
            Arc::new(TokenOverlapClassifier),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        rows: Arc<dyn RowSource>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            rows,
            classifier,
        }
    }

    /// Read the configured table (and forest, if configured) and build the catalog.
    #[instrument(level = "debug", skip(self))]
    pub fn load_catalog(&self) -> InfraResult<Catalog> {
        let raw = self.rows.read_rows(&self.settings.table_path)?;
        let policy = self.settings.row_policy();

        let catalog = match &self.settings.tree_path {
            Some(tree_path) => {
                let tree = read_forest(tree_path)?;
                Catalog::with_tree(&raw, tree, policy)
            }
            None => Catalog::build(&raw, policy),
        }
        .map_err(ApplicationError::from)?;

        info!("catalog loaded from {}", self.settings.table_path.display());
        Ok(catalog)
    }

    pub fn catalog_service(&self) -> InfraResult<Arc<CatalogService>> {
        Ok(Arc::new(CatalogService::new(self.load_catalog()?)))
    }

    pub fn classification_service(&self, catalog: Arc<CatalogService>) -> ClassificationService {
        ClassificationService::new(
            catalog,
            Arc::clone(&self.classifier),
            self.settings.candidate_limit,
        )
    }
}

/// Deepest forest (in levels) that is exported or read back as nested JSON.
///
/// Nested records are (de)serialized recursively; real tariff tables stay
/// far below this bound.
pub const MAX_FOREST_DEPTH: usize = 128;

/// Load a forest previously exported as nested JSON records.
pub fn read_forest(path: &Path) -> InfraResult<HsTree> {
    let context = || format!("parse forest {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read forest {}", path.display()), e))?;

    // Each level nests an object and its children array inside the outer list
    let nesting = json_nesting(&content);
    if nesting > 2 * MAX_FOREST_DEPTH + 1 {
        let e = <serde_json::Error as serde::de::Error>::custom(format!(
            "nesting depth {} exceeds {} forest levels",
            nesting, MAX_FOREST_DEPTH
        ));
        return Err(InfraError::json(context(), e));
    }

    let mut de = serde_json::Deserializer::from_str(&content);
    de.disable_recursion_limit();
    let nodes = Vec::<HsNode>::deserialize(&mut de)
        .and_then(|nodes| de.end().map(|()| nodes))
        .map_err(|e| InfraError::json(context(), e))?;
    Ok(HsTree::from_nodes(&nodes))
}

/// Serialize a forest as pretty-printed nested JSON records.
pub fn forest_json(tree: &HsTree) -> InfraResult<String> {
    let depth = tree.depth();
    if depth > MAX_FOREST_DEPTH {
        let e = <serde_json::Error as serde::ser::Error>::custom(format!(
            "forest has {} levels, at most {} can be exported",
            depth, MAX_FOREST_DEPTH
        ));
        return Err(InfraError::json("serialize forest", e));
    }
    serde_json::to_string_pretty(&tree.to_nodes())
        .map_err(|e| InfraError::json("serialize forest", e))
}

/// Deepest bracket nesting in a JSON text, ignoring brackets inside strings.
fn json_nesting(text: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);

    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
