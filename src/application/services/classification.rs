//! Classification service
//!
//! Runs the whole pipeline: chapter search, candidate flattening and the
//! external narrowing step.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{candidate_context, ChapterRecord, Classification};
use crate::infrastructure::traits::Classifier;

/// Result of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Chapter selected by the token search
    pub chapter: ChapterRecord,
    /// Number of candidates handed to the classifier
    pub considered: usize,
    pub classification: Classification,
}

/// Service classifying free-text product descriptions into HS codes.
pub struct ClassificationService {
    catalog: Arc<CatalogService>,
    classifier: Arc<dyn Classifier>,
    candidate_limit: usize,
}

impl ClassificationService {
    pub fn new(
        catalog: Arc<CatalogService>,
        classifier: Arc<dyn Classifier>,
        candidate_limit: usize,
    ) -> Self {
        Self {
            catalog,
            classifier,
            candidate_limit,
        }
    }

    /// Classify `query`.
    ///
    /// A blank query is rejected up front. Anything else goes to the chapter
    /// search, and a query that matches no chapter (including one without a
    /// single word, such as a bare code) gives `Ok(None)`.
    #[instrument(level = "debug", skip(self))]
    pub fn classify(&self, query: &str) -> ApplicationResult<Option<Outcome>> {
        if query.trim().is_empty() {
            return Err(ApplicationError::EmptyQuery);
        }

        let Some(lookup) = self.catalog.lookup(query) else {
            debug!("no chapter for {:?}", query);
            return Ok(None);
        };

        let context = candidate_context(&lookup.candidates, self.candidate_limit);
        debug!(
            "chapter {}: {} of {} candidates sent to classifier",
            lookup.chapter.code,
            context.len(),
            lookup.candidates.len()
        );

        let classification = self
            .classifier
            .classify(query, &context)
            .map_err(|message| ApplicationError::Classification { message })?;

        Ok(Some(Outcome {
            chapter: lookup.chapter,
            considered: context.len(),
            classification,
        }))
    }
}
