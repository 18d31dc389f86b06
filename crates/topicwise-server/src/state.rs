//! Shared application state.

use std::sync::Arc;

use tracing::info;

use topicwise_catalog::TopicCatalog;
use topicwise_core::{CategorySet, Result, TopicwiseConfig};
use topicwise_diversity::DiversityEngine;
use topicwise_runtime::ContentCalendar;
use topicwise_select::{DuplicateValidator, TopicSelector};
use topicwise_store::SqliteHistory;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: TopicwiseConfig,
    pub history: Arc<SqliteHistory>,
    pub engine: DiversityEngine,
    pub selector: TopicSelector,
    pub validator: DuplicateValidator,
    pub calendar: ContentCalendar,
}

impl AppState {
    pub fn new(config: TopicwiseConfig, history: Arc<SqliteHistory>, catalog: TopicCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let engine = DiversityEngine::new(
            history.clone(),
            CategorySet::health(),
            config.diversity.clone(),
        );
        let selector = TopicSelector::new(engine.clone(), catalog.clone());
        let validator = DuplicateValidator::new(engine.clone(), catalog);
        let calendar = ContentCalendar::new(selector.clone());

        Self {
            config,
            history,
            engine,
            selector,
            validator,
            calendar,
        }
    }

    /// Open the history database and topic bank under the configured data directory.
    pub fn open(config: TopicwiseConfig) -> Result<Self> {
        let history = Arc::new(SqliteHistory::open(&config.data_paths.history)?);
        let catalog = TopicCatalog::load_or_builtin(&config.data_paths.catalog_file);
        info!(
            "Catalog ready: {} topics in {} categories",
            catalog.len(),
            catalog.categories().count()
        );
        Ok(Self::new(config, history, catalog))
    }
}
