use std::sync::Arc;

use crate::config::Config;
use crate::models::resume::ResumeData;
use crate::page::PageRenderer;
use crate::provider::ResumeSource;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    /// Feeds the page's provider; one fetch per page render.
    pub source: Arc<dyn ResumeSource>,
    /// Bundled dataset, shown when the source fails and used for document
    /// names when the store is empty.
    pub fallback: Arc<ResumeData>,
    pub pages: Arc<PageRenderer>,
    pub config: Config,
}
