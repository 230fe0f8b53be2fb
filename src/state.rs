use crate::models::Dataset;
use std::sync::Arc;

/// Shared state. The dataset is written once before the router starts and is
/// read-only afterwards, so an `Arc` with no lock is enough. `None` means the
/// load failed and every scene must no-op with a diagnostic.
#[derive(Clone)]
pub struct AppState {
    pub source: String,
    pub dataset: Option<Arc<Dataset>>,
}

impl AppState {
    pub fn new(source: String, dataset: Option<Dataset>) -> Self {
        Self {
            source,
            dataset: dataset.map(Arc::new),
        }
    }
}
