use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::LoadedDataset;

use super::config::Config;

/// The dataset is swapped as a whole on reload; handlers clone the inner
/// `Arc` and never see a half-built one.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dataset: Arc<RwLock<Arc<LoadedDataset>>>,
}

impl AppState {
    pub fn new(config: Config, loaded: LoadedDataset) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(RwLock::new(Arc::new(loaded))),
        }
    }

    pub async fn current(&self) -> Arc<LoadedDataset> {
        self.dataset.read().await.clone()
    }

    pub async fn replace(&self, loaded: LoadedDataset) {
        *self.dataset.write().await = Arc::new(loaded);
    }
}
