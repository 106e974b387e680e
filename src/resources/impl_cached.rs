use crate::library::logger::interface::Logger;
use crate::resources::interface::{ResourceLoadError, ResourceLoader, Resources};
use std::sync::{Arc, Mutex, OnceLock};

/// Loads through `inner` at most once per process; later calls share the cached value.
/// A failed load is not cached.
pub struct ResourceLoaderCached {
    inner: Arc<dyn ResourceLoader + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
    cache: OnceLock<Arc<Resources>>,
    loading: Mutex<()>,
}

impl ResourceLoaderCached {
    pub fn new(
        inner: Arc<dyn ResourceLoader + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            inner,
            logger: logger.with_namespace("resources:cache"),
            cache: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }
}

impl ResourceLoader for ResourceLoaderCached {
    fn load(&self) -> Result<Arc<Resources>, ResourceLoadError> {
        if let Some(resources) = self.cache.get() {
            return Ok(resources.clone());
        }

        let _loading = self
            .loading
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(resources) = self.cache.get() {
            return Ok(resources.clone());
        }

        match self.inner.load() {
            Ok(resources) => {
                let _ = self.logger.info("Resources cached");
                Ok(self.cache.get_or_init(|| resources).clone())
            }
            Err(e) => {
                let _ = self.logger.error(&format!("Loading resources failed: {}", e));
                Err(e)
            }
        }
    }
}
