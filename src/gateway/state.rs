use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::ScanPipeline;
use crate::resolver::TieredIngredientResolver;

#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: Arc<ScanPipeline>,

    /// Mirror directory, `None` when the cache is not persisted.
    pub storage_path: Option<PathBuf>,

    pub external_enabled: bool,
}

impl HandlerState {
    pub fn new(
        pipeline: Arc<ScanPipeline>,
        storage_path: Option<PathBuf>,
        external_enabled: bool,
    ) -> Self {
        Self {
            pipeline,
            storage_path,
            external_enabled,
        }
    }

    pub fn resolver(&self) -> &Arc<TieredIngredientResolver> {
        self.pipeline.resolver()
    }
}
