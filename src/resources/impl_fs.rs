use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::resources::impl_tract_onnx::ModelTractOnnx;
use crate::resources::interface::{ResourceLoadError, ResourceLoader, Resources};
use crate::resources::label_mapping::{parse_class_indices, LabelMapping};
use std::path::Path;
use std::sync::Arc;

/// Reads the model and label mapping from the paths in `Config` on every call.
pub struct ResourceLoaderFs {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ResourceLoaderFs {
    pub fn new(config: Config, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("resources"),
        }
    }
}

impl ResourceLoader for ResourceLoaderFs {
    fn load(&self) -> Result<Arc<Resources>, ResourceLoadError> {
        let model_path = &self.config.model_path;
        let _ = self
            .logger
            .info(&format!("Loading model from {}", model_path.display()));

        let model = ModelTractOnnx::load(model_path, &self.config).map_err(|e| {
            ResourceLoadError::Model {
                path: model_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let labels = read_label_mapping(&self.config.label_mapping_path)?;

        let resources = Resources::new(Arc::new(model), labels)?;
        let _ = self.logger.info(&format!("Loaded {:?}", resources));

        Ok(Arc::new(resources))
    }
}

pub fn read_label_mapping(path: &Path) -> Result<LabelMapping, ResourceLoadError> {
    let display_path = path.display().to_string();

    let json = std::fs::read_to_string(path).map_err(|source| ResourceLoadError::LabelMappingRead {
        path: display_path.clone(),
        source,
    })?;

    let class_indices =
        parse_class_indices(&json).map_err(|source| ResourceLoadError::LabelMappingParse {
            path: display_path.clone(),
            source,
        })?;

    LabelMapping::from_class_indices(class_indices).map_err(|source| {
        ResourceLoadError::LabelMappingInvalid {
            path: display_path,
            source,
        }
    })
}
