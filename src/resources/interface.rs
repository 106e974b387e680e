use crate::resources::label_mapping::{LabelMapping, LabelMappingError};
use std::sync::Arc;
use thiserror::Error;
use tract_onnx::prelude::tract_ndarray::Array4;

/// A pre-trained classifier: one normalized image batch in, one score per class out.
pub trait Model: Send + Sync {
    /// Declared (height, width) of the images the model accepts.
    fn input_shape(&self) -> (u32, u32);

    fn num_classes(&self) -> usize;

    fn forward(&self, batch: Array4<f32>) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Error)]
pub enum ResourceLoadError {
    #[error("failed to load model {path}: {message}")]
    Model { path: String, message: String },

    #[error("failed to read label mapping {path}: {source}")]
    LabelMappingRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse label mapping {path}: {source}")]
    LabelMappingParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid label mapping {path}: {source}")]
    LabelMappingInvalid {
        path: String,
        #[source]
        source: LabelMappingError,
    },

    #[error("model emits {model_classes} scores but the label mapping has {labels} labels")]
    Incompatible { model_classes: usize, labels: usize },
}

/// The loaded model together with its label mapping. Immutable once built.
pub struct Resources {
    pub model: Arc<dyn Model>,
    pub labels: LabelMapping,
}

impl Resources {
    pub fn new(model: Arc<dyn Model>, labels: LabelMapping) -> Result<Self, ResourceLoadError> {
        if model.num_classes() != labels.len() {
            return Err(ResourceLoadError::Incompatible {
                model_classes: model.num_classes(),
                labels: labels.len(),
            });
        }

        Ok(Self { model, labels })
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("input_shape", &self.model.input_shape())
            .field("num_classes", &self.model.num_classes())
            .field("labels", &self.labels)
            .finish()
    }
}

pub trait ResourceLoader: Send + Sync {
    fn load(&self) -> Result<Arc<Resources>, ResourceLoadError>;
}
