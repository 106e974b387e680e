use crate::config::{Config, ScoreMode};
use crate::image_classifier::interface::{
    Classification, InferenceError, PipelineStage, Prediction,
};
use crate::image_classifier::preprocess::{decode_image, image_to_batch, resize_image};
use crate::image_classifier::ranking::{apply_score_mode, is_distribution, top_k};
use crate::library::logger::interface::Logger;
use crate::resources::interface::Resources;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;

/// Image in, top-k labelled confidences out, against one set of loaded resources.
pub struct ImageClassifierPipeline {
    resources: Arc<Resources>,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierPipeline {
    pub fn new(
        resources: Arc<Resources>,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            resources,
            config,
            logger: logger.with_namespace("pipeline"),
        }
    }

    pub fn classify_upload(
        &self,
        bytes: &[u8],
        on_stage: &mut dyn FnMut(PipelineStage),
    ) -> Result<Prediction, InferenceError> {
        on_stage(PipelineStage::Decoding);
        let image = decode_image(bytes)?;

        self.classify_image(&image, on_stage)
    }

    pub fn classify_image(
        &self,
        image: &DynamicImage,
        on_stage: &mut dyn FnMut(PipelineStage),
    ) -> Result<Prediction, InferenceError> {
        let model = &self.resources.model;
        let labels = &self.resources.labels;
        let (height, width) = self.config.input_shape;

        if model.input_shape() != self.config.input_shape {
            return Err(InferenceError::DimensionMismatch {
                expected: self.config.input_shape,
                actual: model.input_shape(),
            });
        }
        if labels.len() < self.config.top_k {
            return Err(InferenceError::TooFewClasses {
                required: self.config.top_k,
                available: labels.len(),
            });
        }

        on_stage(PipelineStage::Resizing);
        let resized = resize_image(image, width, height, self.config.resize_filter);

        on_stage(PipelineStage::Normalizing);
        let batch = image_to_batch(&resized, self.config.tensor_layout);

        on_stage(PipelineStage::Predicting);
        let started = Instant::now();
        let scores = model.forward(batch).map_err(InferenceError::Forward)?;
        let _ = self.logger.info(&format!(
            "Forward pass on {}x{} image took {:?}",
            image.width(),
            image.height(),
            started.elapsed()
        ));

        if scores.len() != labels.len() {
            return Err(InferenceError::ScoreCountMismatch {
                expected: labels.len(),
                actual: scores.len(),
            });
        }
        if self.config.score_mode == ScoreMode::Raw && !is_distribution(&scores) {
            let _ = self.logger.warn(
                "Model scores do not form a probability distribution; showing them as raw percentages",
            );
        }

        on_stage(PipelineStage::Ranking);
        let scores = apply_score_mode(scores, self.config.score_mode);
        let mut classifications = Vec::with_capacity(self.config.top_k);
        for (index, score) in top_k(&scores, self.config.top_k) {
            // Resources::new guarantees one label per score.
            let label = labels.label_for(index).ok_or(InferenceError::ScoreCountMismatch {
                expected: labels.len(),
                actual: scores.len(),
            })?;
            classifications.push(Classification {
                label: label.to_string(),
                index,
                confidence: score * 100.0,
            });
        }

        Ok(Prediction { classifications })
    }
}
