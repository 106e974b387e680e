use thiserror::Error;

/// One ranked class. `confidence` is the model score scaled to percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub index: usize,
    pub confidence: f32,
}

impl Classification {
    pub fn confidence_text(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

/// Highest scoring classes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub classifications: Vec<Classification>,
}

impl Prediction {
    pub fn top(&self) -> Option<&Classification> {
        self.classifications.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    Resizing,
    Normalizing,
    Predicting,
    Ranking,
}

impl PipelineStage {
    pub fn progress(&self) -> f32 {
        match self {
            PipelineStage::Decoding => 0.1,
            PipelineStage::Resizing => 0.25,
            PipelineStage::Normalizing => 0.5,
            PipelineStage::Predicting => 0.75,
            PipelineStage::Ranking => 0.9,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PipelineStage::Decoding => "Decoding image...",
            PipelineStage::Resizing => "Resizing image...",
            PipelineStage::Normalizing => "Converting to array...",
            PipelineStage::Predicting => "Running model prediction...",
            PipelineStage::Ranking => "Ranking predictions...",
        }
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported image format {0}, expected JPEG or PNG")]
    UnsupportedFormat(String),

    #[error(
        "model expects {}x{} input but images are resized to {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("model returned {actual} scores, expected {expected}")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("cannot rank top {required} of {available} classes")]
    TooFewClasses { required: usize, available: usize },

    #[error("forward pass failed: {0}")]
    Forward(#[source] Box<dyn std::error::Error + Send + Sync>),
}
