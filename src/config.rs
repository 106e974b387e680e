use image::imageops::FilterType;
use std::path::PathBuf;

/// Memory order of the batch tensor handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, height, width, 3]`, the layout Keras exports keep.
    Nhwc,
    /// `[1, 3, height, width]`.
    Nchw,
}

impl TensorLayout {
    pub fn batch_shape(&self, height: usize, width: usize) -> [usize; 4] {
        match self {
            TensorLayout::Nhwc => [1, height, width, 3],
            TensorLayout::Nchw => [1, 3, height, width],
        }
    }

    /// Spatial `(height, width)` entries of a rank-4 batch shape in this layout.
    pub fn spatial_dims<T: Copy>(&self, shape: &[T]) -> Option<(T, T)> {
        if shape.len() != 4 {
            return None;
        }
        match self {
            TensorLayout::Nhwc => Some((shape[1], shape[2])),
            TensorLayout::Nchw => Some((shape[2], shape[3])),
        }
    }
}

/// How raw model outputs become confidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// Scores are used as emitted by the model.
    Raw,
    /// Scores are passed through a softmax first.
    Softmax,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub label_mapping_path: PathBuf,
    /// (height, width)
    pub input_shape: (u32, u32),
    pub tensor_layout: TensorLayout,
    pub resize_filter: FilterType,
    pub top_k: usize,
    pub score_mode: ScoreMode,
    pub supported_extensions: Vec<String>,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best_model.onnx"),
            label_mapping_path: PathBuf::from("class_indices.json"),
            input_shape: (224, 224),
            tensor_layout: TensorLayout::Nhwc,
            resize_filter: FilterType::CatmullRom,
            top_k: 3,
            score_mode: ScoreMode::Raw,
            supported_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            window_title: "Vehicle Type Classification".to_string(),
            window_size: [1100.0, 720.0],
            logger_timezone: local_offset(),
        }
    }
}

impl Config {
    pub fn is_supported_file_name(&self, name: &str) -> bool {
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.supported_extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
