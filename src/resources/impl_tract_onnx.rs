use crate::config::{Config, TensorLayout};
use crate::resources::interface::Model;
use std::path::Path;
use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::infer::GenericFactoid;

/// An ONNX classifier run by tract, with its input fixed to a single-image batch.
pub struct ModelTractOnnx {
    plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    input_shape: (u32, u32),
    num_classes: usize,
}

impl ModelTractOnnx {
    /// Spatial dims the graph declares win over `config.input_shape`; the
    /// configured ones only fill in what the graph leaves symbolic.
    pub fn load(model_path: &Path, config: &Config) -> TractResult<Self> {
        let model = tract_onnx::onnx().model_for_path(model_path)?;

        let input_shape = declared_input_shape(model.input_fact(0)?, config)?;
        let (height, width) = input_shape;
        let batch_shape = config
            .tensor_layout
            .batch_shape(height as usize, width as usize);

        let plan = model
            .with_input_fact(0, f32::fact(batch_shape).into())?
            .into_optimized()?
            .into_runnable()?;

        let output_fact = plan.model().output_fact(0)?;
        let num_classes = output_fact
            .shape
            .as_concrete()
            .map(|shape| shape.iter().product::<usize>())
            .ok_or_else(|| {
                TractError::msg(format!(
                    "model output shape {:?} is not fixed",
                    output_fact.shape
                ))
            })?;

        Ok(Self {
            plan,
            input_shape,
            num_classes,
        })
    }
}

fn declared_input_shape(fact: &InferenceFact, config: &Config) -> TractResult<(u32, u32)> {
    if fact.shape.is_open() {
        return Ok(config.input_shape);
    }

    let dims: Vec<Option<u32>> = fact.shape.dims().map(fixed_dim).collect();
    let (height, width) = config.tensor_layout.spatial_dims(&dims).ok_or_else(|| {
        TractError::msg(format!(
            "model input shape {:?} is not an image batch",
            fact.shape
        ))
    })?;

    let channels = match config.tensor_layout {
        TensorLayout::Nhwc => dims[3],
        TensorLayout::Nchw => dims[1],
    };
    if channels.is_some_and(|channels| channels != 3) {
        return Err(TractError::msg(format!(
            "model input shape {:?} does not take 3 channels in {:?} layout",
            fact.shape, config.tensor_layout
        )));
    }

    let (configured_height, configured_width) = config.input_shape;
    Ok((
        height.unwrap_or(configured_height),
        width.unwrap_or(configured_width),
    ))
}

fn fixed_dim(dim: &GenericFactoid<TDim>) -> Option<u32> {
    match dim {
        GenericFactoid::Only(TDim::Val(value)) => u32::try_from(*value).ok(),
        _ => None,
    }
}

impl Model for ModelTractOnnx {
    fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn forward(&self, batch: Array4<f32>) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let outputs = self.plan.run(tvec!(batch.into_tensor().into_tvalue()))?;
        let scores = outputs[0].to_array_view::<f32>()?;

        Ok(scores.iter().copied().collect())
    }
}
