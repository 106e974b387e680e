use crate::resources::interface::{Model, ResourceLoadError, ResourceLoader, Resources};
use crate::resources::label_mapping::LabelMapping;
use prost::Message;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tract_onnx::pb::attribute_proto::AttributeType;
use tract_onnx::pb::tensor_proto::DataType;
use tract_onnx::pb::tensor_shape_proto::{dimension, Dimension};
use tract_onnx::pb::{
    type_proto, AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto,
    TensorShapeProto, TypeProto, ValueInfoProto,
};
use tract_onnx::prelude::tract_ndarray::Array4;

pub const VEHICLE_LABELS: [&str; 10] = [
    "Bus",
    "Family Sedan",
    "Fire Engine",
    "Heavy Truck",
    "Jeep",
    "Minibus",
    "Racing Car",
    "SUV",
    "Taxi",
    "Truck",
];

pub fn vehicle_labels(count: usize) -> LabelMapping {
    let class_indices = (0..count).map(|index| {
        let label = VEHICLE_LABELS
            .get(index)
            .map(|label| label.to_string())
            .unwrap_or_else(|| format!("class_{}", index));
        (label, index)
    });

    LabelMapping::from_class_indices(class_indices).unwrap()
}

/// Returns the same scores for every batch and remembers what it was given.
pub struct ModelFake {
    input_shape: (u32, u32),
    scores: Vec<f32>,
    fail: bool,
    forward_calls: AtomicUsize,
    last_batch: Mutex<Option<Array4<f32>>>,
}

impl ModelFake {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            input_shape: (224, 224),
            scores,
            fail: false,
            forward_calls: AtomicUsize::new(0),
            last_batch: Mutex::new(None),
        }
    }

    pub fn with_input_shape(mut self, input_shape: (u32, u32)) -> Self {
        self.input_shape = input_shape;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn last_batch(&self) -> Option<Array4<f32>> {
        self.last_batch.lock().unwrap().clone()
    }
}

impl Model for ModelFake {
    fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    fn num_classes(&self) -> usize {
        self.scores.len()
    }

    fn forward(&self, batch: Array4<f32>) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_batch.lock().unwrap() = Some(batch);

        if self.fail {
            return Err("fake forward failure".into());
        }

        Ok(self.scores.clone())
    }
}

pub fn fake_resources(model: Arc<ModelFake>) -> Arc<Resources> {
    let labels = vehicle_labels(model.num_classes());
    Arc::new(Resources::new(model, labels).unwrap())
}

/// Builds fresh fake resources on every call, or fails every call.
pub struct ResourceLoaderFake {
    scores: Option<Vec<f32>>,
    loads: AtomicUsize,
}

impl ResourceLoaderFake {
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self {
            scores: Some(scores),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            scores: None,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ResourceLoader for ResourceLoaderFake {
    fn load(&self) -> Result<Arc<Resources>, ResourceLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // Keep the first-use race in tests observable.
        std::thread::sleep(std::time::Duration::from_millis(5));

        match &self.scores {
            Some(scores) => Ok(fake_resources(Arc::new(ModelFake::new(scores.clone())))),
            None => Err(ResourceLoadError::Model {
                path: "best_model.onnx".to_string(),
                message: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}

/// Writes a one-node ONNX classifier: each of its 3 scores is the mean of one
/// channel of an NHWC batch. `None` dims are declared symbolic.
pub fn write_channel_mean_onnx(path: &Path, input_dims: [Option<i64>; 4]) {
    let dim = input_dims
        .iter()
        .enumerate()
        .map(|(axis, size)| Dimension {
            value: Some(match size {
                Some(size) => dimension::Value::DimValue(*size),
                None => dimension::Value::DimParam(format!("d{}", axis)),
            }),
            ..Default::default()
        })
        .collect();

    let tensor_type = |shape: Option<TensorShapeProto>| TypeProto {
        value: Some(type_proto::Value::TensorType(type_proto::Tensor {
            elem_type: DataType::Float as i32,
            shape,
        })),
        ..Default::default()
    };

    let node = NodeProto {
        name: "channel_mean".to_string(),
        op_type: "ReduceMean".to_string(),
        input: vec!["image".to_string()],
        output: vec!["scores".to_string()],
        attribute: vec![
            AttributeProto {
                name: "axes".to_string(),
                r#type: AttributeType::Ints as i32,
                ints: vec![1, 2],
                ..Default::default()
            },
            AttributeProto {
                name: "keepdims".to_string(),
                r#type: AttributeType::Int as i32,
                i: 0,
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let graph = GraphProto {
        name: "channel_mean".to_string(),
        node: vec![node],
        input: vec![ValueInfoProto {
            name: "image".to_string(),
            r#type: Some(tensor_type(Some(TensorShapeProto { dim }))),
            ..Default::default()
        }],
        output: vec![ValueInfoProto {
            name: "scores".to_string(),
            r#type: Some(tensor_type(None)),
            ..Default::default()
        }],
        ..Default::default()
    };

    let model = ModelProto {
        ir_version: 8,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        ..Default::default()
    };

    std::fs::write(path, model.encode_to_vec()).unwrap();
}
