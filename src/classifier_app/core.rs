use crate::config::Config;
use crate::image_classifier::interface::{InferenceError, PipelineStage, Prediction};
use crate::resources::interface::ResourceLoadError;
use std::sync::Arc;

/// A user supplied file, shared between the UI and the worker thread.
#[derive(Clone, PartialEq)]
pub struct Upload {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Upload({}, {} bytes)", self.name, self.bytes.len())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    LoadingResources,
    /// Resources could not be loaded. Nothing can be classified.
    Halted {
        message: String,
    },
    Idle,
    Processing {
        upload: Upload,
        stage: PipelineStage,
    },
    DisplayingResult {
        upload: Upload,
        prediction: Prediction,
    },
    Error {
        upload: Option<Upload>,
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub known_labels: Vec<String>,
    pub phase: Phase,
}

impl State {
    pub fn accepts_uploads(&self) -> bool {
        matches!(
            self.phase,
            Phase::Idle | Phase::DisplayingResult { .. } | Phase::Error { .. }
        )
    }

    /// The upload being processed or last processed, if any.
    pub fn upload(&self) -> Option<&Upload> {
        match &self.phase {
            Phase::Processing { upload, .. } | Phase::DisplayingResult { upload, .. } => Some(upload),
            Phase::Error { upload, .. } => upload.as_ref(),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::LoadingResources | Phase::Processing { .. }
        )
    }
}

#[derive(Debug)]
pub enum Event {
    ResourcesLoadDone(Result<Vec<String>, ResourceLoadError>),
    UploadSubmitted(Upload),
    UploadReadFailed { name: String, message: String },
    StageReported(PipelineStage),
    ClassifyDone(Result<Prediction, InferenceError>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadResources,
    Classify { upload: Upload },
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State {
            known_labels: vec![],
            phase: Phase::LoadingResources,
        },
        vec![Effect::LoadResources],
    )
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    let known_labels = state.known_labels.clone();
    let with_phase = |phase: Phase| State {
        known_labels: known_labels.clone(),
        phase,
    };

    match (state.phase.clone(), event) {
        (Phase::LoadingResources, Event::ResourcesLoadDone(Ok(labels))) => (
            State {
                known_labels: labels,
                phase: Phase::Idle,
            },
            vec![],
        ),

        // A load failure is fatal wherever it surfaces.
        (Phase::Halted { .. }, Event::ResourcesLoadDone(Err(_))) => (state, vec![]),
        (_, Event::ResourcesLoadDone(Err(e))) => (
            with_phase(Phase::Halted {
                message: format!("Error loading the model or class indices: {}", e),
            }),
            vec![],
        ),

        (_, Event::UploadSubmitted(upload)) if state.accepts_uploads() => {
            if !config.is_supported_file_name(&upload.name) {
                let message = format!(
                    "{} is not a supported image. Choose a {} file.",
                    upload.name,
                    config.supported_extensions.join(", ")
                );
                return (
                    with_phase(Phase::Error {
                        upload: None,
                        message,
                    }),
                    vec![],
                );
            }

            (
                with_phase(Phase::Processing {
                    upload: upload.clone(),
                    stage: PipelineStage::Decoding,
                }),
                vec![Effect::Classify { upload }],
            )
        }

        (_, Event::UploadReadFailed { name, message }) if state.accepts_uploads() => (
            with_phase(Phase::Error {
                upload: None,
                message: format!("Error reading {}: {}", name, message),
            }),
            vec![],
        ),

        (Phase::Processing { upload, .. }, Event::StageReported(stage)) => (
            with_phase(Phase::Processing { upload, stage }),
            vec![],
        ),

        (Phase::Processing { upload, .. }, Event::ClassifyDone(Ok(prediction))) => (
            with_phase(Phase::DisplayingResult { upload, prediction }),
            vec![],
        ),

        (Phase::Processing { upload, .. }, Event::ClassifyDone(Err(e))) => (
            with_phase(Phase::Error {
                upload: Some(upload),
                message: format!("Error processing the image: {}", e),
            }),
            vec![],
        ),

        _ => (state, vec![]),
    }
}
