use crate::classifier_app::core::{Effect, Event};
use crate::config::Config;
use crate::image_classifier::pipeline::ImageClassifierPipeline;
use crate::library::logger::interface::Logger;
use crate::resources::interface::ResourceLoader;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    resource_loader: Arc<dyn ResourceLoader + Send + Sync>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        resource_loader: Arc<dyn ResourceLoader + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            config,
            logger,
            resource_loader,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::LoadResources => {
                let loaded = self
                    .resource_loader
                    .load()
                    .map(|resources| resources.labels.labels().to_vec());
                let _ = self.event_sender.send(Event::ResourcesLoadDone(loaded));
            }
            Effect::Classify { upload } => {
                let resources = match self.resource_loader.load() {
                    Ok(resources) => resources,
                    Err(e) => {
                        let _ = self.event_sender.send(Event::ResourcesLoadDone(Err(e)));
                        return;
                    }
                };

                let pipeline =
                    ImageClassifierPipeline::new(resources, self.config.clone(), self.logger.clone());
                let event_sender = self.event_sender.clone();
                let classified = pipeline.classify_upload(&upload.bytes, &mut |stage| {
                    let _ = event_sender.send(Event::StageReported(stage));
                });

                if let Err(e) = &classified {
                    let _ = self
                        .logger
                        .error(&format!("Classifying {} failed: {}", upload.name, e));
                }
                let _ = self.event_sender.send(Event::ClassifyDone(classified));
            }
        }
    }
}
