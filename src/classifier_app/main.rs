use crate::classifier_app::core::{init, transition, Effect, Event, State, Upload};
use crate::classifier_app::run_effect::RunEffect;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::resources::interface::ResourceLoader;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

pub struct ClassifierApp {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub state: State,
    pub event_receiver: Receiver<Event>,
    pub run_effect: RunEffect,
    pub path_input: String,
    pub preview: Option<(Upload, egui::TextureHandle)>,
}

impl ClassifierApp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        resource_loader: Arc<dyn ResourceLoader + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("app");
        let (event_sender, event_receiver) = channel();
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            resource_loader,
            event_sender,
        );
        let (state, effects) = init();

        let app = Self {
            config,
            logger,
            state,
            event_receiver,
            run_effect,
            path_input: String::new(),
            preview: None,
        };
        app.spawn_effects(effects);
        app
    }

    pub fn dispatch(&mut self, event: Event) {
        let _ = self.logger.info(&format!(
            "\nold state:\n\t{:?}\n\nevent:\n\t{:?}",
            self.state, event,
        ));

        let (new_state, effects) = transition(&self.config, self.state.clone(), event);

        let _ = self.logger.info(&format!(
            "\nnew state:\n\t{:?}\n\neffects:\n\t{:?}",
            new_state, effects
        ));

        self.state = new_state;
        self.spawn_effects(effects);
    }

    /// Applies every event the effect threads have posted so far.
    pub fn process_pending_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.dispatch(event);
        }
    }

    pub fn submit_upload(&mut self, upload: Upload) {
        self.dispatch(Event::UploadSubmitted(upload));
    }

    pub fn submit_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read(path) {
            Ok(bytes) => self.submit_upload(Upload::new(name, bytes)),
            Err(e) => self.dispatch(Event::UploadReadFailed {
                name,
                message: e.to_string(),
            }),
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}

#[cfg(test)]
impl ClassifierApp {
    /// Blocks until the app is no longer loading or processing.
    pub fn settle(&mut self, timeout: std::time::Duration) {
        let deadline = std::time::Instant::now() + timeout;
        while self.state.is_busy() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return;
            }
            if let Ok(event) = self.event_receiver.recv_timeout(remaining) {
                self.dispatch(event);
            }
        }
    }
}
