use crate::library::logger::interface::{Level, Logger};
use std::sync::{Arc, Mutex};

/// Keeps every line in memory. Namespaced children share the same record.
pub struct LoggerFake {
    namespace: String,
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self {
            namespace: String::new(),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn lines(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(line_level, _)| *line_level == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl Logger for LoggerFake {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.lines
            .lock()
            .unwrap()
            .push((level, format!("{}: {}", self.namespace, message)));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(Self {
            namespace: namespace.to_string(),
            lines: self.lines.clone(),
        })
    }
}
