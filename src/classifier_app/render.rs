use crate::classifier_app::chart::{chart_bars, ChartBar};
use crate::classifier_app::core::{Phase, Upload};
use crate::classifier_app::main::ClassifierApp;
use crate::image_classifier::interface::Prediction;
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

const PREVIEW_MAX_SIDE: u32 = 768;
const BAR_HEIGHT: f32 = 28.0;
const LABEL_WIDTH: f32 = 120.0;

enum UiAction {
    SubmitPath(PathBuf),
    SubmitUpload(Upload),
}

impl eframe::App for ClassifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_pending_events();

        let mut actions = self.dropped_uploads(ctx);

        egui::SidePanel::left("upload_panel")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                if let Some(action) = self.render_upload_panel(ui) {
                    actions.push(action);
                }
            });

        self.refresh_preview(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.config.window_title);
            ui.label("Upload a vehicle image to classify its type.");
            ui.separator();
            self.render_phase(ui);
        });

        for action in actions {
            match action {
                UiAction::SubmitPath(path) => self.submit_path(&path),
                UiAction::SubmitUpload(upload) => self.submit_upload(upload),
            }
        }

        if self.state.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl ClassifierApp {
    fn dropped_uploads(&self, ctx: &egui::Context) -> Vec<UiAction> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        dropped
            .into_iter()
            .take(1)
            .filter_map(|file| match (file.bytes, file.path) {
                (Some(bytes), path) => {
                    let name = path
                        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                        .unwrap_or(file.name);
                    Some(UiAction::SubmitUpload(Upload::new(name, bytes)))
                }
                (None, Some(path)) => Some(UiAction::SubmitPath(path)),
                (None, None) => None,
            })
            .collect()
    }

    fn render_upload_panel(&mut self, ui: &mut egui::Ui) -> Option<UiAction> {
        let mut action = None;

        ui.heading("Upload Vehicle Image");
        ui.label(format!(
            "Choose an image ({})",
            self.config.supported_extensions.join(", ")
        ));
        ui.text_edit_singleline(&mut self.path_input);

        let can_submit = self.state.accepts_uploads() && !self.path_input.trim().is_empty();
        if ui
            .add_enabled(can_submit, egui::Button::new("Classify"))
            .clicked()
        {
            action = Some(UiAction::SubmitPath(PathBuf::from(self.path_input.trim())));
        }
        ui.label(egui::RichText::new("or drop a file onto this window").small());

        ui.separator();
        ui.label(egui::RichText::new("Supported vehicle types").strong());
        for label in &self.state.known_labels {
            ui.label(format!("• {}", label));
        }

        action
    }

    /// Keeps the preview in step with the upload the current phase is about.
    pub(super) fn refresh_preview(&mut self, ctx: &egui::Context) {
        let Some(upload) = self.state.upload() else {
            self.preview = None;
            return;
        };
        if matches!(&self.preview, Some((shown, _)) if shown == upload) {
            return;
        }

        // Previews are best effort; undecodable uploads surface through the pipeline.
        self.preview = image::load_from_memory(&upload.bytes).ok().map(|image| {
            let rgba = image.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE).to_rgba8();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [rgba.width() as usize, rgba.height() as usize],
                rgba.as_raw(),
            );
            let texture = ctx.load_texture(&upload.name, color_image, egui::TextureOptions::LINEAR);
            (upload.clone(), texture)
        });
    }

    fn render_phase(&self, ui: &mut egui::Ui) {
        match &self.state.phase {
            Phase::LoadingResources => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading model...");
                });
            }
            Phase::Halted { message } => {
                ui.colored_label(egui::Color32::from_rgb(185, 28, 28), message);
            }
            Phase::Idle => {
                ui.label("Please upload an image to start classification.");
            }
            Phase::Processing { stage, .. } => {
                self.render_with_preview(ui, |ui| {
                    ui.label(egui::RichText::new("Prediction Result").strong());
                    ui.add(
                        egui::ProgressBar::new(stage.progress())
                            .text(stage.description())
                            .animate(true),
                    );
                });
            }
            Phase::DisplayingResult { prediction, .. } => {
                self.render_with_preview(ui, |ui| render_prediction(ui, prediction));
            }
            Phase::Error { message, .. } => {
                self.render_with_preview(ui, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(185, 28, 28), message);
                });
            }
        }
    }

    fn render_with_preview(&self, ui: &mut egui::Ui, result: impl FnOnce(&mut egui::Ui)) {
        ui.columns(2, |columns| {
            if let Some((upload, texture)) = &self.preview {
                let available = columns[0].available_width();
                let size = texture.size_vec2();
                let scale = (available / size.x).min(1.0);
                columns[0].add(egui::Image::new((texture.id(), size * scale)));
                columns[0].label(egui::RichText::new(&upload.name).small());
            }
            result(&mut columns[1]);
        });
    }
}

fn render_prediction(ui: &mut egui::Ui, prediction: &Prediction) {
    ui.label(egui::RichText::new("Prediction Result").strong());

    if let Some(top) = prediction.top() {
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(224, 242, 254))
            .rounding(10.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(format!("Vehicle type: {}", top.label)).strong());
                ui.label(format!("Confidence: {}", top.confidence_text()));
            });
    }

    ui.add_space(12.0);
    ui.label(format!("Top {} Predictions", prediction.classifications.len()));
    for bar in chart_bars(prediction) {
        render_bar(ui, &bar);
    }
}

fn render_bar(ui: &mut egui::Ui, bar: &ChartBar) {
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, BAR_HEIGHT), egui::Sense::hover());
    let painter = ui.painter();
    let text_color = ui.visuals().text_color();

    painter.text(
        rect.left_center(),
        egui::Align2::LEFT_CENTER,
        &bar.label,
        egui::FontId::proportional(14.0),
        text_color,
    );

    let track = egui::Rect::from_min_max(
        egui::pos2(rect.left() + LABEL_WIDTH, rect.top() + 4.0),
        egui::pos2(rect.right(), rect.bottom() - 4.0),
    );
    let filled = egui::Rect::from_min_size(
        track.min,
        egui::vec2(track.width() * bar.fraction, track.height()),
    );
    painter.rect_stroke(track, 4.0, egui::Stroke::new(1.0, egui::Color32::from_gray(200)));
    painter.rect_filled(filled, 4.0, bar.color);
    painter.text(
        track.right_center() - egui::vec2(6.0, 0.0),
        egui::Align2::RIGHT_CENTER,
        &bar.value_text,
        egui::FontId::monospace(13.0),
        text_color,
    );
}
