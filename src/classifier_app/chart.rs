use crate::image_classifier::interface::Prediction;
use egui::Color32;

const LIGHT_BLUE: [u8; 3] = [198, 219, 239];
const DARK_BLUE: [u8; 3] = [8, 48, 107];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value_text: String,
    /// Share of the full bar width, in [0, 1].
    pub fraction: f32,
    pub color: Color32,
}

/// Horizontal bars, one per ranked class, best first. Color deepens with confidence
/// relative to the other bars.
pub fn chart_bars(prediction: &Prediction) -> Vec<ChartBar> {
    let confidences: Vec<f32> = prediction
        .classifications
        .iter()
        .map(|c| c.confidence)
        .collect();
    let min = confidences.iter().copied().fold(f32::INFINITY, f32::min);
    let max = confidences.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    prediction
        .classifications
        .iter()
        .map(|c| {
            let shade = if max > min {
                (c.confidence - min) / (max - min)
            } else {
                1.0
            };
            ChartBar {
                label: c.label.clone(),
                value_text: c.confidence_text(),
                fraction: bar_fraction(c.confidence),
                color: blues(shade),
            }
        })
        .collect()
}

fn bar_fraction(confidence: f32) -> f32 {
    if confidence.is_finite() {
        (confidence / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn blues(shade: f32) -> Color32 {
    let t = if shade.is_finite() {
        shade.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let channel =
        |i: usize| (LIGHT_BLUE[i] as f32 + (DARK_BLUE[i] as f32 - LIGHT_BLUE[i] as f32) * t).round() as u8;

    Color32::from_rgb(channel(0), channel(1), channel(2))
}
