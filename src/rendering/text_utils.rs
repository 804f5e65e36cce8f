//! Text measurement helpers for cell rendering.

use eframe::egui;

const ELLIPSIS: &str = "…";

/// Horizontal padding kept free inside a cell, both sides together
pub const CELL_PADDING: f32 = 8.0;

fn text_width(text: &str, font_id: &egui::FontId, painter: &egui::Painter) -> f32 {
    painter
        .layout_no_wrap(text.to_owned(), font_id.clone(), egui::Color32::WHITE)
        .size()
        .x
}

/// Shortens `text` with a trailing ellipsis until it fits `available_width`.
///
/// Returns an empty string when not even the ellipsis fits.
pub fn truncate_text_to_fit(
    text: &str,
    available_width: f32,
    font_id: &egui::FontId,
    painter: &egui::Painter,
) -> String {
    let max_width = available_width - CELL_PADDING;
    if max_width <= 0.0 {
        return String::new();
    }
    if text_width(text, font_id, painter) <= max_width {
        return text.to_owned();
    }
    let budget = max_width - text_width(ELLIPSIS, font_id, painter);
    if budget <= 0.0 {
        return String::new();
    }

    // Largest prefix (on a char boundary) within the budget
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).skip(1).collect();
    let fits = boundaries.partition_point(|&end| text_width(&text[..end], font_id, painter) <= budget);
    let prefix = if fits == 0 { "" } else { &text[..boundaries[fits - 1]] };
    format!("{prefix}{ELLIPSIS}")
}
