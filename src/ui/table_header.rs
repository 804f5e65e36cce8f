//! Table header component rendering
//!
//! Column labels sort on click; the handles between them resize.

use crate::domain::sorting::SortSpec;
use crate::rendering::text_utils::truncate_text_to_fit;
use crate::state::LayoutState;
use eframe::egui;
use egui::Color32;

const HEADER_HEIGHT: f32 = 24.0;
const HANDLE_WIDTH: f32 = 8.0;

fn handle_color(ui: &egui::Ui, response: &egui::Response) -> Color32 {
    if response.hovered() || response.dragged() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        Color32::from_rgb(100, 150, 255)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke.color.gamma_multiply(0.5)
    }
}

/// Renders the column headers.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `layout` - Column widths, resized in place by the drag handles
/// * `columns` - Column names in display order
/// * `sort` - Active sort, shown as an arrow on its column
///
/// # Returns
/// The column whose label was clicked
pub fn render_table_header(
    ui: &mut egui::Ui,
    layout: &mut LayoutState,
    columns: &[String],
    sort: Option<&SortSpec>,
) -> Option<String> {
    let mut clicked = None;
    let start_pos = ui.cursor().min;
    let width = layout.row_width(columns).max(ui.available_width());
    ui.allocate_exact_size(egui::vec2(width, HEADER_HEIGHT), egui::Sense::hover());

    let font_id = egui::FontId::proportional(14.0);
    let text_color = ui.visuals().strong_text_color();
    let mut x_offset = layout.expand_width();

    // Expand column handle
    let expand_handle_rect = egui::Rect::from_center_size(
        egui::pos2(start_pos.x + x_offset, start_pos.y + HEADER_HEIGHT / 2.0),
        egui::vec2(HANDLE_WIDTH, HEADER_HEIGHT),
    );
    let response = ui.interact(expand_handle_rect, ui.id().with("header_resize_expand"), egui::Sense::drag());
    if response.dragged() {
        layout.resize_expand(response.drag_delta().x);
    }
    let color = handle_color(ui, &response);
    ui.painter().rect_filled(expand_handle_rect.shrink(2.0), 0.0, color);

    for (i, name) in columns.iter().enumerate() {
        let column_width = layout.column_width(name);
        let label_rect = egui::Rect::from_min_size(
            egui::pos2(start_pos.x + x_offset, start_pos.y),
            egui::vec2(column_width, HEADER_HEIGHT),
        );

        let label_response = ui.interact(label_rect, ui.id().with(("header_label", i)), egui::Sense::click());
        if label_response.clicked() {
            clicked = Some(name.clone());
        }
        if label_response.hovered() {
            ui.painter().rect_filled(label_rect, 0.0, ui.visuals().widgets.hovered.weak_bg_fill);
        }

        let label = match sort {
            Some(spec) if &spec.column == name => format!("{name} {}", spec.dir.arrow()),
            _ => name.clone(),
        };
        let truncated = truncate_text_to_fit(&label, column_width, &font_id, ui.painter());
        ui.painter().text(
            label_rect.left_center() + egui::vec2(4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            truncated,
            font_id.clone(),
            text_color,
        );

        x_offset += column_width;

        let handle_rect = egui::Rect::from_center_size(
            egui::pos2(start_pos.x + x_offset, start_pos.y + HEADER_HEIGHT / 2.0),
            egui::vec2(HANDLE_WIDTH, HEADER_HEIGHT),
        );
        let response = ui.interact(handle_rect, ui.id().with(("header_resize", i)), egui::Sense::drag());
        if response.dragged() {
            layout.resize_column(name, response.drag_delta().x);
        }
        let color = handle_color(ui, &response);
        ui.painter().rect_filled(handle_rect.shrink(2.0), 0.0, color);
    }

    clicked
}
