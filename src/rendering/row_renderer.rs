//! Table row rendering logic
//!
//! Draws one flattened entry: data rows with their indent, expand toggle and
//! cells; state rows (loading, error, empty) and nested grids as full-width
//! bands below the row that owns them.

use crate::app::RowAction;
use crate::rendering::text_utils::{truncate_text_to_fit, CELL_PADDING};
use crate::state::LayoutState;
use crate::utils::format_cell_value;
use eframe::egui;
use egui::Color32;
use rtable::{RowId, RowKind, TableRow, ThemeColors};
use serde_json::Value;

/// Horizontal indent per depth level
pub const INDENT: f32 = 16.0;

const TOGGLE_WIDTH: f32 = 20.0;
const GRID_LINE_HEIGHT: f32 = 16.0;
const GRID_COLUMN_WIDTH: f32 = 110.0;

/// Result of user interaction with a row.
pub enum RowInteraction {
    Selected(RowId),
    ExpandToggled { row_id: RowId, depth: usize },
    Action { row_id: RowId, action: RowAction },
}

/// Where and how a row is drawn.
pub struct RowPaint<'a> {
    pub height: f32,
    pub columns: &'a [String],
    pub layout: &'a LayoutState,
    pub colors: &'a ThemeColors,
    pub selected: bool,
    /// Transition overlay (entering or exiting), already faded
    pub tint: Option<Color32>,
    /// Set for rows that are about to leave; they take no input
    pub inert: bool,
}

/// Renders a single entry of the flattened sequence.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `row` - The entry to draw
/// * `value` - The dataset row behind the entry (the owner for synthetic entries)
/// * `paint` - Size, layout and colors
///
/// # Returns
/// * `Option<RowInteraction>` - User interaction result
pub fn render_row(
    ui: &mut egui::Ui,
    row: &TableRow<()>,
    value: Option<&Value>,
    paint: &RowPaint<'_>,
) -> Option<RowInteraction> {
    let width = paint.layout.row_width(paint.columns).max(ui.available_width());
    let sense = if paint.inert { egui::Sense::hover() } else { egui::Sense::click() };
    let (row_rect, row_response) = ui.allocate_exact_size(egui::vec2(width, paint.height), sense);

    if !ui.is_rect_visible(row_rect) {
        return None;
    }

    if paint.selected {
        ui.painter().rect_filled(row_rect, 0.0, paint.colors.selection);
    } else if row.display_position % 2 == 1 && row.kind.is_data() {
        ui.painter().rect_filled(row_rect, 0.0, paint.colors.stripe);
    }
    if let Some(tint) = paint.tint {
        ui.painter().rect_filled(row_rect, 0.0, tint);
    }

    let mut interaction = match &row.kind {
        RowKind::Data => render_data_row(ui, row, value, row_rect, paint),
        RowKind::Loading => {
            paint_band(ui, row, row_rect, "Loading…", paint.colors.loading);
            ui.ctx().request_repaint();
            None
        }
        RowKind::Error { message } => {
            paint_band(ui, row, row_rect, &format!("⚠ {message}"), paint.colors.error);
            None
        }
        RowKind::Empty { message } => {
            let text = message.as_deref().unwrap_or("No rows");
            paint_band(ui, row, row_rect, text, paint.colors.empty);
            None
        }
        RowKind::NestedGrid => {
            let children = row
                .grouping_key
                .as_deref()
                .and_then(|key| value?.get(key))
                .and_then(Value::as_array);
            paint_nested_grid(ui, row, row_rect, children.map(Vec::as_slice).unwrap_or(&[]), paint);
            None
        }
    };

    if row.is_last_group_row && row.depth > 0 {
        let y = row_rect.bottom() - 0.5;
        ui.painter().line_segment(
            [egui::pos2(row_rect.left() + row.depth as f32 * INDENT, y), egui::pos2(row_rect.right(), y)],
            egui::Stroke::new(1.0, paint.colors.group_boundary),
        );
    }

    if paint.inert {
        return None;
    }

    if row_response.clicked() && row.kind.is_data() && interaction.is_none() {
        interaction = Some(RowInteraction::Selected(row.row_id.clone()));
    }

    row_response.context_menu(|ui| {
        let action = if ui.button("Mark loading").clicked() {
            Some(RowAction::MarkLoading)
        } else if ui.button("Mark error").clicked() {
            Some(RowAction::MarkError("Failed to load children".to_string()))
        } else if ui.button("Mark empty").clicked() {
            Some(RowAction::MarkEmpty)
        } else if ui.button("Clear state").clicked() {
            Some(RowAction::ClearState)
        } else {
            None
        };
        if let Some(action) = action {
            interaction = Some(RowInteraction::Action {
                row_id: row.row_id.clone(),
                action,
            });
            ui.close();
        }
    });

    interaction
}

fn render_data_row(
    ui: &mut egui::Ui,
    row: &TableRow<()>,
    value: Option<&Value>,
    row_rect: egui::Rect,
    paint: &RowPaint<'_>,
) -> Option<RowInteraction> {
    let mut interaction = None;
    let start = row_rect.min;
    let indent = row.depth as f32 * INDENT;

    // Ancestor guides
    let guide = ui.visuals().text_color().gamma_multiply(0.3);
    for level in 0..row.depth {
        let x = start.x + level as f32 * INDENT + INDENT / 2.0;
        ui.painter().line_segment(
            [egui::pos2(x, row_rect.top()), egui::pos2(x, row_rect.bottom())],
            egui::Stroke::new(1.0, guide),
        );
    }

    if row.is_expandable && !paint.inert {
        let toggle_rect = egui::Rect::from_center_size(
            egui::pos2(start.x + indent + TOGGLE_WIDTH / 2.0, row_rect.center().y),
            egui::vec2(16.0, 16.0),
        );
        let toggle_id = ui.id().with(("expand", &row.row_id));
        let response = ui.interact(toggle_rect, toggle_id, egui::Sense::click());
        if response.clicked() {
            interaction = Some(RowInteraction::ExpandToggled {
                row_id: row.row_id.clone(),
                depth: row.depth,
            });
        }
        ui.painter().text(
            toggle_rect.center(),
            egui::Align2::CENTER_CENTER,
            if row.is_expanded { "▼" } else { "▶" },
            egui::FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
    }

    let font_id = egui::FontId::proportional(13.0);
    let text_color = ui.visuals().text_color();
    let painter = ui.painter();
    let mut x_offset = paint.layout.expand_width();
    for column in paint.columns {
        let column_width = paint.layout.column_width(column);
        let text = format_cell_value(value.and_then(|v| v.get(column)));
        if !text.is_empty() {
            let cell = egui::Rect::from_min_size(
                egui::pos2(start.x + x_offset, start.y),
                egui::vec2(column_width, paint.height),
            );
            let shown = truncate_text_to_fit(&text, column_width, &font_id, painter);
            painter.text(
                cell.left_center() + egui::vec2(CELL_PADDING / 2.0, 0.0),
                egui::Align2::LEFT_CENTER,
                shown,
                font_id.clone(),
                text_color,
            );
        }
        x_offset += column_width;
    }

    interaction
}

fn paint_band(ui: &egui::Ui, row: &TableRow<()>, rect: egui::Rect, text: &str, color: Color32) {
    let left = rect.left() + row.depth as f32 * INDENT;
    let band = egui::Rect::from_min_max(
        egui::pos2(left, rect.top() + 2.0),
        egui::pos2(rect.right(), rect.bottom() - 2.0),
    );
    ui.painter().rect_filled(band, 2.0, color.gamma_multiply(0.15));
    ui.painter().text(
        band.left_center() + egui::vec2(CELL_PADDING, 0.0),
        egui::Align2::LEFT_CENTER,
        text,
        egui::FontId::proportional(12.0),
        color,
    );
}

/// Paints the owner's children as a compact grid inside `rect`.
fn paint_nested_grid(ui: &egui::Ui, row: &TableRow<()>, rect: egui::Rect, children: &[Value], paint: &RowPaint<'_>) {
    let left = rect.left() + row.depth as f32 * INDENT;
    let grid = egui::Rect::from_min_max(
        egui::pos2(left, rect.top() + 2.0),
        egui::pos2(rect.right(), rect.bottom() - 2.0),
    );
    let painter = ui.painter();
    painter.rect_filled(grid, 2.0, paint.colors.nested_grid);

    let font_id = egui::FontId::monospace(11.0);
    let columns: Vec<&String> = children
        .first()
        .and_then(Value::as_object)
        .map(|object| object.iter().filter(|(_, v)| !v.is_array()).map(|(k, _)| k).collect())
        .unwrap_or_default();

    let capacity = ((grid.height() / GRID_LINE_HEIGHT).floor() as usize).saturating_sub(1);
    let mut y = grid.top() + GRID_LINE_HEIGHT / 2.0;
    let draw_line = |cells: Vec<String>, color: Color32, y: f32| {
        for (i, cell) in cells.iter().enumerate() {
            let x = grid.left() + CELL_PADDING + i as f32 * GRID_COLUMN_WIDTH;
            let shown = truncate_text_to_fit(cell, GRID_COLUMN_WIDTH, &font_id, painter);
            painter.text(egui::pos2(x, y), egui::Align2::LEFT_CENTER, shown, font_id.clone(), color);
        }
    };

    draw_line(columns.iter().map(|c| c.to_string()).collect(), paint.colors.text_strong, y);
    for child in children.iter().take(capacity.saturating_sub(1)) {
        y += GRID_LINE_HEIGHT;
        draw_line(columns.iter().map(|c| format_cell_value(child.get(c.as_str()))).collect(), paint.colors.text, y);
    }
    let hidden = children.len().saturating_sub(capacity.saturating_sub(1));
    if hidden > 0 {
        y += GRID_LINE_HEIGHT;
        draw_line(vec![format!("+{hidden} more")], paint.colors.text_dim, y);
    }
}
